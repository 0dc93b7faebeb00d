use study_core::FileType;

use super::ExtractionError;

#[cfg(feature = "docx")]
pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let doc = docx_rs::read_docx(bytes).map_err(|e| {
        tracing::warn!("DOCX parse failed: {}", e);
        ExtractionError::Malformed {
            file_type: FileType::Docx,
            reason: e.to_string(),
        }
    })?;

    let mut paragraphs = Vec::new();
    for child in &doc.document.children {
        collect_paragraphs(child, &mut paragraphs);
    }

    let text = paragraphs
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    if text.trim().is_empty() {
        tracing::warn!("DOCX text extraction returned empty result");
        return Err(ExtractionError::EmptyContent(FileType::Docx));
    }

    tracing::debug!("DOCX text found in {} paragraphs", paragraphs.len());
    Ok(text)
}

#[cfg(not(feature = "docx"))]
pub fn extract_docx(_bytes: &[u8]) -> Result<String, ExtractionError> {
    tracing::error!("DOCX support not compiled in (enable the `docx` feature)");
    Err(ExtractionError::CapabilityUnavailable(FileType::Docx))
}

/// Body paragraphs, plus the paragraphs inside table cells, in document order.
#[cfg(feature = "docx")]
fn collect_paragraphs(element: &docx_rs::DocumentChild, out: &mut Vec<String>) {
    match element {
        docx_rs::DocumentChild::Paragraph(para) => out.push(paragraph_text(para)),
        docx_rs::DocumentChild::Table(table) => {
            for row in &table.rows {
                let docx_rs::TableChild::TableRow(tr) = row;
                for cell in &tr.cells {
                    let docx_rs::TableRowChild::TableCell(tc) = cell;
                    for content in &tc.children {
                        if let docx_rs::TableCellContent::Paragraph(para) = content {
                            out.push(paragraph_text(para));
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

#[cfg(feature = "docx")]
fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => push_run(run, &mut text),
            docx_rs::ParagraphChild::Hyperlink(link) => {
                for inner in &link.children {
                    if let docx_rs::ParagraphChild::Run(run) = inner {
                        push_run(run, &mut text);
                    }
                }
            }
            _ => {}
        }
    }
    text
}

#[cfg(feature = "docx")]
fn push_run(run: &docx_rs::Run, out: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(t) => out.push_str(&t.text),
            docx_rs::RunChild::Tab(_) => out.push('\t'),
            docx_rs::RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}
