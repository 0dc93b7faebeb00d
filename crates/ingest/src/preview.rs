/// Default preview budget, in characters.
pub const DEFAULT_PREVIEW_LENGTH: usize = 200;

const ELLIPSIS: &str = "...";

/// Short single-line preview of extracted text.
///
/// Whitespace runs collapse to one space. Text that fills or exceeds the
/// budget is cut to `max_length - 3` chars and marked with `...`.
pub fn content_preview(text: &str, max_length: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let len = collapsed.chars().count();

    if len < max_length {
        return collapsed;
    }

    let marker_len = ELLIPSIS.len();
    if max_length < marker_len {
        return collapsed.chars().take(max_length).collect();
    }

    let mut preview: String = collapsed.chars().take(max_length - marker_len).collect();
    preview.push_str(ELLIPSIS);
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_unchanged() {
        assert_eq!(content_preview("ab", 5), "ab");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(content_preview("  one\n\ttwo   three \n", 50), "one two three");
    }

    #[test]
    fn text_filling_budget_is_marked() {
        let preview = content_preview("a   b\n\nc", 5);
        assert_eq!(preview, "a ...");
        assert_eq!(preview.chars().count(), 5);
    }

    #[test]
    fn long_text_is_exactly_max_length() {
        let text = "word ".repeat(100);
        let preview = content_preview(&text, DEFAULT_PREVIEW_LENGTH);
        assert_eq!(preview.chars().count(), DEFAULT_PREVIEW_LENGTH);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn counts_chars_not_bytes() {
        let preview = content_preview("ééééééééé", 6);
        assert_eq!(preview, "ééé...");
    }

    #[test]
    fn tiny_budget_truncates_hard() {
        assert_eq!(content_preview("abcdef", 2), "ab");
        assert_eq!(content_preview("abcdef", 0), "");
    }

    #[test]
    fn empty_text_stays_empty() {
        assert_eq!(content_preview(" \n\t ", 10), "");
    }
}
