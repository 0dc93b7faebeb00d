//! Markdown fence stripping and shape validation for generated JSON.
//!
//! Models often wrap JSON in ```` ```json ```` blocks, sometimes in bare
//! fences, sometimes not at all. Detection and body extraction are separate
//! steps so each can be tested on its own.

use serde::de::DeserializeOwned;
use serde_json::Value;
use study_core::{QuizData, QuizQuestion};

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    /// A fence tagged `json` (any case).
    Json,
    /// An untagged fence, or one tagged with another language.
    Bare,
    None,
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("response is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("response has no \"questions\" field")]
    MissingQuestions,
    #[error("\"questions\" is not a list")]
    QuestionsNotSequence,
    #[error("question {index} is malformed: {reason}")]
    MalformedQuestion { index: usize, reason: String },
    #[error("response has an unexpected shape: {0}")]
    Shape(String),
}

pub fn detect_fence(text: &str) -> FenceKind {
    if text.to_ascii_lowercase().contains(JSON_FENCE) {
        FenceKind::Json
    } else if text.contains(FENCE) {
        FenceKind::Bare
    } else {
        FenceKind::None
    }
}

/// The content inside the fence of `kind`, trimmed. An unclosed fence runs to
/// the end of the text.
pub fn fence_body(text: &str, kind: FenceKind) -> &str {
    match kind {
        FenceKind::Json => {
            // ASCII lowercasing keeps byte offsets aligned with `text`.
            let Some(start) = text.to_ascii_lowercase().find(JSON_FENCE) else {
                return text.trim();
            };
            let rest = &text[start + JSON_FENCE.len()..];
            until_fence(rest).trim()
        }
        FenceKind::Bare => {
            let Some(start) = text.find(FENCE) else {
                return text.trim();
            };
            let rest = skip_info_string(&text[start + FENCE.len()..]);
            until_fence(rest).trim()
        }
        FenceKind::None => text.trim(),
    }
}

pub fn strip_fence(text: &str) -> &str {
    fence_body(text, detect_fence(text))
}

fn until_fence(text: &str) -> &str {
    match text.find(FENCE) {
        Some(end) => &text[..end],
        None => text,
    }
}

/// Drop a one-word language tag (```` ```python ````) from the opening line.
fn skip_info_string(after_fence: &str) -> &str {
    let Some(newline) = after_fence.find('\n') else {
        return after_fence;
    };
    let tag = after_fence[..newline].trim();
    let is_word = !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'));
    if is_word {
        &after_fence[newline + 1..]
    } else {
        after_fence
    }
}

/// Strip any fence and deserialize the body into `T`.
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, ValidationError> {
    let value: Value = serde_json::from_str(strip_fence(raw)).map_err(ValidationError::Syntax)?;
    serde_json::from_value(value).map_err(|e| ValidationError::Shape(e.to_string()))
}

/// Strip any fence, then check the quiz shape field by field.
pub fn parse_quiz(raw: &str) -> Result<QuizData, ValidationError> {
    let value: Value = serde_json::from_str(strip_fence(raw)).map_err(ValidationError::Syntax)?;

    let questions = value
        .as_object()
        .and_then(|obj| obj.get("questions"))
        .ok_or(ValidationError::MissingQuestions)?;
    let items = questions
        .as_array()
        .ok_or(ValidationError::QuestionsNotSequence)?;

    let questions = items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_question(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuizData { questions })
}

fn parse_question(index: usize, item: &Value) -> Result<QuizQuestion, ValidationError> {
    let malformed = |reason: &str| ValidationError::MalformedQuestion {
        index,
        reason: reason.to_string(),
    };

    let obj = item.as_object().ok_or_else(|| malformed("not an object"))?;

    let question = match obj.get("question") {
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(malformed("\"question\" is not a string")),
        None => return Err(malformed("missing \"question\"")),
    };

    let correct_answer = match obj.get("correct_answer").or_else(|| obj.get("answer")) {
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(malformed("\"correct_answer\" is not a string")),
        None => return Err(malformed("missing \"correct_answer\"")),
    };

    let options = match obj.get("options") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|o| o.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| malformed("\"options\" must contain only strings"))?,
        Some(_) => return Err(malformed("\"options\" is not a list")),
    };

    let explanation = match obj.get("explanation") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(malformed("\"explanation\" is not a string")),
    };

    Ok(QuizQuestion {
        question,
        options,
        correct_answer,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIZ: &str = r#"{"questions": [{"question": "2+2?", "options": ["3", "4"], "correct_answer": "4", "explanation": "arithmetic"}]}"#;

    #[test]
    fn detect_kinds() {
        assert_eq!(detect_fence("```json\n{}\n```"), FenceKind::Json);
        assert_eq!(detect_fence("```JSON\n{}\n```"), FenceKind::Json);
        assert_eq!(detect_fence("```\n{}\n```"), FenceKind::Bare);
        assert_eq!(detect_fence("{}"), FenceKind::None);
    }

    #[test]
    fn json_fence_with_prose() {
        let input = "Here is your quiz:\n```json\n{\"a\": 1}\n```\nGood luck!";
        assert_eq!(strip_fence(input), "{\"a\": 1}");
    }

    #[test]
    fn unclosed_json_fence_runs_to_end() {
        assert_eq!(strip_fence("```json\n{\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn bare_fence_drops_language_tag() {
        assert_eq!(strip_fence("```javascript\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn bare_fence_on_one_line_keeps_body() {
        assert_eq!(strip_fence("```{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn stripping_is_idempotent() {
        for input in [
            "```json\n{\"a\": 1}\n```",
            "```\n{\"a\": 1}\n```",
            "  {\"a\": 1}  ",
            "```python\nprint(1)",
        ] {
            let once = strip_fence(input);
            assert_eq!(strip_fence(once), once, "input: {input:?}");
        }
    }

    #[test]
    fn fence_styles_parse_identically() {
        let plain = parse_quiz(QUIZ).unwrap();
        let json = parse_quiz(&format!("```json\n{QUIZ}\n```")).unwrap();
        let bare = parse_quiz(&format!("```\n{QUIZ}\n```")).unwrap();
        assert_eq!(plain, json);
        assert_eq!(plain, bare);
        assert_eq!(plain.questions[0].correct_answer, "4");
    }

    #[test]
    fn prose_is_a_syntax_error() {
        assert!(matches!(
            parse_quiz("I'm sorry, I can't make a quiz from that."),
            Err(ValidationError::Syntax(_))
        ));
    }

    #[test]
    fn missing_questions_key() {
        assert!(matches!(
            parse_quiz(r#"{"items": []}"#),
            Err(ValidationError::MissingQuestions)
        ));
        assert!(matches!(parse_quiz("[1, 2]"), Err(ValidationError::MissingQuestions)));
    }

    #[test]
    fn questions_must_be_a_list() {
        assert!(matches!(
            parse_quiz(r#"{"questions": "none"}"#),
            Err(ValidationError::QuestionsNotSequence)
        ));
    }

    #[test]
    fn malformed_question_reports_index() {
        let raw = r#"{"questions": [
            {"question": "ok?", "correct_answer": "yes"},
            {"question": "no answer?"}
        ]}"#;
        match parse_quiz(raw) {
            Err(ValidationError::MalformedQuestion { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("correct_answer"));
            }
            other => panic!("expected MalformedQuestion, got {other:?}"),
        }
    }

    #[test]
    fn non_string_fields_are_malformed() {
        let raw = r#"{"questions": [{"question": 7, "correct_answer": "x"}]}"#;
        assert!(matches!(
            parse_quiz(raw),
            Err(ValidationError::MalformedQuestion { index: 0, .. })
        ));
        let raw = r#"{"questions": [{"question": "q", "correct_answer": "x", "options": [1, 2]}]}"#;
        assert!(matches!(
            parse_quiz(raw),
            Err(ValidationError::MalformedQuestion { index: 0, .. })
        ));
    }

    #[test]
    fn answer_alias_accepted() {
        let quiz = parse_quiz(r#"{"questions": [{"question": "q", "answer": "a"}]}"#).unwrap();
        assert_eq!(quiz.questions[0].correct_answer, "a");
        assert!(quiz.questions[0].options.is_empty());
    }

    #[test]
    fn empty_question_list_is_valid() {
        assert!(parse_quiz(r#"{"questions": []}"#).unwrap().questions.is_empty());
    }

    #[test]
    fn parse_json_shape_errors_are_distinct() {
        #[derive(Debug, serde::Deserialize)]
        struct Wanted {
            #[allow(dead_code)]
            name: String,
        }
        assert!(matches!(parse_json::<Wanted>("nope"), Err(ValidationError::Syntax(_))));
        assert!(matches!(
            parse_json::<Wanted>(r#"{"name": 3}"#),
            Err(ValidationError::Shape(_))
        ));
    }
}
