//! Quiz payloads and grading.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The structured quiz returned by the generation API and stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizData {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Older stored quizzes used `answer`.
    #[serde(alias = "answer")]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub score: u32,
    pub max_score: u32,
    pub percent: u32,
    pub results: Vec<QuestionResult>,
}

/// Grade submitted answers keyed by zero-based question index ("0", "1", ...).
pub fn grade(quiz: &QuizData, answers: &HashMap<String, String>) -> QuizOutcome {
    let results: Vec<QuestionResult> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(idx, q)| {
            let user_answer = answers.get(&idx.to_string()).cloned();
            let is_correct = user_answer.as_deref() == Some(q.correct_answer.as_str());
            QuestionResult {
                question: q.question.clone(),
                user_answer,
                correct_answer: q.correct_answer.clone(),
                is_correct,
                explanation: q.explanation.clone(),
            }
        })
        .collect();

    let score = results.iter().filter(|r| r.is_correct).count() as u32;
    let max_score = results.len() as u32;

    QuizOutcome {
        score,
        max_score,
        percent: percent(score, max_score),
        results,
    }
}

/// Rounded percentage; zero when there is nothing to score.
pub fn percent(score: u32, max_score: u32) -> u32 {
    if max_score == 0 {
        return 0;
    }
    (f64::from(score) / f64::from(max_score) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, answer: &str) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_answer: answer.to_string(),
            explanation: format!("{answer} is right"),
        }
    }

    fn answers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn three_of_four_scores_75_percent() {
        let quiz = QuizData {
            questions: vec![
                question("q1", "A"),
                question("q2", "B"),
                question("q3", "C"),
                question("q4", "D"),
            ],
        };
        let outcome = grade(&quiz, &answers(&[("0", "A"), ("1", "B"), ("2", "C"), ("3", "A")]));

        assert_eq!(outcome.score, 3);
        assert_eq!(outcome.max_score, 4);
        assert_eq!(outcome.percent, 75);
        assert!(!outcome.results[3].is_correct);
        assert_eq!(outcome.results[3].user_answer.as_deref(), Some("A"));
        assert_eq!(outcome.results[3].correct_answer, "D");
    }

    #[test]
    fn unanswered_questions_are_wrong() {
        let quiz = QuizData {
            questions: vec![question("q1", "A"), question("q2", "B")],
        };
        let outcome = grade(&quiz, &answers(&[("1", "B")]));
        assert_eq!(outcome.score, 1);
        assert!(outcome.results[0].user_answer.is_none());
        assert!(!outcome.results[0].is_correct);
    }

    #[test]
    fn empty_quiz_scores_zero_percent() {
        let outcome = grade(&QuizData { questions: vec![] }, &HashMap::new());
        assert_eq!(outcome.max_score, 0);
        assert_eq!(outcome.percent, 0);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
    }

    #[test]
    fn legacy_answer_field_is_accepted() {
        let json = serde_json::json!({
            "questions": [{
                "question": "2 + 2?",
                "options": ["3", "4", "5", "6"],
                "answer": "4"
            }]
        });
        let quiz: QuizData = serde_json::from_value(json).unwrap();
        assert_eq!(quiz.questions[0].correct_answer, "4");
        assert_eq!(quiz.questions[0].explanation, "");
    }
}
