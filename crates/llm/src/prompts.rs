//! Prompt templates for each generation request.

use study_core::Difficulty;

pub fn summary(content: &str) -> String {
    format!(
        "Please provide a concise but comprehensive summary of the following study material:

{content}

The summary should:
1. Highlight the main ideas and concepts
2. Include key facts and important details
3. Be organized in a clear, logical structure
4. Be suitable for a student reviewing this material
"
    )
}

pub fn quiz(content: &str, question_count: u32, difficulty: Difficulty) -> String {
    format!(
        r#"Create a {difficulty} difficulty quiz with {question_count} multiple-choice questions based on the following study material:

{content}

Format your response as valid JSON with the following structure:
{{
  "questions": [
    {{
      "question": "Question text here?",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correct_answer": "Option A",
      "explanation": "Why this answer is correct"
    }}
  ]
}}

Make sure each question tests understanding, not just memorization. Include an explanation for each correct answer.
"#
    )
}

const EXPLANATION_GOALS: &str = "Your explanation should:
1. Break down complex ideas into simpler components
2. Use examples to illustrate key points
3. Explain any relevant terminology
4. Connect this topic to broader concepts where relevant
5. Include a summary of the main points at the end
";

pub fn explanation(topic: &str, context: Option<&str>) -> String {
    match context {
        Some(context) => format!(
            "Please provide a detailed explanation of the following topic/concept:

Topic: {topic}

Use the following context or study material to inform your explanation:
{context}

{EXPLANATION_GOALS}"
        ),
        None => format!(
            "Please provide a detailed explanation of the following topic/concept:

Topic: {topic}

{EXPLANATION_GOALS}"
        ),
    }
}

pub fn key_points(text: &str, max_points: usize) -> String {
    format!(
        "Extract the {max_points} most important key points from the following text:

{text}

Format your response as a list, with each key point clearly and briefly stated.
"
    )
}

pub fn categories(text: &str) -> String {
    format!(
        r#"Analyze the following study material and categorize it into 3-5 main topics or sections:

{text}

For each category/topic, provide:
1. A clear title for the category
2. A brief summary of what this category covers
3. The key points within this category

Format your response as a JSON object with this structure:
{{
  "categories": [
    {{
      "title": "Category Title",
      "summary": "Brief summary of this category",
      "key_points": ["Point 1", "Point 2", "Point 3"]
    }}
  ]
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_prompt_carries_parameters() {
        let prompt = quiz("Cells divide by mitosis.", 7, Difficulty::Hard);
        assert!(prompt.starts_with("Create a hard difficulty quiz with 7 multiple-choice questions"));
        assert!(prompt.contains("Cells divide by mitosis."));
        assert!(prompt.contains("\"correct_answer\""));
        assert!(prompt.contains("tests understanding, not just memorization"));
    }

    #[test]
    fn explanation_variants() {
        let with = explanation("Entropy", Some("Thermodynamics notes"));
        let without = explanation("Entropy", None);
        assert!(with.contains("Topic: Entropy"));
        assert!(with.contains("Thermodynamics notes"));
        assert!(!without.contains("context or study material"));
        assert!(without.ends_with("at the end\n"));
    }

    #[test]
    fn summary_prompt_embeds_content() {
        assert!(summary("Photosynthesis").contains("\n\nPhotosynthesis\n\n"));
    }
}
