//! Embedded prompt templates
//!
//! Compiled into the binary and rendered with handlebars. The quiz prompt
//! asks for a complete JavaScript module so the response can be written to
//! the quizzes directory as-is.

use eyre::{eyre, Result};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use crate::domain::QuizId;

/// System prompt for quiz generation
pub const QUIZ_SYSTEM: &str = "You are an expert at creating educational quizzes based on research papers.";

/// User prompt template for quiz generation
///
/// `{{quiz_id}}` is substituted before sending.
pub const QUIZ_PROMPT: &str = r#"You are an expert at creating educational quizzes. I want you to create a quiz about a research paper that tests the reader's intuitions about the findings BEFORE they've read the paper. The use case here is geared towards understanding and testing intuitions about how AI models work, specifically for safety, and so predicting the outcome of concrete experiments.

Please analyze the attached PDF document and create:
1. A brief methodology summary (2-3 paragraphs) that explains the paper's approach without revealing specific findings.
2. 8-10 multiple-choice questions that test intuitions about the paper's findings.
   - Each question should have 4-8 options with 1 correct answer.
   - Questions should focus on the core findings from the paper.
   - Include additional context about the question, e.g. outlining the specifics of the experiment. This will be shown to the user BEFORE they answer the questions.
   - Include an explanation for why the correct answer is correct.

FORMAT YOUR RESPONSE AS A VALID JAVASCRIPT OBJECT with the following structure:

```javascript
// {{quiz_id}}.js - Quiz data for [Paper Title]

export const quizMetadata = {
  id: "{{quiz_id}}",
  title: "[Paper Title, potentially abbreviated]",
  description: "Test your intuitions about [brief paper description]",
};

export const methodologySummary = `
  [Your methodology summary here]
`;

export const questions = [
  {
    id: 1,
    question: "Question text?",
    options: ["Option A", "Option B", "Option C", "Option D"],
    correctAnswer: "Option B",
    explanation: "Explanation of why Option B is correct...",
    context: "Additional context about this question..."
  },
  // Additional questions...
];
```

Important:
- Make sure your output is valid JavaScript that can be directly saved to a file
- Don't include any additional explanations or comments in your response, just the JS object
- Ensure proper escaping of special characters in the strings
"#;

#[derive(Debug, Serialize)]
struct QuizPromptContext<'a> {
    quiz_id: &'a str,
}

/// Render the quiz generation prompt for one paper
pub fn quiz_prompt(quiz_id: &QuizId) -> Result<String> {
    debug!(%quiz_id, "quiz_prompt: called");
    let hbs = Handlebars::new();
    hbs.render_template(
        QUIZ_PROMPT,
        &QuizPromptContext {
            quiz_id: quiz_id.as_str(),
        },
    )
    .map_err(|e| eyre!("Failed to render quiz prompt: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_prompt_substitutes_id() {
        let id = QuizId::new("dec-2025-2301-00001").unwrap();
        let prompt = quiz_prompt(&id).unwrap();

        assert!(prompt.contains("// dec-2025-2301-00001.js"));
        assert!(prompt.contains("id: \"dec-2025-2301-00001\","));
        assert!(!prompt.contains("{{quiz_id}}"));
    }

    #[test]
    fn test_quiz_prompt_keeps_js_braces() {
        let id = QuizId::new("x-1").unwrap();
        let prompt = quiz_prompt(&id).unwrap();
        assert!(prompt.contains("export const quizMetadata = {"));
        assert!(prompt.contains("];"));
    }
}
