use crate::traits::{ChatMessage, ChatRequest, Provider};
use anyhow::Result;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You generate questions for a reading comprehension dataset. \
Only ask questions the excerpt itself answers. Prefer specific questions that are unlikely \
to be answered by other documents.";

/// Asks the model which questions a text excerpt can answer.
pub struct QuestionExtractor {
    provider: Arc<dyn Provider>,
    questions: usize,
}

impl QuestionExtractor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            questions: 10,
        }
    }

    pub fn with_questions(mut self, questions: usize) -> Self {
        self.questions = questions.max(1);
        self
    }

    pub async fn extract(&self, excerpt: &str) -> Result<Vec<String>> {
        let prompt = format!(
            "Here is the excerpt:\n\n{excerpt}\n\nGiven the contextual information, generate \
             {} questions this excerpt can answer. Write one question per line with no \
             numbering or extra text.",
            self.questions
        );
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];

        let reply = self.provider.chat(ChatRequest::new(&messages)).await?;
        let mut questions = parse_questions(reply.text_or_empty());
        questions.truncate(self.questions);
        Ok(questions)
    }
}

fn parse_questions(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(strip_list_marker)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let line = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
        .unwrap_or(line);

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim();
        }
    }
    line.trim()
}
