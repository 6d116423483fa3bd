use crate::traits::{ChatMessage, ChatRequest, Provider};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn query(&self, question: &str) -> Result<String>;
}

/// Answers questions from the `similarity_top_k` excerpts sharing the most
/// terms with the question.
pub struct ExcerptQueryEngine {
    provider: Arc<dyn Provider>,
    excerpts: Vec<String>,
    similarity_top_k: usize,
}

impl ExcerptQueryEngine {
    pub fn new(provider: Arc<dyn Provider>, excerpts: Vec<String>) -> Self {
        Self {
            provider,
            excerpts,
            similarity_top_k: 2,
        }
    }

    pub fn with_similarity_top_k(mut self, top_k: usize) -> Self {
        self.similarity_top_k = top_k.max(1);
        self
    }

    pub fn retrieve(&self, question: &str) -> Vec<&str> {
        let wanted = terms(question);
        let mut scored: Vec<(usize, &str)> = self
            .excerpts
            .iter()
            .map(|e| (terms(e).intersection(&wanted).count(), e.as_str()))
            .collect();
        // stable: ties keep document order
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(self.similarity_top_k)
            .map(|(_, e)| e)
            .collect()
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() > 2)
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl QueryEngine for ExcerptQueryEngine {
    async fn query(&self, question: &str) -> Result<String> {
        let context = self.retrieve(question).join("\n---\n");
        let messages = [
            ChatMessage::system(
                "Answer the question using only the context information provided. \
                 If the context does not contain the answer, say so.",
            ),
            ChatMessage::user(format!(
                "Context information is below.\n---\n{context}\n---\nQuery: {question}\nAnswer:"
            )),
        ];

        let reply = self.provider.chat(ChatRequest::new(&messages)).await?;
        Ok(reply.text_or_empty().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ScriptedProvider;

    fn excerpts() -> Vec<String> {
        vec![
            "The policy targets maternal mortality reduction.".into(),
            "Public health expenditure rises to 2.5 percent of GDP.".into(),
            "Health expenditure by states should exceed 8 percent of their budget.".into(),
        ]
    }

    #[test]
    fn ranks_by_shared_terms() {
        let engine = ExcerptQueryEngine::new(Arc::new(ScriptedProvider::default()), excerpts());
        let hits = engine.retrieve("How much public health expenditure of GDP?");
        assert_eq!(hits.len(), 2);
        assert!(hits[0].contains("GDP"));
        assert!(hits[1].contains("states"));
    }

    #[test]
    fn top_k_limits_context() {
        let engine = ExcerptQueryEngine::new(Arc::new(ScriptedProvider::default()), excerpts())
            .with_similarity_top_k(1);
        assert_eq!(engine.retrieve("maternal mortality").len(), 1);
    }

    #[tokio::test]
    async fn answers_with_retrieved_context() {
        let provider = Arc::new(ScriptedProvider::new(vec![ChatMessage::assistant(
            " 2.5 percent of GDP. ",
        )]));
        let engine = ExcerptQueryEngine::new(provider.clone(), excerpts());

        let answer = engine.query("What share of GDP goes to health?").await.unwrap();
        assert_eq!(answer, "2.5 percent of GDP.");

        let prompt = provider.requests()[0].messages[1].text_or_empty().to_string();
        assert!(prompt.contains("2.5 percent of GDP"));
        assert!(prompt.contains("Query: What share of GDP goes to health?"));
    }
}
