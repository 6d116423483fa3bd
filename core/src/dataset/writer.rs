use crate::traits::Role;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordMessage {
    pub role: Role,
    pub content: String,
}

/// One fine-tuning example: persona, question, answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingRecord {
    pub messages: Vec<RecordMessage>,
}

impl TrainingRecord {
    pub fn new(persona: &str, question: &str, answer: &str) -> Self {
        let message = |role, content: &str| RecordMessage {
            role,
            content: content.to_string(),
        };
        Self {
            messages: vec![
                message(Role::System, persona),
                message(Role::User, question),
                message(Role::Assistant, answer),
            ],
        }
    }
}

/// Appends training records to a JSON Lines file. Existing lines are never
/// rewritten.
pub struct DatasetWriter {
    path: PathBuf,
    persona: String,
}

impl DatasetWriter {
    pub fn new(path: impl AsRef<Path>, persona: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            persona: persona.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, question: &str, answer: &str) -> Result<()> {
        let record = TrainingRecord::new(&self.persona, question, answer);
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        file.flush().await?;

        Ok(())
    }
}
