use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub source: PathBuf,
}

/// Turns a file into documents. Format-specific extraction (PDF and the like)
/// lives behind this trait.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<Vec<Document>>;
}

/// Loads a UTF-8 text file as a single document.
pub struct TextFileLoader;

#[async_trait]
impl DocumentLoader for TextFileLoader {
    async fn load(&self, path: &Path) -> Result<Vec<Document>> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read document {}", path.display()))?;

        if text.trim().is_empty() {
            tracing::warn!("Document {} is empty", path.display());
            return Ok(vec![]);
        }

        Ok(vec![Document {
            text,
            source: path.to_path_buf(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn loads_text_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("policy.txt");
        std::fs::write(&path, "Health for all.").unwrap();

        let docs = TextFileLoader.load(&path).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "Health for all.");
        assert_eq!(docs[0].source, path);
    }

    #[tokio::test]
    async fn skips_blank_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blank.txt");
        std::fs::write(&path, "  \n\n").unwrap();

        assert!(TextFileLoader.load(&path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(TextFileLoader.load(&tmp.path().join("nope.txt")).await.is_err());
    }
}
