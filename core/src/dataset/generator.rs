use crate::config::DatasetConfig;
use crate::dataset::{
    DatasetWriter, DocumentLoader, ExcerptQueryEngine, QueryEngine, QuestionExtractor,
    TextFileLoader, TokenTextSplitter,
};
use crate::traits::Provider;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub struct DatasetGenerator {
    provider: Arc<dyn Provider>,
    loader: Box<dyn DocumentLoader>,
    splitter: TokenTextSplitter,
    writer: DatasetWriter,
    questions_per_chunk: usize,
    similarity_top_k: usize,
}

impl DatasetGenerator {
    pub fn new(provider: Arc<dyn Provider>, writer: DatasetWriter) -> Self {
        Self {
            provider,
            loader: Box::new(TextFileLoader),
            splitter: TokenTextSplitter::default(),
            writer,
            questions_per_chunk: 10,
            similarity_top_k: 2,
        }
    }

    pub fn from_config(
        provider: Arc<dyn Provider>,
        config: &DatasetConfig,
        output: impl AsRef<Path>,
    ) -> Result<Self> {
        let writer = DatasetWriter::new(output, config.persona.clone());
        let mut generator = Self::new(provider, writer);
        generator.splitter = TokenTextSplitter::new(config.chunk_size, config.chunk_overlap)?;
        generator.questions_per_chunk = config.questions_per_chunk;
        generator.similarity_top_k = config.similarity_top_k;
        Ok(generator)
    }

    pub fn with_loader(mut self, loader: Box<dyn DocumentLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_splitter(mut self, splitter: TokenTextSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Generates question/answer pairs for the document at `input` and appends
    /// them to the output file. Returns how many records were written.
    pub async fn run(&self, input: &Path) -> Result<usize> {
        let documents = self.loader.load(input).await?;
        let chunks = self.splitter.split_documents(&documents);
        if chunks.is_empty() {
            warn!("No text found in {}", input.display());
            return Ok(0);
        }
        info!(
            documents = documents.len(),
            chunks = chunks.len(),
            "Loaded {}",
            input.display()
        );

        let extractor = QuestionExtractor::new(self.provider.clone())
            .with_questions(self.questions_per_chunk);
        let engine = ExcerptQueryEngine::new(self.provider.clone(), chunks.clone())
            .with_similarity_top_k(self.similarity_top_k);

        let mut written = 0;
        for (idx, chunk) in chunks.iter().enumerate() {
            let questions = extractor.extract(chunk).await?;
            info!(
                chunk = idx + 1,
                of = chunks.len(),
                questions = questions.len(),
                "Extracted questions"
            );

            for question in questions {
                let answer = engine.query(&question).await?;
                self.writer.append(&question, &answer).await?;
                written += 1;
            }
        }

        info!(records = written, "Wrote {}", self.writer.path().display());
        Ok(written)
    }
}
