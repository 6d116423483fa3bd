//! Synthetic question/answer dataset generation for chat fine-tuning.
//!
//! A source document is split into overlapping word windows. The model is
//! asked which questions each window can answer, every question is answered
//! against the whole document, and each pair lands in an append-only JSON
//! Lines file.

pub mod generator;
pub mod loader;
pub mod query;
pub mod questions;
pub mod splitter;
pub mod writer;

pub use generator::DatasetGenerator;
pub use loader::{Document, DocumentLoader, TextFileLoader};
pub use query::{ExcerptQueryEngine, QueryEngine};
pub use questions::QuestionExtractor;
pub use splitter::TokenTextSplitter;
pub use writer::{DatasetWriter, RecordMessage, TrainingRecord};

pub const DEFAULT_PERSONA: &str =
    "Dolly is a chatbot who can answer questions about Indian national policy";
