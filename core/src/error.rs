//! Errors raised while registering tools and running a dispatch cycle.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Error, Debug)]
pub enum DispatchError {
    /// The model asked for a tool that was never registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The argument payload could not be parsed or does not match the schema.
    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// The model service call failed. Never retried.
    #[error("Model service error: {0}")]
    Service(#[source] anyhow::Error),

    #[error("Tool '{tool}' failed: {source}")]
    ToolFailed {
        tool: String,
        #[source]
        source: anyhow::Error,
    },

    /// A tool result does not answer a request from the preceding assistant message.
    #[error("Tool result '{0}' does not match any pending tool call")]
    OrphanToolResult(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DispatchError {
    pub fn invalid_arguments(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}
