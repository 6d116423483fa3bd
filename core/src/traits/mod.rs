pub mod provider;
pub mod tool;

pub use provider::{ChatMessage, ChatRequest, Provider, Role, ToolCall, ToolChoice};
pub use tool::{ParamType, ParameterSpec, Tool, ToolSpec};
