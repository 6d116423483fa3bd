pub mod conversation;
pub mod dispatch;
pub mod registry;

pub use conversation::Conversation;
pub use dispatch::DispatchLoop;
pub use registry::ToolRegistry;
