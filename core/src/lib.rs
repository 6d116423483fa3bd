pub mod agent;
pub mod config;
pub mod dataset;
pub mod error;
pub mod providers;
pub mod tools;
pub mod traits;

pub use agent::{Conversation, DispatchLoop, ToolRegistry};
pub use config::{Config, DatasetConfig};
pub use error::{DispatchError, Result};
pub use providers::*;
pub use traits::*;
