use serde_json::{Map, Value};

pub mod leave;
pub mod marks;

pub use leave::LeaveTool;
pub use marks::MarksTool;

use crate::agent::ToolRegistry;
use std::sync::Arc;

/// Registry holding the student-services tools, in advertising order.
pub fn student_registry() -> crate::error::Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(LeaveTool))?;
    registry.register(Arc::new(MarksTool))?;
    Ok(registry)
}

pub fn extract_string_arg(args: &Map<String, Value>, key: &str) -> anyhow::Result<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' parameter", key))
        .map(|s| s.to_string())
}

pub fn extract_i64_arg(args: &Map<String, Value>, key: &str) -> anyhow::Result<i64> {
    args.get(key)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' parameter", key))
}
