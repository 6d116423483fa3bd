use crate::error::{DispatchError, Result};
use crate::traits::{ParameterSpec, Tool, ToolSpec};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Tools available to the model, kept in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        if self.get(tool.name()).is_some() {
            return Err(DispatchError::DuplicateTool(tool.name().to_string()));
        }
        tracing::debug!("Registered tool: {}", tool.name());
        self.tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn invoke(&self, name: &str, args: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

        let args = validate_arguments(name, &tool.parameters(), args)?;

        tool.execute(&args)
            .await
            .map_err(|source| DispatchError::ToolFailed {
                tool: name.to_string(),
                source,
            })
    }
}

fn validate_arguments(
    tool: &str,
    params: &[ParameterSpec],
    args: Value,
) -> Result<Map<String, Value>> {
    let args = match args {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(DispatchError::invalid_arguments(
                tool,
                format!("expected a JSON object, got {other}"),
            ));
        }
    };

    for param in params {
        match args.get(&param.name) {
            None | Some(Value::Null) if param.required => {
                return Err(DispatchError::invalid_arguments(
                    tool,
                    format!("missing required parameter '{}'", param.name),
                ));
            }
            None | Some(Value::Null) => {}
            Some(value) => {
                if !param.kind.matches(value) {
                    return Err(DispatchError::invalid_arguments(
                        tool,
                        format!(
                            "parameter '{}' must be of type {}, got {value}",
                            param.name,
                            param.kind.as_str()
                        ),
                    ));
                }
                if let Some(allowed) = &param.allowed
                    && !allowed.contains(value)
                {
                    return Err(DispatchError::invalid_arguments(
                        tool,
                        format!("parameter '{}' does not accept {value}", param.name),
                    ));
                }
            }
        }
    }

    Ok(args)
}
