use crate::tools::{extract_i64_arg, extract_string_arg};
use crate::traits::{ParamType, ParameterSpec, Tool};
use async_trait::async_trait;
use serde_json::{Map, Value, json};

pub const LEAVE_TYPES: [&str; 2] = ["Sick Leave", "Holiday Leave"];

/// Leave application stub. Every request is approved.
pub struct LeaveTool;

#[async_trait]
impl Tool for LeaveTool {
    fn name(&self) -> &str {
        "apply_for_leave"
    }

    fn description(&self) -> &str {
        "A function which calls the internal API to apply for leave"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::required(
                "number_of_days",
                ParamType::Integer,
                "Number of days required",
            ),
            ParameterSpec::required("reason", ParamType::String, "Reason for leave"),
            ParameterSpec::required("type_of_leave", ParamType::String, "Sick or Holiday leave")
                .one_of(LEAVE_TYPES),
        ]
    }

    async fn execute(&self, args: &Map<String, Value>) -> anyhow::Result<Value> {
        let days = extract_i64_arg(args, "number_of_days")?;
        let reason = extract_string_arg(args, "reason")?;
        let kind = extract_string_arg(args, "type_of_leave")?;

        Ok(json!({
            "days": days,
            "reason": reason,
            "type": kind,
            "status": "approved",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn approves_request() {
        let args = json!({ "number_of_days": 2, "reason": "fever", "type_of_leave": "Sick Leave" });
        let result = LeaveTool
            .execute(args.as_object().unwrap())
            .await
            .unwrap();
        assert_eq!(
            result,
            json!({ "days": 2, "reason": "fever", "type": "Sick Leave", "status": "approved" })
        );
    }
}
