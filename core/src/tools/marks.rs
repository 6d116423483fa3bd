use crate::tools::extract_i64_arg;
use crate::traits::{ParamType, ParameterSpec, Tool};
use async_trait::async_trait;
use serde_json::{Map, Value, json};

/// Marks lookup stub. Returns the same marks for every registration number.
pub struct MarksTool;

#[async_trait]
impl Tool for MarksTool {
    fn name(&self) -> &str {
        "get_my_marks"
    }

    fn description(&self) -> &str {
        "Returns the marks for the given registration number"
    }

    fn parameters(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::required(
            "registration_number",
            ParamType::Integer,
            "Registration id of the student",
        )]
    }

    async fn execute(&self, args: &Map<String, Value>) -> anyhow::Result<Value> {
        let registration_number = extract_i64_arg(args, "registration_number")?;

        Ok(json!({
            "registration_number": registration_number,
            "marks": { "CS": 90, "English": 89 },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_canned_marks() {
        let args = json!({ "registration_number": 1000 });
        let result = MarksTool.execute(args.as_object().unwrap()).await.unwrap();
        assert_eq!(
            result,
            json!({ "registration_number": 1000, "marks": { "CS": 90, "English": 89 } })
        );
    }
}
