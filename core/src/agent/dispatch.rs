use crate::agent::{Conversation, ToolRegistry};
use crate::error::{DispatchError, Result};
use crate::traits::{ChatMessage, ChatRequest, Provider, ToolCall};
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_MAX_ROUNDS: usize = 1;

/// Sends a conversation to the model, runs the tools it asks for and returns
/// the model's answer once it has seen their results.
pub struct DispatchLoop {
    provider: Arc<dyn Provider>,
    tool_registry: Arc<ToolRegistry>,
    max_rounds: usize,
}

impl DispatchLoop {
    pub fn new(provider: Arc<dyn Provider>, tool_registry: Arc<ToolRegistry>) -> Self {
        Self {
            provider,
            tool_registry,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Number of tool execution rounds allowed before the model must answer
    /// without tools. Clamped to at least one.
    pub fn with_max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max.max(1);
        self
    }

    pub async fn run(&self, message: &str) -> Result<ChatMessage> {
        let mut conversation = Conversation::with_user_message(message);
        self.run_conversation(&mut conversation).await
    }

    /// Runs one dispatch cycle over `conversation`. The final assistant reply is
    /// returned, not appended.
    pub async fn run_conversation(&self, conversation: &mut Conversation) -> Result<ChatMessage> {
        let specs = self.tool_registry.specs();
        let mut reply = self
            .send(ChatRequest::new(conversation.messages()).with_tools(&specs))
            .await?;

        for round in 1..=self.max_rounds {
            if !reply.has_tool_calls() {
                return Ok(reply);
            }

            let tool_calls = reply.tool_calls.clone();
            conversation.push(reply)?;
            info!(round, calls = tool_calls.len(), "Executing tool calls");

            for tool_call in &tool_calls {
                let result = self.execute(tool_call).await?;
                conversation.push(ChatMessage::tool_result(
                    &tool_call.id,
                    &tool_call.name,
                    result,
                ))?;
            }

            let request = ChatRequest::new(conversation.messages());
            let request = if round < self.max_rounds {
                request.with_tools(&specs)
            } else {
                request
            };
            reply = self.send(request).await?;
        }

        Ok(reply)
    }

    async fn send(&self, request: ChatRequest<'_>) -> Result<ChatMessage> {
        debug!(
            provider = self.provider.name(),
            messages = request.messages.len(),
            tools = request.tools.map_or(0, <[_]>::len),
            "Sending chat request"
        );
        self.provider
            .chat(request)
            .await
            .map_err(DispatchError::Service)
    }

    async fn execute(&self, tool_call: &ToolCall) -> Result<String> {
        let args: serde_json::Value = if tool_call.arguments.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&tool_call.arguments).map_err(|e| {
                DispatchError::invalid_arguments(&tool_call.name, format!("malformed JSON: {e}"))
            })?
        };

        debug!(tool = %tool_call.name, id = %tool_call.id, "Invoking tool");
        let result = self.tool_registry.invoke(&tool_call.name, args).await?;
        Ok(serde_json::to_string(&result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ScriptedProvider;
    use crate::tools::{LeaveTool, MarksTool};
    use crate::traits::{Role, ToolChoice};

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(LeaveTool)).unwrap();
        registry.register(Arc::new(MarksTool)).unwrap();
        Arc::new(registry)
    }

    fn marks_call(id: &str) -> ChatMessage {
        ChatMessage::assistant_with_tool_calls(
            None,
            vec![ToolCall::new(id, "get_my_marks", r#"{"registration_number": 1000}"#)],
        )
    }

    #[tokio::test]
    async fn plain_reply_is_returned_unchanged() {
        let provider = Arc::new(ScriptedProvider::new(vec![ChatMessage::assistant("Hello!")]));
        let dispatch = DispatchLoop::new(provider.clone(), registry());

        let reply = dispatch.run("Hi there").await.unwrap();

        assert_eq!(reply, ChatMessage::assistant("Hello!"));
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages, vec![ChatMessage::user("Hi there")]);
        assert_eq!(requests[0].tool_names, vec!["apply_for_leave", "get_my_marks"]);
        assert_eq!(requests[0].tool_choice, Some(ToolChoice::Auto));
    }

    #[tokio::test]
    async fn single_tool_call_feeds_result_back() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            marks_call("call_1"),
            ChatMessage::assistant("You scored 90 in CS and 89 in English."),
        ]));
        let dispatch = DispatchLoop::new(provider.clone(), registry());

        let reply = dispatch
            .run("What is my marks for registration 1000?")
            .await
            .unwrap();
        assert_eq!(
            reply.content.as_deref(),
            Some("You scored 90 in CS and 89 in English.")
        );

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);

        let last = &requests[1];
        assert!(last.tool_names.is_empty());
        assert_eq!(last.tool_choice, None);

        let tool_messages: Vec<&ChatMessage> =
            last.messages.iter().filter(|m| m.role == Role::Tool).collect();
        assert_eq!(tool_messages.len(), 1);
        assert_eq!(tool_messages[0].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(tool_messages[0].name.as_deref(), Some("get_my_marks"));

        let content: serde_json::Value =
            serde_json::from_str(tool_messages[0].content.as_deref().unwrap()).unwrap();
        assert_eq!(
            content,
            serde_json::json!({ "registration_number": 1000, "marks": { "CS": 90, "English": 89 } })
        );
    }

    #[tokio::test]
    async fn tool_results_follow_request_order() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ChatMessage::assistant_with_tool_calls(
                None,
                vec![
                    ToolCall::new(
                        "call_leave",
                        "apply_for_leave",
                        r#"{"number_of_days": 1, "reason": "fever", "type_of_leave": "Sick Leave"}"#,
                    ),
                    ToolCall::new("call_marks", "get_my_marks", r#"{"registration_number": 7}"#),
                ],
            ),
            ChatMessage::assistant("Done."),
        ]));
        let dispatch = DispatchLoop::new(provider.clone(), registry());

        let mut conversation = Conversation::with_user_message("Leave and marks please");
        dispatch.run_conversation(&mut conversation).await.unwrap();

        let ids: Vec<&str> = conversation
            .messages()
            .iter()
            .filter_map(|m| m.tool_call_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["call_leave", "call_marks"]);
        assert_eq!(conversation.len(), 4);
    }

    #[tokio::test]
    async fn unknown_tool_surfaces_and_leaves_conversation_untouched() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ChatMessage::assistant_with_tool_calls(
                None,
                vec![ToolCall::new("call_x", "format_disk", "{}")],
            ),
            ChatMessage::assistant("unreachable"),
        ]));
        let dispatch = DispatchLoop::new(provider.clone(), registry());

        let mut conversation = Conversation::with_user_message("Wipe it");
        let err = dispatch
            .run_conversation(&mut conversation)
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::UnknownTool(name) if name == "format_disk"));
        assert_eq!(conversation.len(), 2);
        assert!(conversation.messages().iter().all(|m| m.role != Role::Tool));
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn malformed_arguments_are_invalid() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ChatMessage::assistant_with_tool_calls(
                None,
                vec![ToolCall::new("call_1", "get_my_marks", "{registration_number: ")],
            ),
        ]));
        let dispatch = DispatchLoop::new(provider, registry());

        let err = dispatch.run("marks?").await.unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn missing_argument_is_invalid() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ChatMessage::assistant_with_tool_calls(
                None,
                vec![ToolCall::new("call_1", "get_my_marks", "{}")],
            ),
        ]));
        let dispatch = DispatchLoop::new(provider, registry());

        let err = dispatch.run("marks?").await.unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn service_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let dispatch = DispatchLoop::new(provider, registry());

        let err = dispatch.run("hello").await.unwrap_err();
        assert!(matches!(err, DispatchError::Service(_)));
    }

    #[tokio::test]
    async fn single_round_does_not_loop_back() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            marks_call("call_1"),
            marks_call("call_2"),
        ]));
        let dispatch = DispatchLoop::new(provider.clone(), registry());

        let reply = dispatch.run("marks?").await.unwrap();
        assert!(reply.has_tool_calls());
        assert_eq!(provider.requests().len(), 2);
    }

    #[tokio::test]
    async fn extra_rounds_readvertise_tools() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            marks_call("call_1"),
            marks_call("call_2"),
            ChatMessage::assistant("Still 90 in CS."),
        ]));
        let dispatch = DispatchLoop::new(provider.clone(), registry()).with_max_rounds(2);

        let reply = dispatch.run("marks?").await.unwrap();
        assert_eq!(reply.content.as_deref(), Some("Still 90 in CS."));

        let requests = provider.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].tool_names.len(), 2);
        assert!(requests[2].tool_names.is_empty());
    }
}
