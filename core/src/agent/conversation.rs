use crate::error::{DispatchError, Result};
use crate::traits::{ChatMessage, Role};

/// Append-only message history for one dispatch cycle.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_message(content: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::user(content)],
        }
    }

    /// Appends `message`. A tool result must answer a call made by the latest
    /// assistant message, with only other tool results in between, and in the
    /// order the calls were made.
    pub fn push(&mut self, message: ChatMessage) -> Result<()> {
        if message.role == Role::Tool {
            self.check_tool_result(&message)?;
        }
        self.messages.push(message);
        Ok(())
    }

    fn check_tool_result(&self, message: &ChatMessage) -> Result<()> {
        let id = message.tool_call_id.as_deref().unwrap_or_default();
        let orphan = || DispatchError::OrphanToolResult(id.to_string());

        let answered = self
            .messages
            .iter()
            .rev()
            .take_while(|m| m.role == Role::Tool)
            .count();
        let request = self
            .messages
            .len()
            .checked_sub(answered + 1)
            .map(|idx| &self.messages[idx])
            .filter(|m| m.role == Role::Assistant)
            .ok_or_else(orphan)?;

        match request.tool_calls.get(answered) {
            Some(call) if call.id == id => Ok(()),
            _ => Err(orphan()),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ToolCall;

    fn requesting(ids: &[&str]) -> Conversation {
        let mut conversation = Conversation::with_user_message("hi");
        let calls = ids
            .iter()
            .map(|id| ToolCall::new(*id, "get_my_marks", "{}"))
            .collect();
        conversation
            .push(ChatMessage::assistant_with_tool_calls(None, calls))
            .unwrap();
        conversation
    }

    #[test]
    fn accepts_results_in_request_order() {
        let mut conversation = requesting(&["a", "b"]);
        conversation
            .push(ChatMessage::tool_result("a", "get_my_marks", "{}"))
            .unwrap();
        conversation
            .push(ChatMessage::tool_result("b", "get_my_marks", "{}"))
            .unwrap();
        assert_eq!(conversation.len(), 4);
    }

    #[test]
    fn rejects_out_of_order_result() {
        let mut conversation = requesting(&["a", "b"]);
        let err = conversation
            .push(ChatMessage::tool_result("b", "get_my_marks", "{}"))
            .unwrap_err();
        assert!(matches!(err, DispatchError::OrphanToolResult(id) if id == "b"));
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn rejects_result_without_request() {
        let mut conversation = Conversation::with_user_message("hi");
        assert!(
            conversation
                .push(ChatMessage::tool_result("a", "get_my_marks", "{}"))
                .is_err()
        );
    }

    #[test]
    fn rejects_extra_result() {
        let mut conversation = requesting(&["a"]);
        conversation
            .push(ChatMessage::tool_result("a", "get_my_marks", "{}"))
            .unwrap();
        assert!(
            conversation
                .push(ChatMessage::tool_result("a", "get_my_marks", "{}"))
                .is_err()
        );
    }
}
