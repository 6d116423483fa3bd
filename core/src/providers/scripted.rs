use crate::traits::{ChatMessage, ChatRequest, Provider, ToolChoice};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// What a [`ScriptedProvider`] was asked, captured per call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    pub tool_names: Vec<String>,
    pub tool_choice: Option<ToolChoice>,
}

/// Replays canned assistant messages in order and records every request.
/// Fails once the script is exhausted.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ChatMessage>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<ChatMessage>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.replies).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatMessage> {
        lock(&self.requests).push(RecordedRequest {
            messages: request.messages.to_vec(),
            tool_names: request
                .tools
                .unwrap_or_default()
                .iter()
                .map(|t| t.name.clone())
                .collect(),
            tool_choice: request.tool_choice,
        });

        lock(&self.replies)
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No scripted reply left"))
    }
}
