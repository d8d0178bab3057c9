//! Scripted chat model for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatModel, ChatRequest, ChatResponse, LlmError, Result};

/// Replays canned responses in order and records every request.
///
/// When the script runs out, the last response is repeated if `repeat_last`
/// is set; otherwise the call fails.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<ChatResponse>>,
    repeat_last: Option<ChatResponse>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self { responses: Mutex::new(responses.into()), repeat_last: None, requests: Mutex::new(Vec::new()) }
    }

    /// Answer every request with `response`.
    pub fn always(response: ChatResponse) -> Self {
        Self { responses: Mutex::new(VecDeque::new()), repeat_last: Some(response), requests: Mutex::new(Vec::new()) }
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);

        if let Some(next) = self.responses.lock().unwrap().pop_front() {
            return Ok(next);
        }
        self.repeat_last
            .clone()
            .ok_or_else(|| LlmError::InvalidRequest("scripted model: no more responses".to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
