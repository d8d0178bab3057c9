//! Bounded tool-calling loop.
//!
//! The loop moves through [`AgentPhase`]s:
//!
//! - `Dispatching` seeds the conversation (system prompt, profile text and,
//!   when links were supplied, the fetch-everything instruction).
//! - `AwaitingModel` sends the conversation with tools attached. A tool-call
//!   answer moves to `ExecutingTools`; anything else moves to `Finalizing`.
//!   Once `max_iterations` tool turns have run, it finalizes with `forced` set.
//! - `ExecutingTools` runs every requested call in order and appends one
//!   tool message per call.
//! - `Finalizing` asks for the JSON answer in JSON-only mode. A forced
//!   finalization keeps the tool definitions but disables them.
//! - `Done` hands the raw answer to [`recover_json`].

use std::sync::Arc;

use scout_core::AppConfig;

use crate::conversation::Conversation;
use crate::llm::{ChatMessage, ChatModel, ChatRequest, ChatResponse, FinishReason, LlmError, ResponseFormat, ToolCall, ToolChoice};
use crate::prompt::{DEFAULT_SYSTEM_PROMPT, FINAL_JSON_INSTRUCTION, profile_message, url_instruction};
use crate::recovery::recover_json;
use crate::tools::{ToolDispatcher, definitions};

/// Sampling and iteration limits for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Tool turns before a forced finalization
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { temperature: 0.3, max_tokens: 8000, max_iterations: 10 }
    }
}

impl From<&AppConfig> for AgentConfig {
    fn from(config: &AppConfig) -> Self {
        Self { temperature: config.temperature, max_tokens: config.max_tokens, max_iterations: config.max_iterations }
    }
}

/// Where the loop currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentPhase {
    Dispatching,
    AwaitingModel,
    ExecutingTools(Vec<ToolCall>),
    Finalizing { forced: bool },
    Done,
}

/// Per-run state; never shared between runs.
#[derive(Debug, Clone, Default)]
pub struct AgentRunState {
    pub iteration: usize,
    pub conversation: Conversation,
    pub final_result: Option<String>,
    pub model_calls: usize,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AgentError {
    #[error("model call failed: {0}")]
    Model(#[from] LlmError),
}

impl From<AgentError> for scout_core::Error {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Model(e) => e.into(),
        }
    }
}

/// Drives a model through web research to a JSON answer.
#[derive(Clone)]
pub struct Agent {
    model: Arc<dyn ChatModel>,
    tools: ToolDispatcher,
    config: AgentConfig,
}

impl Agent {
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolDispatcher, config: AgentConfig) -> Self {
        Self { model, tools, config }
    }

    /// Run the loop and return the normalized JSON answer.
    pub async fn run(&self, input: &str, system_prompt: Option<&str>, urls: &[String]) -> Result<String, AgentError> {
        let state = self.execute(input, system_prompt, urls).await?;
        Ok(recover_json(state.final_result.as_deref().unwrap_or_default()))
    }

    /// Run the loop and return the final state, raw answer included.
    pub async fn execute(
        &self, input: &str, system_prompt: Option<&str>, urls: &[String],
    ) -> Result<AgentRunState, AgentError> {
        let mut state = AgentRunState::default();
        let mut phase = AgentPhase::Dispatching;

        loop {
            phase = match phase {
                AgentPhase::Dispatching => {
                    let system = system_prompt.filter(|p| !p.trim().is_empty()).unwrap_or(DEFAULT_SYSTEM_PROMPT);
                    state.conversation.push(ChatMessage::system(system));
                    state.conversation.push(ChatMessage::user(profile_message(input)));
                    if !urls.is_empty() {
                        state.conversation.push(ChatMessage::user(url_instruction(urls)));
                    }

                    tracing::info!(
                        backend = self.model.name(),
                        urls = urls.len(),
                        max_iterations = self.config.max_iterations,
                        "starting agent run"
                    );
                    AgentPhase::AwaitingModel
                }
                AgentPhase::AwaitingModel if state.iteration >= self.config.max_iterations => {
                    tracing::warn!(iteration = state.iteration, "iteration limit reached, forcing final answer");
                    AgentPhase::Finalizing { forced: true }
                }
                AgentPhase::AwaitingModel => {
                    let request = self.request(&state.conversation, true, Some(ToolChoice::Auto), None);
                    let response = self.call(&mut state, request).await?;

                    tracing::debug!(
                        iteration = state.iteration,
                        finish_reason = response.finish_reason.as_str(),
                        tool_calls = response.message.tool_calls.len(),
                        "model turn"
                    );

                    if response.finish_reason == FinishReason::ToolCalls {
                        let calls = response.message.tool_calls.clone();
                        state.conversation.push(response.message);
                        AgentPhase::ExecutingTools(calls)
                    } else {
                        AgentPhase::Finalizing { forced: false }
                    }
                }
                AgentPhase::ExecutingTools(calls) => {
                    for call in &calls {
                        let payload = self.tools.dispatch(call).await;
                        state.conversation.push(ChatMessage::tool_result(call, &payload));
                    }
                    state.iteration += 1;
                    AgentPhase::AwaitingModel
                }
                AgentPhase::Finalizing { forced } => {
                    state.conversation.push(ChatMessage::user(FINAL_JSON_INSTRUCTION));
                    let request = if forced {
                        self.request(&state.conversation, true, Some(ToolChoice::Disabled), Some(ResponseFormat::json_object()))
                    } else {
                        self.request(&state.conversation, false, None, Some(ResponseFormat::json_object()))
                    };

                    let response = self.call(&mut state, request).await?;
                    state.final_result = Some(response.message.content.unwrap_or_default());
                    AgentPhase::Done
                }
                AgentPhase::Done => break,
            };
        }

        tracing::info!(
            iterations = state.iteration,
            model_calls = state.model_calls,
            messages = state.conversation.len(),
            "agent run finished"
        );
        Ok(state)
    }

    fn request(
        &self, conversation: &Conversation, with_tools: bool, tool_choice: Option<ToolChoice>,
        response_format: Option<ResponseFormat>,
    ) -> ChatRequest {
        ChatRequest {
            messages: conversation.snapshot(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            tools: if with_tools { definitions() } else { Vec::new() },
            tool_choice,
            response_format,
        }
    }

    async fn call(
        &self, state: &mut AgentRunState, request: ChatRequest,
    ) -> Result<ChatResponse, AgentError> {
        state.model_calls += 1;
        self.model.complete(request).await.map_err(|e| {
            tracing::error!(iteration = state.iteration, error = %e, "model call failed");
            AgentError::Model(e)
        })
    }
}
