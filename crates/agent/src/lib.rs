//! Agentic web research for mcp-scout.
//!
//! An [`Agent`] drives an OpenAI-compatible chat model through a bounded
//! tool-calling loop. The model may fetch pages or search the web through the
//! [`ToolDispatcher`]; its final answer is normalized into JSON by
//! [`recover_json`].

pub mod agent;
pub mod conversation;
pub mod llm;
pub mod prompt;
pub mod recovery;
pub mod tools;

pub use agent::{Agent, AgentConfig, AgentError, AgentPhase, AgentRunState};
pub use conversation::Conversation;
pub use llm::{ChatModel, LlmError, OpenAiClient, OpenAiConfig};
pub use prompt::DEFAULT_SYSTEM_PROMPT;
pub use recovery::{RecoveryError, parse_model_json, recover_json};
pub use tools::{Tool, ToolDispatcher, ToolError};
