//! # claude-handoff
//!
//! Tool-using, delegating agents on top of Anthropic's Messages API.
//!
//! An [`Agent`] talks to the model in a loop: whenever the model asks for tools,
//! the agent runs them (concurrently) and feeds the results back; whenever it asks
//! to hand the conversation to a peer agent, the peer takes over and its answer
//! becomes the final one. The loop ends on a plain answer or when the turn budget
//! runs out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use claude_handoff::{Agent, tools::math};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), claude_handoff::Error> {
//!     let calculator = Arc::new(
//!         Agent::builder("calculator")
//!             .system_prompt("You are a precise calculator. Always use tools.")
//!             .tools(&math::registry())
//!             .tool_schemas(&math::definitions())
//!             .build()?,
//!     );
//!
//!     let assistant = Agent::builder("assistant")
//!         .handoff(calculator)
//!         .build()?;
//!
//!     let result = assistant.execute("What is 15 + 27?").await?;
//!     println!("{}", result.text());
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod agent;
pub mod client;
pub mod prompts;
pub mod tools;
pub mod types;

pub use agent::{
    Agent, AgentBuilder, AgentConfig, AgentDirectory, AgentResult, AgentTool, HandoffTarget,
};
pub use client::{AnthropicClient, ClientConfig, CreateMessageRequest, LlmClient};
pub use tools::{SchemaTool, Tool, ToolArgs, ToolRegistry, async_tool_fn, tool_fn};
pub use types::{
    ApiResponse, ContentBlock, Message, MessageContent, Role, StopReason, ToolDefinition,
    ToolError, ToolResultBlock, ToolUseBlock, Usage,
};

/// Error type for claude-handoff operations.
///
/// Tool and handoff failures never show up here: they are turned into
/// `tool_result` blocks the model can read. What does surface is LLM-client
/// failure, protocol violations by the model, and budget exhaustion.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// API returned an error response.
    #[error("API error (HTTP {status}): {message}", status = status.map(|s| s.to_string()).unwrap_or_else(|| "unknown".into()))]
    Api {
        message: String,
        status: Option<u16>,
        error_type: Option<String>,
    },

    /// API rate limit exceeded.
    #[error("Rate limit exceeded{}", match retry_after {
        Some(d) => format!(", retry in {:.0}s", d.as_secs_f64()),
        None => String::new(),
    })]
    RateLimit {
        retry_after: Option<std::time::Duration>,
    },

    /// Network connectivity or request failed.
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request parameters are invalid.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The model stopped for tool use without naming any tool.
    #[error("Agent '{agent}': model requested tool use but sent no tool_use blocks")]
    MalformedToolUse { agent: String },

    /// The turn budget ran out before the model produced a final answer.
    #[error("Agent '{agent}': max turns reached ({max_turns})")]
    MaxTurnsExceeded { agent: String, max_turns: usize },

    /// Tool execution failed.
    #[error("Tool execution failed: {0}")]
    Tool(#[from] types::ToolError),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration, validation, or authorization errors
    Configuration,
    /// Network, rate limit, or server errors that may succeed on retry
    Transient,
    /// The model broke the tool-use protocol
    Protocol,
    /// Turn budget exhausted
    ResourceLimit,
    /// Internal errors (JSON, tools, unexpected states)
    Internal,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidRequest(_) => ErrorCategory::Configuration,
            Error::Api {
                status: Some(400..=403),
                ..
            } => ErrorCategory::Configuration,

            Error::Network(_) | Error::RateLimit { .. } => ErrorCategory::Transient,
            Error::Api {
                status: Some(500..=599),
                ..
            } => ErrorCategory::Transient,

            Error::MalformedToolUse { .. } => ErrorCategory::Protocol,
            Error::MaxTurnsExceeded { .. } => ErrorCategory::ResourceLimit,

            Error::Json(_) | Error::Tool(_) | Error::Api { .. } => ErrorCategory::Internal,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }

    pub fn is_max_turns(&self) -> bool {
        matches!(self, Error::MaxTurnsExceeded { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => *status,
            Error::RateLimit { .. } => Some(429),
            _ => None,
        }
    }
}

/// Result type alias for claude-handoff operations.
pub type Result<T> = std::result::Result<T, Error>;
