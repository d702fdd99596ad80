//! API response types.

use serde::{Deserialize, Serialize};

use super::{ContentBlock, ToolUseBlock};

/// Response from the Messages API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Unique identifier for this response
    #[serde(default)]
    pub id: String,
    /// Model that generated the response
    #[serde(default)]
    pub model: String,
    /// Content blocks in the response
    pub content: Vec<ContentBlock>,
    /// Reason for stopping
    pub stop_reason: Option<StopReason>,
    /// Sequence that caused stop (if stop_reason is "stop_sequence")
    #[serde(default)]
    pub stop_sequence: Option<String>,
    /// Token usage information
    #[serde(default)]
    pub usage: Usage,
}

/// Reason why Claude stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response
    EndTurn,
    /// Max tokens reached
    MaxTokens,
    /// Stop sequence encountered
    StopSequence,
    /// Tool use requested
    ToolUse,
    /// Long-running turn paused by the server
    PauseTurn,
    /// Model declined to respond
    Refusal,
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Input tokens consumed
    #[serde(default)]
    pub input_tokens: u32,
    /// Output tokens generated
    #[serde(default)]
    pub output_tokens: u32,
}

impl Usage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    pub fn add(&mut self, other: &Usage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

impl ApiResponse {
    pub fn new(content: Vec<ContentBlock>, stop_reason: StopReason) -> Self {
        Self {
            id: String::new(),
            model: String::new(),
            content,
            stop_reason: Some(stop_reason),
            stop_sequence: None,
            usage: Usage::default(),
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    /// Get the text content of the response (concatenated)
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Check if the response wants to use tools
    pub fn wants_tool_use(&self) -> bool {
        self.stop_reason == Some(StopReason::ToolUse)
    }

    /// Extract all tool use blocks
    pub fn tool_uses(&self) -> Vec<&ToolUseBlock> {
        self.content
            .iter()
            .filter_map(|block| block.as_tool_use())
            .collect()
    }
}
