//! Message types for the Claude API.

use serde::{Deserialize, Serialize};

use super::{ContentBlock, ToolResultBlock, ToolUseBlock};

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant (Claude) message
    Assistant,
}

/// Content of a message: a bare string or an ordered list of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<ContentBlock>> for MessageContent {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        Self::Blocks(blocks)
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: MessageContent,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_with_content(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Blocks(content),
        }
    }

    pub fn assistant_with_content(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(content),
        }
    }

    pub fn tool_results(results: Vec<ToolResultBlock>) -> Self {
        Self::user_with_content(results.into_iter().map(ContentBlock::ToolResult).collect())
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        match &self.content {
            MessageContent::Blocks(blocks) => blocks,
            MessageContent::Text(_) => &[],
        }
    }

    /// Concatenated text of the message, with no separator between blocks.
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|block| block.as_text())
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    pub fn has_tool_use(&self) -> bool {
        self.blocks().iter().any(ContentBlock::is_tool_use)
    }

    pub fn tool_uses(&self) -> Vec<&ToolUseBlock> {
        self.blocks()
            .iter()
            .filter_map(|block| block.as_tool_use())
            .collect()
    }

    pub fn tool_results_iter(&self) -> impl Iterator<Item = &ToolResultBlock> {
        self.blocks().iter().filter_map(|block| block.as_tool_result())
    }

    /// Whether this message carries the tool invocation with the given id.
    pub fn contains_tool_use(&self, id: &str) -> bool {
        self.tool_uses().iter().any(|tool_use| tool_use.id == id)
    }
}
