//! Wire types shared by the client, tools and agents.

pub mod content;
mod message;
mod response;
mod tool;

pub use content::{ContentBlock, ThinkingBlock, ToolResultBlock, ToolUseBlock};
pub use message::{Message, MessageContent, Role};
pub use response::{ApiResponse, StopReason, Usage};
pub use tool::{ToolDefinition, ToolError};
