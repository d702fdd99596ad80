//! Agent run results.

use crate::types::{Message, Usage};

/// Outcome of a completed run.
///
/// When a run ends through a handoff this is the peer's result, unchanged:
/// `agent` names the peer and `messages` is the peer's conversation.
#[derive(Debug, Clone)]
pub struct AgentResult {
    /// Name of the agent that produced the final answer
    pub agent: String,
    /// Final answer: the text blocks of the last response, concatenated
    pub text: String,
    /// Full conversation, ending with the final assistant message
    pub messages: Vec<Message>,
    /// LLM calls made by the answering agent
    pub turns: usize,
    /// Token usage summed over the answering agent's LLM calls
    pub usage: Usage,
}

impl AgentResult {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn total_tokens(&self) -> u32 {
        self.usage.total()
    }

    /// Split into `(messages, text)`.
    pub fn into_parts(self) -> (Vec<Message>, String) {
        (self.messages, self.text)
    }
}
