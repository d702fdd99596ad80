//! Agent configuration types.

use crate::prompts::{DEFAULT_SYSTEM_PROMPT, system_prompt};
use crate::{Error, Result};

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 8000;
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Immutable per-agent settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Identity; also the name peers use to hand off to this agent
    pub name: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Effective system prompt (preamble + caller instructions)
    pub system_prompt: String,
    /// Upper bound on LLM calls per run
    pub max_turns: usize,
    /// Maximum output tokens per response
    pub max_tokens: u32,
}

impl AgentConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: system_prompt(DEFAULT_SYSTEM_PROMPT),
            max_turns: DEFAULT_MAX_TURNS,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the caller instructions; the loop preamble is always kept in front.
    pub fn with_instructions(mut self, instructions: &str) -> Self {
        self.system_prompt = system_prompt(instructions);
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("agent name must not be empty".into()));
        }
        if self.max_turns == 0 {
            return Err(Error::Config(format!(
                "agent '{}': max_turns must be positive",
                self.name
            )));
        }
        if self.max_tokens == 0 {
            return Err(Error::Config(format!(
                "agent '{}': max_tokens must be positive",
                self.name
            )));
        }
        Ok(())
    }
}
