//! Agent definition and request building.

use std::fmt;
use std::sync::Arc;

use super::config::AgentConfig;
use super::handoff::{HandoffTarget, handoff_definition};
use super::builder::AgentBuilder;
use crate::client::{CreateMessageRequest, LlmClient};
use crate::tools::ToolRegistry;
use crate::types::{Message, ToolDefinition};

/// An LLM-driven agent.
///
/// Everything is fixed at construction; `run` keeps its conversation local,
/// so one `Arc<Agent>` can serve many concurrent runs.
pub struct Agent {
    pub(crate) config: AgentConfig,
    pub(crate) client: Arc<dyn LlmClient>,
    pub(crate) tools: ToolRegistry,
    pub(crate) tool_schemas: Vec<ToolDefinition>,
    pub(crate) handoffs: Vec<HandoffTarget>,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.config.name)
            .field("model", &self.config.model)
            .field("max_turns", &self.config.max_turns)
            .field("tools", &self.tools)
            .field("handoffs", &self.handoff_names())
            .finish_non_exhaustive()
    }
}

impl Agent {
    pub fn builder(name: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.config.system_prompt
    }

    pub fn max_turns(&self) -> usize {
        self.config.max_turns
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn tool_schemas(&self) -> &[ToolDefinition] {
        &self.tool_schemas
    }

    pub fn handoffs(&self) -> &[HandoffTarget] {
        &self.handoffs
    }

    /// Names of the peers this agent may hand off to, in configuration order.
    pub fn handoff_names(&self) -> Vec<&str> {
        self.handoffs.iter().map(HandoffTarget::name).collect()
    }

    /// Schema list sent to the model: registered schemas, then the handoff
    /// descriptor when peers exist.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions = self.tool_schemas.clone();
        if !self.handoffs.is_empty() {
            definitions.push(handoff_definition(&self.handoff_names()));
        }
        definitions
    }

    /// Request for the next LLM call over `messages`.
    pub fn build_request(&self, messages: &[Message]) -> CreateMessageRequest {
        CreateMessageRequest::new(&self.config.model, messages.to_vec())
            .with_system(&self.config.system_prompt)
            .with_max_tokens(self.config.max_tokens)
            .with_tools(self.tool_definitions())
    }
}
