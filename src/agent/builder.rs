//! Agent builder.

use std::collections::HashSet;
use std::sync::Arc;

use super::config::AgentConfig;
use super::handoff::{AgentDirectory, HandoffTarget};
use super::tool::AgentTool;
use super::Agent;
use crate::client::{AnthropicClient, LlmClient};
use crate::tools::{SchemaTool, Tool, ToolRegistry};
use crate::types::ToolDefinition;
use crate::{Error, Result};

/// Builder for [`Agent`].
///
/// Collections passed by reference are copied on the spot, so changing them
/// afterwards has no effect on the built agent.
#[derive(Debug)]
pub struct AgentBuilder {
    config: AgentConfig,
    client: Option<Arc<dyn LlmClient>>,
    tools: ToolRegistry,
    tool_schemas: Vec<ToolDefinition>,
    handoffs: Vec<HandoffTarget>,
}

impl AgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: AgentConfig::new(name),
            client: None,
            tools: ToolRegistry::new(),
            tool_schemas: Vec::new(),
            handoffs: Vec::new(),
        }
    }

    /// Caller instructions, placed after the fixed loop preamble.
    pub fn system_prompt(mut self, instructions: impl AsRef<str>) -> Self {
        self.config = self.config.with_instructions(instructions.as_ref());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config = self.config.with_model(model);
        self
    }

    pub fn max_turns(mut self, max_turns: usize) -> Self {
        self.config = self.config.with_max_turns(max_turns);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config = self.config.with_max_tokens(max_tokens);
        self
    }

    /// LLM client to use. Defaults to [`AnthropicClient::from_env`].
    pub fn client(mut self, client: Arc<dyn LlmClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Copy every tool of `registry` into the agent's table.
    pub fn tools(mut self, registry: &ToolRegistry) -> Self {
        self.tools.extend(registry);
        self
    }

    /// Register one capability. Its schema is supplied separately.
    pub fn tool(mut self, name: impl Into<String>, tool: impl Tool + 'static) -> Self {
        self.tools.register(name, Arc::new(tool));
        self
    }

    /// Register a [`SchemaTool`] together with its derived schema.
    pub fn schema_tool<T: SchemaTool + 'static>(mut self, tool: T) -> Self {
        self.tools.register_schema_tool(tool);
        self.tool_schemas.push(T::definition());
        self
    }

    pub fn tool_schema(mut self, schema: ToolDefinition) -> Self {
        self.tool_schemas.push(schema);
        self
    }

    pub fn tool_schemas(mut self, schemas: &[ToolDefinition]) -> Self {
        self.tool_schemas.extend_from_slice(schemas);
        self
    }

    /// Expose `agent` as the tool `<name>_agent`, schema included.
    pub fn agent_tool(mut self, agent: Arc<Agent>, description: impl Into<String>) -> Self {
        let tool = AgentTool::new(agent, description);
        self.tool_schemas.push(tool.definition());
        self.tools.register(tool.name(), Arc::new(tool));
        self
    }

    pub fn handoff(mut self, agent: Arc<Agent>) -> Self {
        self.handoffs.push(HandoffTarget::Agent(agent));
        self
    }

    pub fn handoffs(mut self, agents: &[Arc<Agent>]) -> Self {
        self.handoffs
            .extend(agents.iter().cloned().map(HandoffTarget::Agent));
        self
    }

    /// Hand off to `name`, looked up in `directory` when the handoff happens.
    pub fn handoff_via(mut self, name: impl Into<String>, directory: &AgentDirectory) -> Self {
        self.handoffs.push(HandoffTarget::Directory {
            name: name.into(),
            directory: directory.clone(),
        });
        self
    }

    pub fn build(self) -> Result<Agent> {
        self.config.validate()?;

        let mut seen = HashSet::new();
        for target in &self.handoffs {
            if !seen.insert(target.name()) {
                return Err(Error::Config(format!(
                    "agent '{}': duplicate handoff target '{}'",
                    self.config.name,
                    target.name()
                )));
            }
        }

        let client = match self.client {
            Some(client) => client,
            None => Arc::new(AnthropicClient::from_env()?),
        };

        Ok(Agent {
            config: self.config,
            client,
            tools: self.tools,
            tool_schemas: self.tool_schemas,
            handoffs: self.handoffs,
        })
    }
}
