//! Exposing an agent as a tool of another agent.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::Agent;
use crate::prompts::AGENT_TOOL_MESSAGE_DESCRIPTION;
use crate::tools::{Tool, ToolArgs};
use crate::types::{ToolDefinition, ToolError};

/// Runs the wrapped agent on a fresh conversation and returns its answer.
///
/// Unlike a handoff, control stays with the calling agent: the inner answer
/// comes back as an ordinary tool result.
#[derive(Debug, Clone)]
pub struct AgentTool {
    agent: Arc<Agent>,
    description: String,
}

impl AgentTool {
    pub fn new(agent: Arc<Agent>, description: impl Into<String>) -> Self {
        Self {
            agent,
            description: description.into(),
        }
    }

    /// Tool name: `<agent name>_agent`.
    pub fn name(&self) -> String {
        format!("{}_agent", self.agent.name())
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            self.name(),
            &self.description,
            json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": AGENT_TOOL_MESSAGE_DESCRIPTION,
                    },
                },
                "required": ["message"],
            }),
        )
    }
}

#[async_trait]
impl Tool for AgentTool {
    async fn call(&self, args: ToolArgs) -> Result<String, ToolError> {
        let message: String = args.get("message")?;
        debug!(agent = %self.agent.name(), "Running agent as tool");
        let result = self
            .agent
            .execute(message)
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;
        Ok(result.text)
    }
}
