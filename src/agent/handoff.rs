//! Handoff: passing the conversation to a peer agent.
//!
//! An agent with peers advertises a synthesized `handoff` tool. When the model
//! calls it with a known peer, the peer runs on the conversation (minus the
//! assistant turn that asked for the handoff) and its result becomes the
//! delegating run's result. Unknown peers and failing peer runs are reported
//! back to the model as an error `tool_result` instead.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::{Agent, AgentResult};
use crate::prompts::{HANDOFF_DESCRIPTION, HANDOFF_REASON_DESCRIPTION, handoff_name_description};
use crate::types::{Message, ToolDefinition, ToolResultBlock, ToolUseBlock};

/// Reserved tool name for handoff requests.
pub const HANDOFF_TOOL_NAME: &str = "handoff";

const DEFAULT_REASON: &str = "No reason provided";

/// Build the `handoff` tool definition for the given peer names.
pub fn handoff_definition(names: &[&str]) -> ToolDefinition {
    ToolDefinition::new(
        HANDOFF_TOOL_NAME,
        HANDOFF_DESCRIPTION,
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": handoff_name_description(&names_json(names)),
                },
                "reason": {
                    "type": "string",
                    "description": HANDOFF_REASON_DESCRIPTION,
                },
            },
            "required": ["name", "reason"],
        }),
    )
}

fn names_json(names: &[&str]) -> String {
    serde_json::Value::from(names.to_vec()).to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
struct HandoffInput {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

impl HandoffInput {
    fn from_value(input: &serde_json::Value) -> Self {
        serde_json::from_value(input.clone()).unwrap_or_default()
    }
}

/// Name → agent table for late-bound handoffs.
///
/// Lets agents refer to peers that are built after them, including peers that
/// hand back to them. The directory holds strong references: agents registered
/// here and pointing back at it stay alive until [`AgentDirectory::clear`].
#[derive(Clone, Default)]
pub struct AgentDirectory {
    agents: Arc<DashMap<String, Arc<Agent>>>,
}

impl fmt::Debug for AgentDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentDirectory")
            .field("agents", &self.names())
            .finish()
    }
}

impl AgentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `agent` under its own name, returning any agent it replaced.
    pub fn register(&self, agent: Arc<Agent>) -> Option<Arc<Agent>> {
        self.agents.insert(agent.name().to_string(), agent)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Agent>> {
        self.agents.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Agent>> {
        self.agents.remove(name).map(|(_, agent)| agent)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.iter().map(|e| e.key().clone()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn clear(&self) {
        self.agents.clear();
    }
}

/// A peer an agent may hand off to.
#[derive(Clone)]
pub enum HandoffTarget {
    /// A peer held directly.
    Agent(Arc<Agent>),
    /// A peer looked up by name at handoff time.
    Directory {
        name: String,
        directory: AgentDirectory,
    },
}

impl fmt::Debug for HandoffTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(agent) => f.debug_tuple("Agent").field(&agent.name()).finish(),
            Self::Directory { name, .. } => f.debug_tuple("Directory").field(name).finish(),
        }
    }
}

impl From<Arc<Agent>> for HandoffTarget {
    fn from(agent: Arc<Agent>) -> Self {
        Self::Agent(agent)
    }
}

impl HandoffTarget {
    pub fn name(&self) -> &str {
        match self {
            Self::Agent(agent) => agent.name(),
            Self::Directory { name, .. } => name,
        }
    }

    pub fn resolve(&self) -> Option<Arc<Agent>> {
        match self {
            Self::Agent(agent) => Some(Arc::clone(agent)),
            Self::Directory { name, directory } => directory.get(name),
        }
    }
}

/// Result of one handoff request.
#[derive(Debug)]
pub enum HandoffOutcome {
    /// The peer finished; its result ends the delegating run.
    Delegated(AgentResult),
    /// The handoff did not happen; report this back to the model.
    Rejected(ToolResultBlock),
}

impl Agent {
    /// Serve one `handoff` invocation against `conversation`.
    pub(crate) async fn call_handoff(
        &self,
        invocation: &ToolUseBlock,
        conversation: &[Message],
    ) -> HandoffOutcome {
        let input = HandoffInput::from_value(&invocation.input);
        let target_name = input.name.unwrap_or_default();
        let reason = input.reason.unwrap_or_else(|| DEFAULT_REASON.to_string());

        let peer = self
            .handoffs
            .iter()
            .find(|target| target.name() == target_name)
            .and_then(HandoffTarget::resolve);

        let Some(peer) = peer else {
            return self.reject(invocation, &format!("Agent '{target_name}' not found"));
        };

        info!(from = %self.name(), to = %target_name, reason = %reason, "Handing off");

        let mut pruned = conversation.to_vec();
        if pruned
            .last()
            .is_some_and(|last| last.is_assistant() && last.contains_tool_use(&invocation.id))
        {
            pruned.pop();
        }

        match peer.run(&pruned).await {
            Ok(result) => HandoffOutcome::Delegated(result),
            Err(e) => self.reject(invocation, &e.to_string()),
        }
    }

    fn reject(&self, invocation: &ToolUseBlock, message: &str) -> HandoffOutcome {
        let content = format!(
            "Handoff failed: {message}. Available agents: {}",
            names_json(&self.handoff_names())
        );
        warn!(agent = %self.name(), error = %message, "Handoff rejected");
        HandoffOutcome::Rejected(ToolResultBlock::error(&invocation.id, content))
    }
}
