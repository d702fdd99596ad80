//! Wording of the synthesized `handoff` tool.

pub const HANDOFF_DESCRIPTION: &str = "Transfer control to another specialized agent. Use this when the user's request is better handled by a different agent.";

pub const HANDOFF_REASON_DESCRIPTION: &str = "Brief explanation of why this handoff is needed";

/// Description of the `name` property, listing the agents that can be picked.
pub fn handoff_name_description(available: &str) -> String {
    format!("Name of the agent to handoff to. Available agents: {available}")
}

/// Description of the `message` property of an agent exposed as a tool.
pub const AGENT_TOOL_MESSAGE_DESCRIPTION: &str = "The message to send to the agent";
