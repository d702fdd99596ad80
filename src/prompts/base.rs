//! Base system prompt - the agent-loop preamble every agent starts with.

/// Preamble placed before the caller's instructions.
pub const BASE_SYSTEM_PROMPT: &str = "You are an autonomous agent that can take multiple tool-calling steps when helpful. The user only sees your response when you stop using tools, not your tool usage or reasoning steps. When you provide your answer without calling tools, make it complete and standalone.
Additional instructions:
";

/// Caller instructions used when none are given.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Effective system prompt: the preamble followed by `instructions`.
pub fn system_prompt(instructions: &str) -> String {
    format!("{BASE_SYSTEM_PROMPT}{instructions}")
}
