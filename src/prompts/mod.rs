//! Fixed prompt text used by agents.
//!
//! - `base`: loop preamble prepended to every system prompt
//! - `handoff`: descriptions of the synthesized handoff and agent tools

pub mod base;
pub mod handoff;

pub use base::{BASE_SYSTEM_PROMPT, DEFAULT_SYSTEM_PROMPT, system_prompt};
pub use handoff::{
    AGENT_TOOL_MESSAGE_DESCRIPTION, HANDOFF_DESCRIPTION, HANDOFF_REASON_DESCRIPTION,
    handoff_name_description,
};
