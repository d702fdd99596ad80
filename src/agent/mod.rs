//! Agent execution engine.

mod builder;
mod config;
mod events;
mod execution;
mod executor;
pub mod handoff;
mod tool;

#[cfg(test)]
mod tests;

pub use builder::AgentBuilder;
pub use config::{AgentConfig, DEFAULT_MAX_TOKENS, DEFAULT_MAX_TURNS, DEFAULT_MODEL};
pub use events::AgentResult;
pub use executor::Agent;
pub use handoff::{AgentDirectory, HANDOFF_TOOL_NAME, HandoffOutcome, HandoffTarget};
pub use tool::AgentTool;
