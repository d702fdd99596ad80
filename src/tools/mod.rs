//! Tools: capabilities an agent can invoke, and the registry that dispatches them.

mod args;
pub mod math;
mod registry;
mod traits;

pub use args::ToolArgs;
pub use registry::ToolRegistry;
pub use traits::{AsyncFnTool, FnTool, SchemaTool, Tool, async_tool_fn, tool_fn};
