//! Tool registry and dispatch.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tracing::{debug, info, warn};

use super::{SchemaTool, Tool, ToolArgs};
use crate::types::{ToolError, ToolResultBlock, ToolUseBlock};

/// Name → capability table of an agent.
///
/// Cloning is cheap (tools are shared `Arc`s) and yields an independent table:
/// registering into a clone never affects the original.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.names();
        names.sort_unstable();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, tool: Arc<dyn Tool>) {
        self.tools.insert(name.into(), tool);
    }

    /// Register a [`SchemaTool`] under its own `NAME`.
    pub fn register_schema_tool<T: SchemaTool + 'static>(&mut self, tool: T) {
        self.register(T::NAME, Arc::new(tool));
    }

    pub fn with_tool(mut self, name: impl Into<String>, tool: impl Tool + 'static) -> Self {
        self.register(name, Arc::new(tool));
        self
    }

    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Merge every entry of `other` into this registry.
    pub fn extend(&mut self, other: &ToolRegistry) {
        for (name, tool) in &other.tools {
            self.tools.insert(name.clone(), Arc::clone(tool));
        }
    }

    /// Run one invocation and turn whatever happens into a `tool_result`.
    ///
    /// Unknown names, tool errors and panics all come back as error results
    /// carrying the invocation id; this never fails.
    pub async fn dispatch(&self, invocation: &ToolUseBlock) -> ToolResultBlock {
        let Some(tool) = self.tools.get(&invocation.name) else {
            warn!(tool = %invocation.name, "Tool not found");
            return failure(invocation, &ToolError::not_found(&invocation.name));
        };

        info!(tool = %invocation.name, input = %invocation.input, "Calling tool");
        let start = Instant::now();
        let args = ToolArgs::new(invocation.input.clone());
        let outcome = AssertUnwindSafe(tool.call(args)).catch_unwind().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(Ok(content)) => ToolResultBlock::success(&invocation.id, content),
            Ok(Err(e)) => {
                warn!(tool = %invocation.name, error = %e, "Tool failed");
                failure(invocation, &e)
            }
            Err(payload) => {
                let e = ToolError::panicked(panic_message(payload.as_ref()));
                warn!(tool = %invocation.name, error = %e, "Tool panicked");
                failure(invocation, &e)
            }
        };

        debug!(
            tool = %invocation.name,
            duration_ms,
            is_error = result.is_error(),
            "Tool execution completed"
        );
        result
    }
}

fn failure(invocation: &ToolUseBlock, error: &ToolError) -> ToolResultBlock {
    ToolResultBlock::error(&invocation.id, format!("Error: {error}"))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
