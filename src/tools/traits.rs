//! Tool trait definitions.

use std::fmt::Display;
use std::future::Future;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use super::ToolArgs;
use crate::types::{ToolDefinition, ToolError};

/// A named capability an agent can invoke.
///
/// `Ok` carries the text the model will read; `Err` is reported back to the
/// model as `Error: <message>`. Neither ends the agent run.
#[async_trait]
pub trait Tool: Send + Sync {
    async fn call(&self, args: ToolArgs) -> Result<String, ToolError>;
}

/// Schema-based tool trait with automatic JSON schema generation.
///
/// Provides a higher-level abstraction over `Tool` with typed inputs
/// and automatic schema derivation via schemars.
#[async_trait]
pub trait SchemaTool: Send + Sync {
    type Input: JsonSchema + DeserializeOwned + Send;
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    async fn handle(&self, input: Self::Input) -> Result<String, ToolError>;

    fn input_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(Self::Input);
        let mut value =
            serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({"type": "object"}));

        if let Some(obj) = value.as_object_mut() {
            obj.remove("$schema");
            if !obj.contains_key("properties") {
                obj.insert(
                    "properties".to_string(),
                    serde_json::Value::Object(serde_json::Map::new()),
                );
            }
        }

        value
    }

    fn definition() -> ToolDefinition {
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::input_schema())
    }
}

#[async_trait]
impl<T: SchemaTool + 'static> Tool for T {
    async fn call(&self, args: ToolArgs) -> Result<String, ToolError> {
        let input = args.parse::<T::Input>()?;
        SchemaTool::handle(self, input).await
    }
}

type SyncHandler = Box<dyn Fn(ToolArgs) -> Result<String, ToolError> + Send + Sync>;
type AsyncHandler =
    Box<dyn Fn(ToolArgs) -> BoxFuture<'static, Result<String, ToolError>> + Send + Sync>;

/// Tool backed by a synchronous closure. See [`tool_fn`].
pub struct FnTool {
    handler: SyncHandler,
}

/// Tool backed by an async closure. See [`async_tool_fn`].
pub struct AsyncFnTool {
    handler: AsyncHandler,
}

/// Wrap a plain function as a [`Tool`].
///
/// The success value is rendered with `Display`; the error's `Display` text
/// becomes the failure message.
///
/// ```
/// use claude_handoff::{ToolArgs, tool_fn};
///
/// let sum = tool_fn(|args: ToolArgs| -> Result<f64, String> {
///     Ok(args.number(0).map_err(|e| e.to_string())? + args.number(1).map_err(|e| e.to_string())?)
/// });
/// # let _ = sum;
/// ```
pub fn tool_fn<F, T, E>(f: F) -> FnTool
where
    F: Fn(ToolArgs) -> Result<T, E> + Send + Sync + 'static,
    T: Display,
    E: Display,
{
    FnTool {
        handler: Box::new(move |args| {
            f(args)
                .map(|value| value.to_string())
                .map_err(|e| ToolError::execution_failed(e.to_string()))
        }),
    }
}

/// Wrap an async function as a [`Tool`].
pub fn async_tool_fn<F, Fut, T, E>(f: F) -> AsyncFnTool
where
    F: Fn(ToolArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Display,
    E: Display,
{
    AsyncFnTool {
        handler: Box::new(move |args| {
            let fut = f(args);
            async move {
                fut.await
                    .map(|value| value.to_string())
                    .map_err(|e| ToolError::execution_failed(e.to_string()))
            }
            .boxed()
        }),
    }
}

#[async_trait]
impl Tool for FnTool {
    async fn call(&self, args: ToolArgs) -> Result<String, ToolError> {
        (self.handler)(args)
    }
}

#[async_trait]
impl Tool for AsyncFnTool {
    async fn call(&self, args: ToolArgs) -> Result<String, ToolError> {
        (self.handler)(args).await
    }
}
