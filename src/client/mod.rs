//! Model client: the seam between agents and the Messages API.

mod anthropic;
pub mod config;
pub mod messages;

use std::fmt::Debug;

use async_trait::async_trait;

pub use anthropic::AnthropicClient;
pub use config::{ClientConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use messages::{CreateMessageRequest, ErrorDetail, ErrorResponse};

use crate::Result;
use crate::types::ApiResponse;

/// Anything that can answer a Messages API request.
///
/// Agents hold an `Arc<dyn LlmClient>`, so one client may be shared by every
/// agent in a handoff graph.
#[async_trait]
pub trait LlmClient: Send + Sync + Debug {
    async fn send(&self, request: CreateMessageRequest) -> Result<ApiResponse>;
}
