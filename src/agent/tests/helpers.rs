//! Test helper types for agent tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{CreateMessageRequest, LlmClient};
use crate::tools::{Tool, ToolArgs};
use crate::types::{ApiResponse, ContentBlock, StopReason, ToolError, Usage};
use crate::{Error, Result};

/// Replays canned responses in order and records every request.
///
/// Once the script runs out, further calls fail with an API error.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<ApiResponse>>,
    requests: Mutex<Vec<CreateMessageRequest>>,
}

impl ScriptedClient {
    pub fn new(responses: Vec<ApiResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<CreateMessageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn send(&self, request: CreateMessageRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Api {
                message: "script exhausted".into(),
                status: Some(500),
                error_type: Some("api_error".into()),
            })
    }
}

/// Returns the same response forever.
#[derive(Debug)]
pub struct LoopingClient {
    response: ApiResponse,
    pub calls: AtomicUsize,
}

impl LoopingClient {
    pub fn new(response: ApiResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl LlmClient for LoopingClient {
    async fn send(&self, _request: CreateMessageRequest) -> Result<ApiResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

pub fn text_response(text: &str) -> ApiResponse {
    ApiResponse::new(vec![ContentBlock::text(text)], StopReason::EndTurn)
}

pub fn tool_use_response(calls: &[(&str, &str, Value)]) -> ApiResponse {
    let content = calls
        .iter()
        .map(|(id, name, input)| ContentBlock::tool_use(*id, *name, input.clone()))
        .collect();
    ApiResponse::new(content, StopReason::ToolUse)
}

pub fn handoff_response(id: &str, target: &str, reason: &str) -> ApiResponse {
    tool_use_response(&[(
        id,
        "handoff",
        serde_json::json!({"name": target, "reason": reason}),
    )])
}

pub fn usage(input_tokens: u32, output_tokens: u32) -> Usage {
    Usage {
        input_tokens,
        output_tokens,
    }
}

/// Counts invocations and echoes its `text` argument.
#[derive(Debug, Default)]
pub struct CountingTool {
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Tool for CountingTool {
    async fn call(&self, args: ToolArgs) -> std::result::Result<String, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        args.get("text")
    }
}

/// Sleeps for `delay` before answering with `label`.
pub struct SlowTool {
    pub label: &'static str,
    pub delay: Duration,
}

#[async_trait]
impl Tool for SlowTool {
    async fn call(&self, _args: ToolArgs) -> std::result::Result<String, ToolError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.label.to_string())
    }
}

/// Completes only once every barrier party is waiting at the same time.
pub struct BarrierTool {
    pub barrier: Arc<tokio::sync::Barrier>,
}

#[async_trait]
impl Tool for BarrierTool {
    async fn call(&self, _args: ToolArgs) -> std::result::Result<String, ToolError> {
        self.barrier.wait().await;
        Ok("released".to_string())
    }
}
