//! Anthropic Messages API client.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

use super::LlmClient;
use super::config::ClientConfig;
use super::messages::{CreateMessageRequest, ErrorResponse};
use crate::types::ApiResponse;
use crate::{Error, Result};

/// HTTP client for `POST {base_url}/v1/messages`.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Use a caller-supplied HTTP client, e.g. one shared across agents.
    pub fn with_http(config: ClientConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_headers(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("x-api-key", self.config.api_key.expose_secret())
            .header("anthropic-version", &self.config.api_version)
            .header("content-type", "application/json")
    }

    async fn error_from_response(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Error::RateLimit { retry_after };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Error::Network(e),
        };
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => error.into_error(status),
            Err(_) => Error::Api {
                message: body,
                status: Some(status),
                error_type: None,
            },
        }
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    #[instrument(skip_all, fields(model = %request.model, messages = request.messages.len()))]
    async fn send(&self, request: CreateMessageRequest) -> Result<ApiResponse> {
        request.validate()?;

        let url = self.config.messages_url();
        let response = self
            .build_headers(self.http.post(&url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error = Self::error_from_response(response).await;
            warn!(error = %error, "Messages API call failed");
            return Err(error);
        }

        let api_response: ApiResponse = response.json().await?;
        debug!(
            stop_reason = ?api_response.stop_reason,
            input_tokens = api_response.usage.input_tokens,
            output_tokens = api_response.usage.output_tokens,
            "Messages API call completed"
        );
        Ok(api_response)
    }
}
