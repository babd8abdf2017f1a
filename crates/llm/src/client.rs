use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use reviewlens_common::{Result, ReviewLensError};
use tracing::{debug, info, warn};

use crate::llm_trait::ChatCompletion;
use crate::types::{ApiErrorBody, ChatRequest, ChatResponse, CompletionError, LlmConfig};

/// Longest slice of an unparsed error body kept in messages
const MAX_ERROR_BODY: usize = 300;

/// OpenAI-compatible chat-completion client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: LlmConfig,
    client: Client,
}

impl OpenAiClient {
    /// Create new client
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ReviewLensError::llm(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Chat-completion client initialized: {} (model: {})",
            config.base_url, config.model
        );
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    /// Single attempt; failures are classified, never retried
    async fn complete(&self, request: &ChatRequest) -> std::result::Result<String, CompletionError> {
        let url = self.completions_url();

        debug!(
            "Sending chat-completion request - Model: {}, Prompt length: {}",
            request.model,
            request.prompt().len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let err = classify_status(status, &body);
            warn!("Chat-completion request failed: {}", err);
            return Err(err);
        }

        let content = parse_completion(&body)?;
        debug!("Received completion - Length: {}", content.len());
        Ok(content)
    }
}

/// Map a non-success status and its body to an error category
pub fn classify_status(status: StatusCode, body: &str) -> CompletionError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("no response body").to_string()
            } else {
                trimmed.chars().take(MAX_ERROR_BODY).collect()
            }
        });

    match status.as_u16() {
        401 | 403 => CompletionError::Authentication(message),
        429 => CompletionError::Quota(message),
        code => CompletionError::Api {
            status: code,
            message,
        },
    }
}

/// Extract `choices[0].message.content` from a success body
pub fn parse_completion(body: &str) -> std::result::Result<String, CompletionError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::MalformedResponse("response has no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| CompletionError::MalformedResponse("first choice has no content".to_string()))?;

    if content.trim().is_empty() {
        return Err(CompletionError::MalformedResponse("empty completion".to_string()));
    }

    Ok(content)
}
