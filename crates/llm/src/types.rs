use reviewlens_common::AppConfig;
use serde::{Deserialize, Serialize};

/// Sampling temperature used for theme extraction
pub const THEME_TEMPERATURE: f64 = 0.6;

/// Maximum completion length for theme extraction
pub const THEME_MAX_TOKENS: u32 = 300;

/// Connection settings for the chat-completion service
#[derive(Clone)]
pub struct LlmConfig {
    /// Bearer token
    pub api_key: String,

    /// API base URL, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Model identifier
    pub model: String,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl From<&AppConfig> for LlmConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            model: config.llm_model.clone(),
        }
    }
}

/// Chat-completion request body
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    /// Model name (e.g., "gpt-3.5-turbo")
    pub model: String,

    /// Conversation messages
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    pub temperature: f64,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Single user-message request
    pub fn user(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: THEME_TEMPERATURE,
            max_tokens: THEME_MAX_TOKENS,
        }
    }

    /// Content of the first user message
    pub fn prompt(&self) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completion response body (fields we read)
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error body returned by OpenAI-compatible APIs
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

/// Why a completion call produced no text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CompletionError {
    /// Connection, DNS, TLS or timeout failure
    #[error("network error: {0}")]
    Network(String),

    /// Rejected credentials (HTTP 401/403)
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Rate limit or exhausted quota (HTTP 429)
    #[error("quota exceeded: {0}")]
    Quota(String),

    /// Any other non-success status
    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Response did not contain `choices[0].message.content`
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Call abandoned through its cancellation token
    #[error("request cancelled")]
    Cancelled,
}

impl CompletionError {
    /// Short category name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Authentication(_) => "authentication",
            Self::Quota(_) => "quota",
            Self::Api { .. } => "api",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Outcome of one theme extraction call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ThemeSummary {
    /// Markdown bullet list returned by the model
    Themes { text: String },

    /// The call failed; the cause is kept for display
    Failed { error: CompletionError },
}

impl ThemeSummary {
    pub fn themes(text: impl Into<String>) -> Self {
        Self::Themes { text: text.into() }
    }

    pub fn failed(error: CompletionError) -> Self {
        Self::Failed { error }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Themes { .. })
    }

    pub fn error(&self) -> Option<&CompletionError> {
        match self {
            Self::Themes { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }

    /// Text shown where the themes belong: the themes, or `Error: <cause>`
    pub fn display_text(&self) -> String {
        match self {
            Self::Themes { text } => text.clone(),
            Self::Failed { error } => format!("Error: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest::user("gpt-3.5-turbo", "hello");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "hello"}],
                "temperature": 0.6,
                "max_tokens": 300
            })
        );
        assert_eq!(request.prompt(), "hello");
    }

    #[test]
    fn test_display_text() {
        assert_eq!(ThemeSummary::themes("- Food").display_text(), "- Food");

        let failed = ThemeSummary::failed(CompletionError::Quota("limit reached".to_string()));
        assert_eq!(failed.display_text(), "Error: quota exceeded: limit reached");
        assert!(!failed.is_ok());
        assert_eq!(failed.error().map(|e| e.kind()), Some("quota"));
    }

    #[test]
    fn test_summary_serialization() {
        let failed = ThemeSummary::failed(CompletionError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"]["kind"], "api");
        assert_eq!(json["error"]["detail"]["status"], 500);

        let ok = serde_json::to_value(ThemeSummary::themes("- Staff")).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "themes", "text": "- Staff"}));
    }

    #[test]
    fn test_llm_config_from_app_config() {
        let app = AppConfig {
            openai_api_key: "sk-test".to_string(),
            ..Default::default()
        };

        let config = LlmConfig::from(&app);
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(!format!("{:?}", config).contains("sk-test"));
    }
}
