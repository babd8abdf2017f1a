use reviewlens_dataset::Sentiment;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::llm_trait::ChatCompletion;
use crate::prompts::theme_prompt;
use crate::types::{ChatRequest, CompletionError, ThemeSummary};

/// Extracts recurring themes from a batch of reviews
#[derive(Clone)]
pub struct ThemeExtractor {
    client: Arc<dyn ChatCompletion>,
}

impl ThemeExtractor {
    /// Create new extractor
    pub fn new(client: Arc<dyn ChatCompletion>) -> Self {
        Self { client }
    }

    /// Model used for extraction
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Build the request for one batch
    pub fn build_request(&self, reviews: &[String], sentiment: Sentiment) -> ChatRequest {
        ChatRequest::user(self.client.model(), theme_prompt(reviews, sentiment.label()))
    }

    /// Ask the model for the top themes in `reviews`
    ///
    /// Never fails: every error, including cancellation, is returned as
    /// [`ThemeSummary::Failed`].
    pub async fn extract(
        &self,
        reviews: &[String],
        sentiment: Sentiment,
        cancel: &CancellationToken,
    ) -> ThemeSummary {
        if cancel.is_cancelled() {
            return ThemeSummary::failed(CompletionError::Cancelled);
        }

        let request = self.build_request(reviews, sentiment);
        info!(
            "Extracting {} themes - Reviews: {}, Prompt length: {}",
            sentiment,
            reviews.len(),
            request.prompt().len()
        );

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(CompletionError::Cancelled),
            result = self.client.complete(&request) => result,
        };

        match result {
            Ok(text) => ThemeSummary::themes(text),
            Err(e) => {
                warn!("{} theme extraction failed: {}", sentiment, e);
                ThemeSummary::failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::OpenAiClient;
    use crate::types::LlmConfig;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records requests and answers with a fixed result
    struct ScriptedClient {
        reply: Result<String, CompletionError>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl ChatCompletion for ScriptedClient {
        fn model(&self) -> &str {
            "test-model"
        }

        async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
            self.requests.lock().unwrap().push(request.clone());
            self.reply.clone()
        }
    }

    /// Never answers
    struct HangingClient;

    #[async_trait]
    impl ChatCompletion for HangingClient {
        fn model(&self) -> &str {
            "test-model"
        }

        async fn complete(&self, _request: &ChatRequest) -> Result<String, CompletionError> {
            std::future::pending().await
        }
    }

    fn scripted(reply: Result<String, CompletionError>) -> Arc<ScriptedClient> {
        Arc::new(ScriptedClient {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_extract_success() {
        let client = scripted(Ok("- Friendly staff".to_string()));
        let extractor = ThemeExtractor::new(client.clone());
        let reviews = vec!["great!".to_string(), "ok".to_string()];

        let summary = extractor
            .extract(&reviews, Sentiment::Positive, &CancellationToken::new())
            .await;
        assert_eq!(summary, ThemeSummary::themes("- Friendly staff"));

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "test-model");
        assert_eq!(requests[0].temperature, 0.6);
        assert_eq!(requests[0].max_tokens, 300);
        assert!(requests[0].prompt().contains("positive customer reviews:\ngreat!\nok"));
    }

    #[tokio::test]
    async fn test_extract_failure_is_soft() {
        let client = scripted(Err(CompletionError::Authentication("bad key".to_string())));
        let extractor = ThemeExtractor::new(client);

        let summary = extractor
            .extract(&["bad".to_string()], Sentiment::Negative, &CancellationToken::new())
            .await;
        assert!(summary.display_text().starts_with("Error: "));
        assert_eq!(summary.error().map(|e| e.kind()), Some("authentication"));
    }

    #[tokio::test]
    async fn test_extract_with_unreachable_endpoint() {
        let client = OpenAiClient::new(LlmConfig {
            api_key: "sk-test".to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
        })
        .unwrap();
        let extractor = ThemeExtractor::new(Arc::new(client));

        let summary = extractor
            .extract(&["slow".to_string()], Sentiment::Negative, &CancellationToken::new())
            .await;
        assert!(summary.display_text().starts_with("Error: "));
        assert_eq!(summary.error().map(|e| e.kind()), Some("network"));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_sends_nothing() {
        let client = scripted(Ok("- unused".to_string()));
        let extractor = ThemeExtractor::new(client.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let summary = extractor.extract(&[], Sentiment::Positive, &cancel).await;
        assert_eq!(summary, ThemeSummary::failed(CompletionError::Cancelled));
        assert!(client.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_in_flight() {
        let extractor = ThemeExtractor::new(Arc::new(HangingClient));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let summary = extractor
            .extract(&["x".to_string()], Sentiment::Positive, &cancel)
            .await;
        assert_eq!(summary.error(), Some(&CompletionError::Cancelled));
    }
}
