//! ReviewLens HTTP server
//!
//! Actix-web 기반 업로드 페이지 및 분석 API

pub mod job_manager;
pub mod render;
pub mod routes;
pub mod state;
pub mod types;
pub mod workflow;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use reviewlens_common::{AppConfig, Result};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use state::AppState;
pub use workflow::{AnalysisReport, AnalysisStage, AnalysisWorkflow, ProgressReporter};

/// Start the HTTP server and block until it stops
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = web::Data::new(Arc::new(AppState::new(config)?));

    info!("HTTP server listening on http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::web;
    use async_trait::async_trait;
    use reviewlens_common::AppConfig;
    use reviewlens_llm::{ChatCompletion, ChatRequest, CompletionError, ThemeExtractor};
    use std::sync::{Arc, Mutex};

    use crate::state::AppState;
    use crate::workflow::{AnalysisStage, AnalysisWorkflow, ProgressReporter};

    pub const BOUNDARY: &str = "reviewlens-test-boundary";

    /// Multipart body carrying `csv` in the `file` field
    pub fn multipart_body(filename: &str, csv: &str) -> String {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
            b = BOUNDARY,
            f = filename,
        )
    }

    /// Answers "- themes for <label> reviews" and records every prompt
    pub struct RecordingClient {
        fail_label: Option<(&'static str, CompletionError)>,
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingClient {
        pub fn replying() -> Arc<Self> {
            Arc::new(Self {
                fail_label: None,
                prompts: Mutex::new(Vec::new()),
            })
        }

        /// Fails calls whose prompt is for `label`
        pub fn failing_for(label: &'static str, error: CompletionError) -> Arc<Self> {
            Arc::new(Self {
                fail_label: Some((label, error)),
                prompts: Mutex::new(Vec::new()),
            })
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatCompletion for RecordingClient {
        fn model(&self) -> &str {
            "test-model"
        }

        async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
            let prompt = request.prompt().to_string();
            self.prompts.lock().unwrap().push(prompt.clone());

            let label = if prompt.starts_with("Here are some positive") {
                "positive"
            } else {
                "negative"
            };

            match &self.fail_label {
                Some((fail, error)) if *fail == label => Err(error.clone()),
                _ => Ok(format!("- themes for {} reviews", label)),
            }
        }
    }

    /// Never answers; the call only ends when its future is dropped
    pub struct HangingClient;

    #[async_trait]
    impl ChatCompletion for HangingClient {
        fn model(&self) -> &str {
            "test-model"
        }

        async fn complete(&self, _request: &ChatRequest) -> Result<String, CompletionError> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    pub struct RecordingProgress {
        stages: Mutex<Vec<AnalysisStage>>,
    }

    impl RecordingProgress {
        pub fn stages(&self) -> Vec<AnalysisStage> {
            self.stages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProgressReporter for RecordingProgress {
        async fn report(&self, stage: &AnalysisStage) {
            self.stages.lock().unwrap().push(stage.clone());
        }
    }

    pub fn test_state<C: ChatCompletion + 'static>(client: Arc<C>) -> web::Data<Arc<AppState>> {
        let workflow = AnalysisWorkflow::new(ThemeExtractor::new(client));
        web::Data::new(Arc::new(AppState::with_workflow(AppConfig::default(), workflow)))
    }
}
