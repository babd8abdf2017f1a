use async_trait::async_trait;
use reviewlens_common::{AppConfig, Result};
use reviewlens_dataset::{
    count_classes, load_dataset, select_batches, ClassCounts, Sentiment, REVIEW_BATCH_CAP,
};
use reviewlens_llm::{LlmConfig, OpenAiClient, ThemeExtractor, ThemeSummary};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Pipeline state for one upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisStage {
    FileUploaded,
    /// Terminal: the upload was rejected
    ValidationFailed(String),
    Validated { rows: usize },
    CountsComputed(ClassCounts),
    ThemesPending(Sentiment),
    /// `ThemesReady(Negative)` is the terminal success state
    ThemesReady(Sentiment),
}

impl AnalysisStage {
    /// Progress percentage shown for this stage
    pub fn progress(&self) -> u8 {
        match self {
            Self::FileUploaded => 5,
            Self::ValidationFailed(_) => 100,
            Self::Validated { .. } => 15,
            Self::CountsComputed(_) => 25,
            Self::ThemesPending(Sentiment::Positive) => 30,
            Self::ThemesReady(Sentiment::Positive) => 60,
            Self::ThemesPending(Sentiment::Negative) => 65,
            Self::ThemesReady(Sentiment::Negative) => 100,
        }
    }

    /// Whether the pipeline stops after this stage
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed(_) | Self::ThemesReady(Sentiment::Negative)
        )
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileUploaded => write!(f, "File uploaded"),
            Self::ValidationFailed(reason) => write!(f, "{}", reason),
            Self::Validated { rows } => write!(f, "CSV loaded successfully ({} rows)", rows),
            Self::CountsComputed(counts) => write!(
                f,
                "Counted {} positive / {} negative",
                counts.positive, counts.negative
            ),
            Self::ThemesPending(sentiment) => write!(f, "Analyzing {} reviews...", sentiment),
            Self::ThemesReady(sentiment) => write!(f, "{} themes ready", sentiment.title()),
        }
    }
}

/// Receives stage transitions while a pipeline runs
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn report(&self, stage: &AnalysisStage);
}

/// Everything shown after a successful upload
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Per-class counts for the chart
    pub counts: ClassCounts,

    /// Themes from class-1 reviews
    pub positive_themes: ThemeSummary,

    /// Themes from class-0 reviews
    pub negative_themes: ThemeSummary,

    /// Data rows read from the upload
    pub total_rows: usize,

    /// Rows excluded because their class was not 0/1
    pub skipped_rows: usize,

    /// Model that produced the themes
    pub model: String,
}

impl AnalysisReport {
    pub fn themes(&self, sentiment: Sentiment) -> &ThemeSummary {
        match sentiment {
            Sentiment::Positive => &self.positive_themes,
            Sentiment::Negative => &self.negative_themes,
        }
    }
}

/// Runs load → count → select → extract (positive, then negative)
#[derive(Clone)]
pub struct AnalysisWorkflow {
    extractor: ThemeExtractor,
}

impl AnalysisWorkflow {
    /// Create new workflow
    pub fn new(extractor: ThemeExtractor) -> Self {
        Self { extractor }
    }

    /// Workflow backed by the configured chat-completion service
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = OpenAiClient::new(LlmConfig::from(config))?;
        Ok(Self::new(ThemeExtractor::new(Arc::new(client))))
    }

    /// Execute the pipeline for one upload
    ///
    /// Only validation errors are returned; extraction failures are carried
    /// inside the report.
    pub async fn execute(
        &self,
        bytes: &[u8],
        progress: &dyn ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport> {
        report_stage(progress, AnalysisStage::FileUploaded).await;

        let dataset = match load_dataset(bytes) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!("Upload rejected: {}", e);
                report_stage(progress, AnalysisStage::ValidationFailed(e.to_string())).await;
                return Err(e);
            }
        };
        report_stage(progress, AnalysisStage::Validated { rows: dataset.total_rows() }).await;

        let counts = count_classes(&dataset);
        report_stage(progress, AnalysisStage::CountsComputed(counts)).await;

        let batches = select_batches(&dataset, REVIEW_BATCH_CAP);

        // Strictly sequential: positive first, then negative
        let positive_themes = self
            .extract_themes(batches.get(Sentiment::Positive), Sentiment::Positive, progress, cancel)
            .await;
        let negative_themes = self
            .extract_themes(batches.get(Sentiment::Negative), Sentiment::Negative, progress, cancel)
            .await;

        Ok(AnalysisReport {
            counts,
            positive_themes,
            negative_themes,
            total_rows: dataset.total_rows(),
            skipped_rows: dataset.skipped_rows,
            model: self.extractor.model().to_string(),
        })
    }

    async fn extract_themes(
        &self,
        reviews: &[String],
        sentiment: Sentiment,
        progress: &dyn ProgressReporter,
        cancel: &CancellationToken,
    ) -> ThemeSummary {
        report_stage(progress, AnalysisStage::ThemesPending(sentiment)).await;
        let summary = self.extractor.extract(reviews, sentiment, cancel).await;
        report_stage(progress, AnalysisStage::ThemesReady(sentiment)).await;
        summary
    }
}

async fn report_stage(progress: &dyn ProgressReporter, stage: AnalysisStage) {
    info!("Analysis stage: {}", stage);
    progress.report(&stage).await;
}
