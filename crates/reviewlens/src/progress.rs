use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reviewlens_server::{AnalysisStage, ProgressReporter};
use std::sync::Mutex;
use std::time::Duration;

/// Terminal spinner shown while each extraction call is in flight
#[derive(Default)]
pub struct SpinnerProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn is_spinning(&self) -> bool {
        self.spinner.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}

fn start_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[async_trait]
impl ProgressReporter for SpinnerProgress {
    async fn report(&self, stage: &AnalysisStage) {
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };

        match stage {
            AnalysisStage::ThemesPending(_) => {
                if let Some(previous) = slot.replace(start_spinner(stage.to_string())) {
                    previous.finish_and_clear();
                }
            }
            AnalysisStage::ThemesReady(_) | AnalysisStage::ValidationFailed(_) => {
                if let Some(spinner) = slot.take() {
                    spinner.finish_and_clear();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewlens_dataset::Sentiment;

    #[tokio::test]
    async fn test_spinner_scoped_to_call() {
        let progress = SpinnerProgress::new();

        progress.report(&AnalysisStage::FileUploaded).await;
        assert!(!progress.is_spinning());

        progress.report(&AnalysisStage::ThemesPending(Sentiment::Positive)).await;
        assert!(progress.is_spinning());

        progress.report(&AnalysisStage::ThemesReady(Sentiment::Positive)).await;
        assert!(!progress.is_spinning());
    }
}
