use reviewlens_common::{AppConfig, Result};
use std::sync::Arc;

use crate::job_manager::JobManager;
use crate::workflow::AnalysisWorkflow;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Job manager
    pub job_manager: Arc<JobManager>,

    /// Upload analysis pipeline
    pub workflow: AnalysisWorkflow,
}

impl AppState {
    /// Create new application state backed by the configured API
    pub fn new(config: AppConfig) -> Result<Self> {
        let workflow = AnalysisWorkflow::from_config(&config)?;
        Ok(Self::with_workflow(config, workflow))
    }

    /// Create state around an existing workflow
    pub fn with_workflow(config: AppConfig, workflow: AnalysisWorkflow) -> Self {
        Self {
            config,
            job_manager: Arc::new(JobManager::new()),
            workflow,
        }
    }
}
