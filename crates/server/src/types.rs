use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflow::AnalysisReport;

/// Task status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TaskStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// Analysis run information
#[derive(Debug, Clone, Serialize)]
pub struct TaskInfo {
    /// Task ID
    pub task_id: String,

    /// Uploaded filename
    pub filename: String,

    /// Status
    pub status: TaskStatus,

    /// Progress percentage (0-100)
    pub progress: u8,

    /// Current message
    pub message: String,

    /// Started at
    pub started_at: DateTime<Utc>,
}

/// Cancel task request
#[derive(Debug, Deserialize)]
pub struct CancelTaskRequest {
    /// Task ID to cancel
    pub task_id: String,
}

/// JSON analysis response
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub task_id: String,
    pub filename: String,
    pub report: AnalysisReport,
}

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}
