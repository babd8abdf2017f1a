use crate::types::{TaskInfo, TaskStatus};
use crate::workflow::{AnalysisStage, ProgressReporter};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use uuid::Uuid;

/// Finished tasks kept for `/tasks` before the oldest are dropped
const MAX_FINISHED_TASKS: usize = 50;

struct TaskEntry {
    info: TaskInfo,
    cancel: CancellationToken,
}

/// Tracks analysis runs and their cancellation tokens
pub struct JobManager {
    tasks: Arc<RwLock<HashMap<String, TaskEntry>>>,
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}

impl JobManager {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a run; the returned token cancels it
    pub async fn create_task(&self, filename: String) -> (String, CancellationToken) {
        self.create_task_with_id(filename, None).await
    }

    /// Register a run under a caller-chosen id
    ///
    /// The requested id is used only when it is a UUID not already tracked;
    /// otherwise a fresh one is generated.
    pub async fn create_task_with_id(
        &self,
        filename: String,
        requested_id: Option<String>,
    ) -> (String, CancellationToken) {
        let mut tasks = self.tasks.write().await;

        let task_id = requested_id
            .and_then(|id| Uuid::parse_str(&id).ok())
            .map(|id| id.to_string())
            .filter(|id| !tasks.contains_key(id))
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let cancel = CancellationToken::new();
        let info = TaskInfo {
            task_id: task_id.clone(),
            filename,
            status: TaskStatus::Running,
            progress: 0,
            message: "Starting...".to_string(),
            started_at: Utc::now(),
        };

        prune_finished(&mut tasks);
        tasks.insert(
            task_id.clone(),
            TaskEntry {
                info,
                cancel: cancel.clone(),
            },
        );

        (task_id, cancel)
    }

    pub async fn update_progress(&self, task_id: &str, progress: u8, message: String) {
        if let Some(task) = self.tasks.write().await.get_mut(task_id) {
            if task.info.status == TaskStatus::Running {
                task.info.progress = progress;
                task.info.message = message;
            }
        }
    }

    /// Mark a run finished unless it was cancelled meanwhile
    pub async fn complete_task(&self, task_id: &str) {
        if let Some(task) = self.tasks.write().await.get_mut(task_id) {
            if task.info.status == TaskStatus::Running {
                task.info.status = TaskStatus::Completed;
                task.info.progress = 100;
                task.info.message = "Completed".to_string();
            }
        }
    }

    pub async fn fail_task(&self, task_id: &str, error: String) {
        if let Some(task) = self.tasks.write().await.get_mut(task_id) {
            if task.info.status == TaskStatus::Cancelled {
                return;
            }
            task.info.status = TaskStatus::Failed;
            task.info.message = error;
        }
    }

    /// Newest first
    pub async fn get_tasks(&self) -> Vec<TaskInfo> {
        let mut tasks: Vec<TaskInfo> = self
            .tasks
            .read()
            .await
            .values()
            .map(|t| t.info.clone())
            .collect();
        tasks.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        tasks
    }

    pub async fn get_task(&self, task_id: &str) -> Option<TaskInfo> {
        self.tasks.read().await.get(task_id).map(|t| t.info.clone())
    }

    /// Cancel a running task; false if unknown or already finished
    pub async fn cancel_task(&self, task_id: &str) -> bool {
        self.stop_task(task_id, "Cancelled by user").await
    }

    /// Close out a run whose request went away before it finished
    pub async fn abandon_task(&self, task_id: &str) -> bool {
        self.stop_task(task_id, "Request closed before completion").await
    }

    async fn stop_task(&self, task_id: &str, message: &str) -> bool {
        match self.tasks.write().await.get_mut(task_id) {
            Some(task) if task.info.status == TaskStatus::Running => {
                task.cancel.cancel();
                task.info.status = TaskStatus::Cancelled;
                task.info.message = message.to_string();
                true
            }
            _ => false,
        }
    }
}

fn prune_finished(tasks: &mut HashMap<String, TaskEntry>) {
    let mut finished: Vec<(String, chrono::DateTime<Utc>)> = tasks
        .iter()
        .filter(|(_, t)| t.info.status != TaskStatus::Running)
        .map(|(id, t)| (id.clone(), t.info.started_at))
        .collect();

    if finished.len() < MAX_FINISHED_TASKS {
        return;
    }

    finished.sort_by(|a, b| a.1.cmp(&b.1));
    let excess = finished.len() + 1 - MAX_FINISHED_TASKS;
    for (id, _) in finished.into_iter().take(excess) {
        tasks.remove(&id);
    }
}

/// Forwards workflow stages to one task's progress
pub struct TaskProgress {
    job_manager: Arc<JobManager>,
    task_id: String,
}

impl TaskProgress {
    pub fn new(job_manager: Arc<JobManager>, task_id: impl Into<String>) -> Self {
        Self {
            job_manager,
            task_id: task_id.into(),
        }
    }
}

#[async_trait]
impl ProgressReporter for TaskProgress {
    async fn report(&self, stage: &AnalysisStage) {
        self.job_manager
            .update_progress(&self.task_id, stage.progress(), stage.to_string())
            .await;
    }
}

/// Abandons its task on drop unless `finish` was called
///
/// Covers runs whose future is dropped mid-flight, e.g. when the HTTP
/// client disconnects.
pub struct TaskGuard {
    job_manager: Arc<JobManager>,
    task_id: String,
    finished: bool,
}

impl TaskGuard {
    pub fn new(job_manager: Arc<JobManager>, task_id: impl Into<String>) -> Self {
        Self {
            job_manager,
            task_id: task_id.into(),
            finished: false,
        }
    }

    pub fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        let job_manager = self.job_manager.clone();
        let task_id = std::mem::take(&mut self.task_id);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if job_manager.abandon_task(&task_id).await {
                        warn!("Task {} abandoned before completion", task_id);
                    }
                });
            }
            Err(_) => warn!("Task {} dropped outside a runtime; left as is", task_id),
        }
    }
}
