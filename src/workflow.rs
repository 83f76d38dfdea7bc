//! Task lifecycle: create a task, check its status, fetch its rows.
//!
//! `ViewState` is the only place the lifecycle writes to. Renderers read it;
//! `TaskWorkflow` is the single writer.

use crate::context::AppContext;
use crate::context::analytics_client::{AnalyticsClient, ApiError};
use crate::dataset::{DataRow, MetadataEntry};
use crate::task::{FilterParams, TaskStatus};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("No task has been created yet")]
    NoTask,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Where the current task is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    /// Task exists on the server; waiting for a status check to report completion
    TaskCreated { task_id: String },
    /// Server reported completion; rows not loaded yet
    Completed { task_id: String },
    /// Rows for this task are in the view state
    DataLoaded { task_id: String },
    /// Server reported the task as failed
    Failed { task_id: String },
}

impl WorkflowState {
    pub fn task_id(&self) -> Option<&str> {
        match self {
            WorkflowState::Idle => None,
            WorkflowState::TaskCreated { task_id }
            | WorkflowState::Completed { task_id }
            | WorkflowState::DataLoaded { task_id }
            | WorkflowState::Failed { task_id } => Some(task_id),
        }
    }
}

/// Result of loading the dataset column descriptions
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MetadataState {
    #[default]
    NotLoaded,
    Loaded(Vec<MetadataEntry>),
    Unavailable(String),
}

impl MetadataState {
    pub fn entries(&self) -> &[MetadataEntry] {
        match self {
            MetadataState::Loaded(entries) => entries,
            MetadataState::NotLoaded | MetadataState::Unavailable(_) => &[],
        }
    }
}

/// Everything the renderers need to draw the page
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub workflow: WorkflowState,
    /// Status string exactly as the server last reported it
    pub status: Option<String>,
    pub rows: Vec<DataRow>,
    pub metadata: MetadataState,
    pub last_error: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// View state for a task created elsewhere (e.g. by a previous CLI invocation)
    pub fn for_task(task_id: &str) -> Self {
        Self {
            workflow: WorkflowState::TaskCreated {
                task_id: task_id.to_string(),
            },
            ..Self::default()
        }
    }

    pub fn task_id(&self) -> Option<&str> {
        self.workflow.task_id()
    }

    fn record<T>(&mut self, result: Result<T, WorkflowError>) -> Result<T, WorkflowError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => self.last_error = Some(e.to_string()),
        }
        result
    }
}

/// Outcome of a status check
#[derive(Debug, Clone, PartialEq)]
pub enum StatusCheck {
    /// Task is not finished; carries the parsed status
    InProgress(TaskStatus),
    /// Task completed and its rows were fetched
    DataLoaded { rows: usize },
    /// Task completed earlier and its rows are already loaded
    AlreadyLoaded,
    /// Server reported the task as failed
    Failed,
}

pub struct TaskWorkflow {
    client: Arc<dyn AnalyticsClient>,
}

impl TaskWorkflow {
    pub fn new(ctx: &AppContext) -> Self {
        Self::with_client(ctx.analytics_client())
    }

    pub fn with_client(client: Arc<dyn AnalyticsClient>) -> Self {
        Self { client }
    }

    /// Load dataset metadata. Failures are logged and leave the listing empty.
    pub async fn load_metadata(&self, state: &mut ViewState) {
        state.metadata = match self.client.get_metadata().await {
            Ok(entries) => {
                info!(count = entries.len(), "loaded dataset metadata");
                MetadataState::Loaded(entries)
            }
            Err(e) => {
                warn!(error = %e, "failed to load dataset metadata");
                MetadataState::Unavailable(e.to_string())
            }
        };
    }

    /// Create a new task and make it the current one
    pub async fn create_task(
        &self,
        state: &mut ViewState,
        filter: &FilterParams,
    ) -> Result<(), WorkflowError> {
        let result = self.client.create_task(filter).await.map_err(WorkflowError::from);
        let result = state.record(result);
        let task = result?;

        info!(task_id = %task.id, status = %task.status, "created task");
        state.workflow = WorkflowState::TaskCreated { task_id: task.id };
        state.status = Some(task.status);
        Ok(())
    }

    /// Re-read the current task's status and fetch its rows once it has completed
    pub async fn check_status(&self, state: &mut ViewState) -> Result<StatusCheck, WorkflowError> {
        let result = self.try_check_status(state).await;
        state.record(result)
    }

    async fn try_check_status(&self, state: &mut ViewState) -> Result<StatusCheck, WorkflowError> {
        let task_id = state.task_id().ok_or(WorkflowError::NoTask)?.to_string();
        let raw = self.client.get_status(&task_id).await?;
        state.status = Some(raw.clone());

        match TaskStatus::parse(&raw) {
            TaskStatus::Completed => {
                if matches!(&state.workflow, WorkflowState::DataLoaded { task_id: loaded } if *loaded == task_id)
                {
                    return Ok(StatusCheck::AlreadyLoaded);
                }
                state.workflow = WorkflowState::Completed {
                    task_id: task_id.clone(),
                };
                let rows = self.load_rows(state, &task_id).await?;
                Ok(StatusCheck::DataLoaded { rows })
            }
            TaskStatus::Failed => {
                warn!(%task_id, "task reported as failed");
                state.workflow = WorkflowState::Failed { task_id };
                Ok(StatusCheck::Failed)
            }
            status @ (TaskStatus::Pending | TaskStatus::Running | TaskStatus::Other(_)) => {
                state.workflow = WorkflowState::TaskCreated { task_id };
                Ok(StatusCheck::InProgress(status))
            }
        }
    }

    /// Fetch the current task's rows without checking its status first
    pub async fn fetch_data(&self, state: &mut ViewState) -> Result<usize, WorkflowError> {
        let result = match state.task_id().map(str::to_string) {
            Some(task_id) => self.load_rows(state, &task_id).await,
            None => Err(WorkflowError::NoTask),
        };
        state.record(result)
    }

    async fn load_rows(&self, state: &mut ViewState, task_id: &str) -> Result<usize, WorkflowError> {
        let rows = self.client.get_data(task_id).await?;
        info!(%task_id, rows = rows.len(), "loaded task data");

        let count = rows.len();
        state.rows = rows;
        state.workflow = WorkflowState::DataLoaded {
            task_id: task_id.to_string(),
        };
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailingAnalyticsClient, TrackedAnalyticsClient, sample_metadata};

    fn tesla() -> DataRow {
        DataRow::new("TESLA", 300.0, 2022, 40000.0)
    }

    fn workflow_for(client: &Arc<TrackedAnalyticsClient>) -> TaskWorkflow {
        TaskWorkflow::with_client(client.clone())
    }

    #[tokio::test]
    async fn test_create_task_sets_id_and_status_verbatim() {
        let client = Arc::new(TrackedAnalyticsClient::default().with_task("42", "Pending"));
        let workflow = workflow_for(&client);
        let mut state = ViewState::new();

        workflow
            .create_task(&mut state, &FilterParams::default())
            .await
            .unwrap();

        assert_eq!(state.task_id(), Some("42"));
        assert_eq!(state.status.as_deref(), Some("Pending"));
        assert_eq!(
            state.workflow,
            WorkflowState::TaskCreated {
                task_id: "42".to_string()
            }
        );
        assert_eq!(
            client.create_task_calls.lock().unwrap()[0],
            FilterParams::default()
        );
    }

    #[tokio::test]
    async fn test_completed_status_triggers_exactly_one_fetch() {
        let client = Arc::new(
            TrackedAnalyticsClient::with_statuses(&["completed"])
                .with_data_sets(vec![vec![tesla()]]),
        );
        let workflow = workflow_for(&client);
        let mut state = ViewState::new();

        workflow
            .create_task(&mut state, &FilterParams::default())
            .await
            .unwrap();
        let outcome = workflow.check_status(&mut state).await.unwrap();

        assert_eq!(outcome, StatusCheck::DataLoaded { rows: 1 });
        assert_eq!(client.data_call_count(), 1);
        assert_eq!(state.rows, vec![tesla()]);
        assert_eq!(
            state.workflow,
            WorkflowState::DataLoaded {
                task_id: "1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_completed_task_is_not_fetched_twice() {
        let client = Arc::new(
            TrackedAnalyticsClient::with_statuses(&["completed"])
                .with_data_sets(vec![vec![tesla()]]),
        );
        let workflow = workflow_for(&client);
        let mut state = ViewState::new();

        workflow
            .create_task(&mut state, &FilterParams::default())
            .await
            .unwrap();
        workflow.check_status(&mut state).await.unwrap();
        let outcome = workflow.check_status(&mut state).await.unwrap();

        assert_eq!(outcome, StatusCheck::AlreadyLoaded);
        assert_eq!(client.data_call_count(), 1);
        assert_eq!(client.get_status_calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_other_statuses_do_not_fetch() {
        for status in ["pending", "in progress", "running", "queued-somewhere", "failed"] {
            let client = Arc::new(TrackedAnalyticsClient::with_statuses(&[status]));
            let workflow = workflow_for(&client);
            let mut state = ViewState::new();

            workflow
                .create_task(&mut state, &FilterParams::default())
                .await
                .unwrap();
            workflow.check_status(&mut state).await.unwrap();

            assert_eq!(client.data_call_count(), 0, "status {status} fetched data");
            assert_eq!(state.status.as_deref(), Some(status));
            assert!(state.rows.is_empty());
        }
    }

    #[tokio::test]
    async fn test_near_miss_completion_strings_do_not_fetch() {
        for status in ["complete", "Completed", " COMPLETED ", "COMPLETED"] {
            let client = Arc::new(TrackedAnalyticsClient::with_statuses(&[status]));
            let workflow = workflow_for(&client);
            let mut state = ViewState::new();

            workflow
                .create_task(&mut state, &FilterParams::default())
                .await
                .unwrap();
            let outcome = workflow.check_status(&mut state).await.unwrap();

            assert_eq!(client.data_call_count(), 0, "status {status:?} fetched data");
            assert!(matches!(outcome, StatusCheck::InProgress(TaskStatus::Other(_))));
            assert!(matches!(state.workflow, WorkflowState::TaskCreated { .. }));
        }
    }

    #[tokio::test]
    async fn test_failed_status_is_terminal_state() {
        let client = Arc::new(TrackedAnalyticsClient::with_statuses(&["failed"]));
        let workflow = workflow_for(&client);
        let mut state = ViewState::new();

        workflow
            .create_task(&mut state, &FilterParams::default())
            .await
            .unwrap();
        let outcome = workflow.check_status(&mut state).await.unwrap();

        assert_eq!(outcome, StatusCheck::Failed);
        assert_eq!(
            state.workflow,
            WorkflowState::Failed {
                task_id: "1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_polling_until_completed() {
        let client = Arc::new(
            TrackedAnalyticsClient::with_statuses(&["pending", "in progress", "completed"])
                .with_data_sets(vec![vec![tesla()]]),
        );
        let workflow = workflow_for(&client);
        let mut state = ViewState::new();
        workflow
            .create_task(&mut state, &FilterParams::default())
            .await
            .unwrap();

        assert_eq!(
            workflow.check_status(&mut state).await.unwrap(),
            StatusCheck::InProgress(TaskStatus::Pending)
        );
        assert_eq!(
            workflow.check_status(&mut state).await.unwrap(),
            StatusCheck::InProgress(TaskStatus::Running)
        );
        assert_eq!(client.data_call_count(), 0);

        assert_eq!(
            workflow.check_status(&mut state).await.unwrap(),
            StatusCheck::DataLoaded { rows: 1 }
        );
        assert_eq!(client.data_call_count(), 1);
    }

    #[tokio::test]
    async fn test_refetch_replaces_rows() {
        let first = vec![tesla(), DataRow::new("BMW", 150.0, 2020, 55000.0)];
        let second = vec![DataRow::new("NISSAN", 220.0, 2021, 30000.0)];
        let client = Arc::new(
            TrackedAnalyticsClient::default().with_data_sets(vec![first.clone(), second.clone()]),
        );
        let workflow = workflow_for(&client);
        let mut state = ViewState::for_task("9");

        workflow.fetch_data(&mut state).await.unwrap();
        assert_eq!(state.rows, first);

        workflow.fetch_data(&mut state).await.unwrap();
        assert_eq!(state.rows, second);
    }

    #[tokio::test]
    async fn test_check_status_without_task() {
        let client = Arc::new(TrackedAnalyticsClient::default());
        let workflow = workflow_for(&client);
        let mut state = ViewState::new();

        let err = workflow.check_status(&mut state).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NoTask));
        assert_eq!(
            state.last_error.as_deref(),
            Some("No task has been created yet")
        );
        assert!(client.get_status_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_call_keeps_prior_state() {
        let good = Arc::new(
            TrackedAnalyticsClient::with_statuses(&["completed"])
                .with_task("5", "pending")
                .with_data_sets(vec![vec![tesla()]]),
        );
        let mut state = ViewState::new();
        let workflow = workflow_for(&good);
        workflow
            .create_task(&mut state, &FilterParams::default())
            .await
            .unwrap();
        workflow.check_status(&mut state).await.unwrap();
        let before_workflow = state.workflow.clone();

        let failing = TaskWorkflow::with_client(Arc::new(FailingAnalyticsClient::new("down")));
        assert!(
            failing
                .create_task(&mut state, &FilterParams::default())
                .await
                .is_err()
        );
        assert!(failing.check_status(&mut state).await.is_err());

        assert_eq!(state.workflow, before_workflow);
        assert_eq!(state.status.as_deref(), Some("completed"));
        assert_eq!(state.rows, vec![tesla()]);
        assert_eq!(
            state.last_error.as_deref(),
            Some("Server returned 500: down")
        );

        workflow.check_status(&mut state).await.unwrap();
        assert_eq!(state.last_error, None);
    }

    #[tokio::test]
    async fn test_failed_fetch_after_completion_can_be_retried() {
        let mut client = TrackedAnalyticsClient::with_statuses(&["completed"]);
        client.fail_data = true;
        let client = Arc::new(client);
        let workflow = workflow_for(&client);
        let mut state = ViewState::new();
        workflow
            .create_task(&mut state, &FilterParams::default())
            .await
            .unwrap();

        assert!(workflow.check_status(&mut state).await.is_err());
        assert_eq!(
            state.workflow,
            WorkflowState::Completed {
                task_id: "1".to_string()
            }
        );

        assert!(workflow.check_status(&mut state).await.is_err());
        assert_eq!(client.data_call_count(), 2);
    }

    #[tokio::test]
    async fn test_metadata_loaded() {
        let client = Arc::new(TrackedAnalyticsClient::default().with_metadata(sample_metadata(3)));
        let workflow = workflow_for(&client);
        let mut state = ViewState::new();

        workflow.load_metadata(&mut state).await;

        assert_eq!(state.metadata.entries().len(), 3);
    }

    #[tokio::test]
    async fn test_metadata_failure_leaves_listing_empty() {
        let workflow = TaskWorkflow::with_client(Arc::new(FailingAnalyticsClient::new("gone")));
        let mut state = ViewState::new();

        workflow.load_metadata(&mut state).await;

        assert!(state.metadata.entries().is_empty());
        assert!(matches!(state.metadata, MetadataState::Unavailable(_)));
        assert_eq!(state.last_error, None);
    }
}
