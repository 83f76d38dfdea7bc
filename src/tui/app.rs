use crate::task::FilterParams;
use crate::workflow::{MetadataState, StatusCheck, TaskWorkflow, ViewState};
use ratatui::widgets::ListState;

/// Network-bound actions the user can trigger from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateTask,
    CheckStatus,
    ReloadMetadata,
}

impl Action {
    /// Text shown in the header while the action is in flight
    pub fn busy_label(&self) -> &'static str {
        match self {
            Action::CreateTask => "Creating task...",
            Action::CheckStatus => "Checking status...",
            Action::ReloadMetadata => "Loading metadata...",
        }
    }
}

/// Application state for the dashboard.
///
/// Wraps the workflow's `ViewState` with the UI-only bits: metadata list
/// selection, activity messages and the in-flight marker.
pub struct DashboardApp {
    /// Task, status, rows and metadata as written by the workflow
    pub state: ViewState,
    /// Filter sent with every new task
    pub filter: FilterParams,
    /// Base URL of the backend, shown in the header
    pub backend: String,
    /// Selection state for the metadata list
    pub metadata_list_state: ListState,
    /// Timestamped activity messages
    pub activity: Vec<(chrono::DateTime<chrono::Local>, String)>,
    /// Action currently awaiting a response
    pub busy: Option<Action>,
    /// Whether the application should exit
    pub should_quit: bool,
}

impl DashboardApp {
    pub fn new(filter: FilterParams, backend: impl Into<String>) -> Self {
        Self {
            state: ViewState::new(),
            filter,
            backend: backend.into(),
            metadata_list_state: ListState::default(),
            activity: Vec::new(),
            busy: None,
            should_quit: false,
        }
    }

    pub fn push_activity(&mut self, message: impl Into<String>) {
        self.activity.push((chrono::Local::now(), message.into()));

        // Keep activity bounded
        if self.activity.len() > 100 {
            self.activity.drain(..self.activity.len() - 100);
        }
    }

    /// Move the metadata selection down, clamping at the last entry
    pub fn select_next_metadata(&mut self) {
        let len = self.state.metadata.entries().len();
        if len == 0 {
            return;
        }
        let next = self
            .metadata_list_state
            .selected()
            .map_or(0, |current| (current + 1).min(len - 1));
        self.metadata_list_state.select(Some(next));
    }

    /// Move the metadata selection up, clamping at the first entry
    pub fn select_previous_metadata(&mut self) {
        if self.state.metadata.entries().is_empty() {
            return;
        }
        let prev = self
            .metadata_list_state
            .selected()
            .map_or(0, |current| current.saturating_sub(1));
        self.metadata_list_state.select(Some(prev));
    }

    /// Run an action against the backend and record what happened
    pub async fn perform(&mut self, workflow: &TaskWorkflow, action: Action) {
        match action {
            Action::CreateTask => {
                match workflow.create_task(&mut self.state, &self.filter).await {
                    Ok(()) => {
                        let task_id = self.state.task_id().unwrap_or_default().to_string();
                        self.push_activity(format!("Created task {task_id}"));
                    }
                    Err(e) => self.push_activity(format!("Create failed: {e}")),
                }
            }
            Action::CheckStatus => match workflow.check_status(&mut self.state).await {
                Ok(StatusCheck::InProgress(status)) => {
                    self.push_activity(format!("Task is {status}"));
                }
                Ok(StatusCheck::DataLoaded { rows }) => {
                    self.push_activity(format!("Task completed, loaded {rows} rows"));
                }
                Ok(StatusCheck::AlreadyLoaded) => {
                    self.push_activity("Task completed, data already loaded");
                }
                Ok(StatusCheck::Failed) => {
                    self.push_activity("Task failed on the server");
                }
                Err(e) => self.push_activity(format!("Status check failed: {e}")),
            },
            Action::ReloadMetadata => {
                workflow.load_metadata(&mut self.state).await;
                let count = self.state.metadata.entries().len();
                let message = match &self.state.metadata {
                    MetadataState::Unavailable(reason) => {
                        format!("Metadata unavailable: {reason}")
                    }
                    _ => format!("Loaded {count} metadata entries"),
                };
                self.push_activity(message);
                self.metadata_list_state
                    .select(if count == 0 { None } else { Some(0) });
            }
        }
    }
}
