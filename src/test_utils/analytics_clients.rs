use crate::context::analytics_client::{AnalyticsClient, ApiError};
use crate::dataset::{DataRow, MetadataEntry};
use crate::task::{FilterParams, Task};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A no-op implementation of AnalyticsClient for testing
#[derive(Clone)]
pub struct NoOpAnalyticsClient;

#[async_trait]
impl AnalyticsClient for NoOpAnalyticsClient {
    async fn get_metadata(&self) -> Result<Vec<MetadataEntry>, ApiError> {
        Ok(vec![])
    }

    async fn create_task(&self, _filter: &FilterParams) -> Result<Task, ApiError> {
        Ok(Task {
            id: "noop-task".to_string(),
            status: "pending".to_string(),
        })
    }

    async fn get_status(&self, _task_id: &str) -> Result<String, ApiError> {
        Ok("pending".to_string())
    }

    async fn get_data(&self, _task_id: &str) -> Result<Vec<DataRow>, ApiError> {
        Ok(vec![])
    }
}

/// An AnalyticsClient whose every call fails with a 500
#[derive(Clone)]
pub struct FailingAnalyticsClient {
    pub message: String,
}

impl FailingAnalyticsClient {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    fn error(&self) -> ApiError {
        ApiError::Status {
            status: 500,
            message: self.message.clone(),
        }
    }
}

#[async_trait]
impl AnalyticsClient for FailingAnalyticsClient {
    async fn get_metadata(&self) -> Result<Vec<MetadataEntry>, ApiError> {
        Err(self.error())
    }

    async fn create_task(&self, _filter: &FilterParams) -> Result<Task, ApiError> {
        Err(self.error())
    }

    async fn get_status(&self, _task_id: &str) -> Result<String, ApiError> {
        Err(self.error())
    }

    async fn get_data(&self, _task_id: &str) -> Result<Vec<DataRow>, ApiError> {
        Err(self.error())
    }
}

/// Scripted AnalyticsClient that records every call.
///
/// Statuses and data sets are handed out in order; once a queue has a single
/// entry left that entry is repeated. Setting `fail_data` makes `get_data`
/// return an error while still recording the call.
pub struct TrackedAnalyticsClient {
    pub metadata: Vec<MetadataEntry>,
    pub task: Task,
    pub statuses: Mutex<VecDeque<String>>,
    pub data_sets: Mutex<VecDeque<Vec<DataRow>>>,
    pub fail_data: bool,

    pub create_task_calls: Arc<Mutex<Vec<FilterParams>>>,
    pub get_status_calls: Arc<Mutex<Vec<String>>>,
    pub get_data_calls: Arc<Mutex<Vec<String>>>,
}

impl Default for TrackedAnalyticsClient {
    fn default() -> Self {
        Self {
            metadata: Vec::new(),
            task: Task {
                id: "1".to_string(),
                status: "pending".to_string(),
            },
            statuses: Mutex::new(VecDeque::from(vec!["pending".to_string()])),
            data_sets: Mutex::new(VecDeque::from(vec![Vec::new()])),
            fail_data: false,
            create_task_calls: Arc::new(Mutex::new(Vec::new())),
            get_status_calls: Arc::new(Mutex::new(Vec::new())),
            get_data_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl TrackedAnalyticsClient {
    pub fn with_statuses(statuses: &[&str]) -> Self {
        Self {
            statuses: Mutex::new(statuses.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn with_data_sets(mut self, data_sets: Vec<Vec<DataRow>>) -> Self {
        self.data_sets = Mutex::new(data_sets.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Vec<MetadataEntry>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_task(mut self, id: &str, status: &str) -> Self {
        self.task = Task {
            id: id.to_string(),
            status: status.to_string(),
        };
        self
    }

    pub fn data_call_count(&self) -> usize {
        self.get_data_calls.lock().unwrap().len()
    }

    fn next_from<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl AnalyticsClient for TrackedAnalyticsClient {
    async fn get_metadata(&self) -> Result<Vec<MetadataEntry>, ApiError> {
        Ok(self.metadata.clone())
    }

    async fn create_task(&self, filter: &FilterParams) -> Result<Task, ApiError> {
        self.create_task_calls.lock().unwrap().push(filter.clone());
        Ok(self.task.clone())
    }

    async fn get_status(&self, task_id: &str) -> Result<String, ApiError> {
        self.get_status_calls
            .lock()
            .unwrap()
            .push(task_id.to_string());
        Ok(Self::next_from(&self.statuses).unwrap_or_else(|| "pending".to_string()))
    }

    async fn get_data(&self, task_id: &str) -> Result<Vec<DataRow>, ApiError> {
        self.get_data_calls.lock().unwrap().push(task_id.to_string());
        if self.fail_data {
            return Err(ApiError::Status {
                status: 404,
                message: "No data found for this task".to_string(),
            });
        }
        Ok(Self::next_from(&self.data_sets).unwrap_or_default())
    }
}

/// Metadata entries shaped like the backend's column descriptions
pub fn sample_metadata(count: usize) -> Vec<MetadataEntry> {
    (0..count)
        .map(|i| MetadataEntry {
            name: format!("Column {}", i + 1),
            description: format!("Description of column {}", i + 1),
            data_type: if i % 2 == 0 { "text" } else { "number" }.to_string(),
        })
        .collect()
}
