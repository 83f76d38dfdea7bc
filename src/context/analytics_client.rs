use crate::context::config::ApiConfig;
use crate::dataset::{DataRow, MetadataEntry};
use crate::task::{CreateTaskRequest, FilterParams, Task, TaskStatusResponse};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Trait for talking to the analytics backend
#[async_trait]
pub trait AnalyticsClient: Send + Sync {
    /// Fetch the column descriptions of the dataset
    async fn get_metadata(&self) -> Result<Vec<MetadataEntry>, ApiError>;

    /// Start a new analytics task for the given filter
    async fn create_task(&self, filter: &FilterParams) -> Result<Task, ApiError>;

    /// Read the current status string of a task
    async fn get_status(&self, task_id: &str) -> Result<String, ApiError>;

    /// Fetch the result rows of a task.
    ///
    /// The backend only has rows once the task reports "completed"; callers
    /// are expected to check first.
    async fn get_data(&self, task_id: &str) -> Result<Vec<DataRow>, ApiError>;
}

/// HTTP implementation of AnalyticsClient backed by a single reqwest client
#[derive(Clone)]
pub struct DefaultAnalyticsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DefaultAnalyticsClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.clone()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    /// Append path segments to the base URL, keeping any prefix it already has
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl AnalyticsClient for DefaultAnalyticsClient {
    async fn get_metadata(&self) -> Result<Vec<MetadataEntry>, ApiError> {
        let url = self.endpoint(&["metadata"])?;
        debug!(%url, "fetching metadata");
        read_json(self.http.get(url).send().await?).await
    }

    async fn create_task(&self, filter: &FilterParams) -> Result<Task, ApiError> {
        let url = self.endpoint(&["tasks"])?;
        debug!(%url, makes = ?filter.make, "creating task");
        let body = CreateTaskRequest {
            filter_params: filter,
        };
        read_json(self.http.post(url).json(&body).send().await?).await
    }

    async fn get_status(&self, task_id: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["tasks", task_id])?;
        debug!(%url, "checking task status");
        let response: TaskStatusResponse = read_json(self.http.get(url).send().await?).await?;
        Ok(response.status)
    }

    async fn get_data(&self, task_id: &str) -> Result<Vec<DataRow>, ApiError> {
        let url = self.endpoint(&["data", task_id])?;
        debug!(%url, "fetching task data");
        read_json(self.http.get(url).send().await?).await
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
