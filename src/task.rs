use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Makes requested when the user does not pass any `--make` filter
pub const DEFAULT_MAKES: [&str; 2] = ["TESLA", "BMW"];

/// A server-side analytics job as reported by `POST /tasks`.
///
/// The backend hands out integer ids; they are kept as strings so the
/// client does not care how the server numbers its tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "task_id", deserialize_with = "string_or_number")]
    pub id: String,
    pub status: String,
}

/// Body of `GET /tasks/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatusResponse {
    pub status: String,
}

/// Parsed view of the free-form status string the backend reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Other(String),
}

impl TaskStatus {
    /// Exact match on the backend's spelling; anything else is `Other`
    /// and never counts as completed.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => TaskStatus::Pending,
            "running" | "in progress" => TaskStatus::Running,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            _ => TaskStatus::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "PENDING"),
            TaskStatus::Running => write!(f, "RUNNING"),
            TaskStatus::Completed => write!(f, "COMPLETED"),
            TaskStatus::Failed => write!(f, "FAILED"),
            TaskStatus::Other(raw) => write!(f, "{}", raw.to_uppercase()),
        }
    }
}

/// Filter sent with a new task; the backend decides what the makes match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    pub make: Vec<String>,
}

impl FilterParams {
    pub fn new(makes: Vec<String>) -> Self {
        Self { make: makes }
    }

    /// Use `makes` unless empty, in which case fall back to `defaults`
    pub fn from_makes_or(makes: &[String], defaults: &[String]) -> Self {
        if makes.is_empty() {
            Self::new(defaults.to_vec())
        } else {
            Self::new(makes.to_vec())
        }
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self::new(DEFAULT_MAKES.iter().map(|m| m.to_string()).collect())
    }
}

/// Request body of `POST /tasks`
#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskRequest<'a> {
    pub filter_params: &'a FilterParams,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        UInt(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::UInt(n) => n.to_string(),
    })
}
