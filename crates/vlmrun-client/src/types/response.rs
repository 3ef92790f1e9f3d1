//! Response payloads returned by the API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Lifecycle state of a prediction.
///
/// Unknown server strings are preserved in [`JobStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Enqueued,
    Running,
    Completed,
    Failed,
    Other(String),
}

impl JobStatus {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Enqueued => "enqueued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Other(s) => s,
        }
    }

    /// Returns true only for `completed`.
    pub fn is_completed(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }

    /// Returns true only for `failed`.
    pub fn is_failed(&self) -> bool {
        matches!(self, JobStatus::Failed)
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => JobStatus::Pending,
            "enqueued" => JobStatus::Enqueued,
            "running" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Other(s),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prediction, as returned by generate endpoints and `/response/{id}`.
///
/// Fields the client does not model are kept in `extra` and written back
/// verbatim on serialization, explicit `null`s included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub id: String,
    pub status: JobStatus,
    /// `Some(Value::Null)` when the server sent `"response": null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub response: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PredictionResponse {
    /// Returns true if the prediction reached `completed`.
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Creation timestamp, if the server sent one.
    pub fn created_at(&self) -> Option<&str> {
        self.extra.get("created_at").and_then(Value::as_str)
    }

    /// Completion timestamp, if the server sent one.
    pub fn completed_at(&self) -> Option<&str> {
        self.extra.get("completed_at").and_then(Value::as_str)
    }

    /// Converts the prediction into a JSON value.
    pub fn into_value(self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Metadata of an uploaded file.
///
/// Only `id` is required; everything else is kept as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResponse {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileResponse {
    pub fn filename(&self) -> Option<&str> {
        self.extra.get("filename").and_then(Value::as_str)
    }

    /// Size in bytes.
    pub fn bytes(&self) -> Option<u64> {
        self.extra.get("bytes").and_then(Value::as_u64)
    }

    pub fn purpose(&self) -> Option<&str> {
        self.extra.get("purpose").and_then(Value::as_str)
    }

    pub fn created_at(&self) -> Option<&str> {
        self.extra.get("created_at").and_then(Value::as_str)
    }
}

/// Deserializes a present field as `Some`, keeping an explicit `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
