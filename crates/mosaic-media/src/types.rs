use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Model arguments sent to fal.ai as a JSON object
pub type Arguments = Map<String, Value>;

/// Build the argument object for a request
///
/// Starts from `{"prompt": prompt}` when a prompt is given, then overlays the
/// caller's entries. Caller entries win on key collision.
pub fn merge_arguments(prompt: Option<&str>, extra: Option<Arguments>) -> Arguments {
    let mut arguments = Arguments::new();

    if let Some(prompt) = prompt {
        arguments.insert("prompt".to_owned(), Value::String(prompt.to_owned()));
    }

    if let Some(extra) = extra {
        arguments.extend(extra);
    }

    arguments
}

/// Response returned by audio generation when no audio model is configured
pub fn unconfigured_audio_response() -> Value {
    json!({ "audio": { "url": "" } })
}

/// A progress event from the fal.ai queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    /// Waiting for a runner
    InQueue {
        /// Position in the queue
        #[serde(default)]
        queue_position: u64,
    },
    /// Running
    InProgress {
        /// Log lines emitted so far, when requested
        #[serde(default)]
        logs: Option<Vec<LogEntry>>,
    },
    /// Finished; the result can be fetched
    Completed {
        /// Log lines, when requested
        #[serde(default)]
        logs: Option<Vec<LogEntry>>,
        /// Timing metrics reported by the service
        #[serde(default)]
        metrics: Option<Value>,
    },
}

impl QueueStatus {
    /// Whether the job has finished
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Log lines carried by this event
    pub fn logs(&self) -> &[LogEntry] {
        match self {
            Self::InQueue { .. } => &[],
            Self::InProgress { logs } | Self::Completed { logs, .. } => logs.as_deref().unwrap_or_default(),
        }
    }
}

/// A single log line from a running job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log message
    pub message: String,
    /// Severity, e.g. "INFO"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Emitting component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Timestamp as reported by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
