// Data model for the task list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single to-do item.
///
/// `id` is assigned once at creation and never reused. `text` is always
/// non-empty and trimmed after any committed mutation. `created_at` is
/// immutable and round-trips through the blob as an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a fresh task with a new unique id and the current time.
    /// The caller is responsible for trimming and rejecting empty text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            text: text.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }
}

/// Status counts derived from the current collection.
/// `total == active + completed` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}
