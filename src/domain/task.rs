use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque task identifier. New ids are UUID v4 strings; ids read back from
/// storage are kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    // always serialized; null while the task is active
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Builds a fresh task from an already-sanitized draft.
    pub fn create(draft: TaskDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            status: TaskStatus::Active,
            created_at: now,
            updated_at: Some(now),
            completed_at: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Sanitized form of [`TaskUpdate`]. `description` is tri-state: `None` means
/// the field was not provided, `Some(None)` is an explicit clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
}

impl SanitizedUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// Trims draft input; a blank title rejects the whole draft, a blank
/// description is treated as absent.
pub fn sanitize_draft(draft: TaskDraft) -> Option<TaskDraft> {
    let title = draft.title.trim();
    if title.is_empty() {
        return None;
    }

    let description = draft
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_owned);

    Some(TaskDraft {
        title: title.to_owned(),
        description,
    })
}

/// Trims update input. A title that is blank after trimming is dropped from
/// the update; a blank description becomes an explicit clear.
pub fn sanitize_update(updates: TaskUpdate) -> SanitizedUpdate {
    let mut sanitized = SanitizedUpdate::default();

    if let Some(title) = updates.title {
        let title = title.trim();
        if !title.is_empty() {
            sanitized.title = Some(title.to_owned());
        }
    }

    if let Some(description) = updates.description {
        let description = description.trim();
        sanitized.description = Some(if description.is_empty() {
            None
        } else {
            Some(description.to_owned())
        });
    }

    sanitized.status = updates.status;
    sanitized
}
