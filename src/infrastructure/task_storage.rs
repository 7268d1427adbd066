use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::domain::{
    storage::KeyValueStorage,
    task::{Task, TaskId, TaskStatus},
};

/// Fixed record key. Bumping the version segment orphans old data, which is
/// then treated as absent rather than migrated.
pub const STORAGE_KEY: &str = "taskstore/tasks/v1";

/// Persistence adapter between the in-memory task sequence and a single
/// serialized record. Never fails: storage errors are logged and downgraded
/// to an empty result or a no-op.
pub struct TaskStorage<S: KeyValueStorage> {
    backend: S,
}

impl<S: KeyValueStorage> TaskStorage<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub async fn load(&self) -> Vec<Task> {
        let raw = match self.backend.get(STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to load tasks");
                return Vec::new();
            }
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "failed to parse persisted tasks");
                return Vec::new();
            }
        };

        let Value::Array(items) = parsed else {
            return Vec::new();
        };
        items.iter().filter_map(coerce_task).collect()
    }

    pub async fn save(&self, tasks: &[Task]) {
        let payload = match serde_json::to_string(tasks) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to serialize tasks");
                return;
            }
        };

        if let Err(err) = self.backend.set(STORAGE_KEY, payload).await {
            warn!(error = %err, "failed to save tasks");
        }
    }

    pub async fn clear(&self) {
        if let Err(err) = self.backend.remove(STORAGE_KEY).await {
            warn!(error = %err, "failed to clear tasks");
        }
    }
}

/// Structural validation of one persisted element. Elements that fail are
/// dropped by the caller; salvageable optional fields degrade individually.
fn coerce_task(value: &Value) -> Option<Task> {
    let record = value.as_object()?;

    let id = record.get("id")?.as_str()?;
    let title = record.get("title")?.as_str()?;
    let status = match record.get("status")?.as_str()? {
        "active" => TaskStatus::Active,
        "completed" => TaskStatus::Completed,
        _ => return None,
    };
    let created_at = parse_timestamp(record.get("createdAt")?)?;

    let description = record
        .get("description")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
        .map(str::to_owned);
    let updated_at = record.get("updatedAt").and_then(parse_timestamp);
    let completed_at = record.get("completedAt").and_then(parse_timestamp);

    Some(Task {
        id: TaskId(id.to_owned()),
        title: title.to_owned(),
        description,
        status,
        created_at,
        updated_at,
        completed_at,
    })
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
