use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    storage::KeyValueStorage,
    task::{SanitizedUpdate, Task, TaskDraft, TaskId, TaskStatus, TaskUpdate, sanitize_draft,
        sanitize_update},
};
use crate::infrastructure::task_storage::TaskStorage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksState {
    pub tasks: Vec<Task>,
    pub is_hydrated: bool,
    pub is_loading: bool,
}

impl Default for TasksState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            is_hydrated: false,
            is_loading: true,
        }
    }
}

#[derive(Debug, Clone)]
pub enum TaskAction {
    Hydrate(Vec<Task>),
    Add(Task),
    Update { id: TaskId, updates: SanitizedUpdate },
    Toggle { id: TaskId },
    Delete { id: TaskId },
    ClearCompleted,
}

/// Pure transition function: no I/O, no clock reads. Returns whether the task
/// sequence changed; hydration never counts as a change.
pub fn reduce(state: &mut TasksState, action: TaskAction, now: DateTime<Utc>) -> bool {
    match action {
        TaskAction::Hydrate(tasks) => {
            state.tasks = tasks;
            state.is_hydrated = true;
            state.is_loading = false;
            false
        }
        TaskAction::Add(task) => {
            state.tasks.insert(0, task);
            true
        }
        TaskAction::Update { id, updates } => {
            let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else {
                return false;
            };
            task.updated_at = Some(now);
            if let Some(status) = updates.status
                && status != task.status
            {
                apply_status_transition(task, status, now);
            }
            if let Some(title) = updates.title {
                task.title = title;
            }
            if let Some(description) = updates.description {
                task.description = description;
            }
            true
        }
        TaskAction::Toggle { id } => {
            let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else {
                return false;
            };
            let next = match task.status {
                TaskStatus::Active => TaskStatus::Completed,
                TaskStatus::Completed => TaskStatus::Active,
            };
            apply_status_transition(task, next, now);
            true
        }
        TaskAction::Delete { id } => {
            let before = state.tasks.len();
            state.tasks.retain(|t| t.id != id);
            state.tasks.len() != before
        }
        TaskAction::ClearCompleted => {
            let before = state.tasks.len();
            state.tasks.retain(|t| t.status != TaskStatus::Completed);
            state.tasks.len() != before
        }
    }
}

fn apply_status_transition(task: &mut Task, status: TaskStatus, now: DateTime<Utc>) {
    task.status = status;
    task.updated_at = Some(now);
    task.completed_at = match status {
        TaskStatus::Completed => Some(now),
        TaskStatus::Active => None,
    };
}

/// Single source of truth for the task collection. Mutations are applied
/// synchronously through [`reduce`]; each one that changes the sequence after
/// hydration detaches a best-effort save of the full snapshot (last write
/// wins, saves may race).
///
/// Construct one per consumer scope and pass it by handle; dropping it is the
/// disposal. Requires a tokio runtime for the detached saves.
pub struct TaskStore<S: KeyValueStorage> {
    state: TasksState,
    storage: Arc<TaskStorage<S>>,
}

impl<S: KeyValueStorage> TaskStore<S> {
    pub fn new(storage: TaskStorage<S>) -> Self {
        Self {
            state: TasksState::default(),
            storage: Arc::new(storage),
        }
    }

    /// One-time load from storage. Re-invocation is a no-op; dropping the
    /// future before completion leaves the store un-hydrated.
    pub async fn hydrate(&mut self) {
        if self.state.is_hydrated {
            return;
        }
        let tasks = self.storage.load().await;
        self.dispatch(TaskAction::Hydrate(tasks));
    }

    /// Returns the created task, or `None` when the draft title is blank.
    pub fn add_task(&mut self, draft: TaskDraft) -> Option<Task> {
        let draft = sanitize_draft(draft)?;
        let task = Task::create(draft, Utc::now());
        self.dispatch(TaskAction::Add(task.clone()));
        Some(task)
    }

    /// Returns `false` when sanitization leaves nothing to apply. An unknown
    /// id is absorbed silently; the return value reflects input validity, not
    /// lookup success.
    pub fn update_task(&mut self, id: &TaskId, updates: TaskUpdate) -> bool {
        let updates = sanitize_update(updates);
        if updates.is_empty() {
            return false;
        }
        self.dispatch(TaskAction::Update {
            id: id.clone(),
            updates,
        });
        true
    }

    pub fn toggle_task(&mut self, id: &TaskId) {
        self.dispatch(TaskAction::Toggle { id: id.clone() });
    }

    pub fn delete_task(&mut self, id: &TaskId) {
        self.dispatch(TaskAction::Delete { id: id.clone() });
    }

    pub fn clear_completed(&mut self) {
        self.dispatch(TaskAction::ClearCompleted);
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn active_tasks(&self) -> Vec<Task> {
        self.filtered(TaskStatus::Active)
    }

    pub fn completed_tasks(&self) -> Vec<Task> {
        self.filtered(TaskStatus::Completed)
    }

    pub fn is_hydrated(&self) -> bool {
        self.state.is_hydrated
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    fn filtered(&self, status: TaskStatus) -> Vec<Task> {
        self.state
            .tasks
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect()
    }

    fn dispatch(&mut self, action: TaskAction) {
        let was_hydrated = self.state.is_hydrated;
        let changed = reduce(&mut self.state, action, Utc::now());
        if changed && was_hydrated {
            self.schedule_save();
        }
    }

    fn schedule_save(&self) {
        let storage = Arc::clone(&self.storage);
        let snapshot = self.state.tasks.clone();
        tokio::spawn(async move {
            storage.save(&snapshot).await;
        });
    }
}
