//! Reducer-driven task state container with durable key-value persistence.
//!
//! [`TaskStore`] owns the canonical in-memory task list, applies sanitized
//! mutations through a pure reducer, and detaches a best-effort save to a
//! [`TaskStorage`] adapter after every change. The adapter never fails:
//! storage errors are logged and downgraded, so in-memory state stays
//! authoritative for the life of the process.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::task_store::{TaskStore, TasksState};
pub use domain::storage::{KeyValueStorage, StorageError};
pub use domain::task::{Task, TaskDraft, TaskId, TaskStatus, TaskUpdate};
pub use infrastructure::file_store::{FileStorage, MemoryStorage};
pub use infrastructure::task_storage::{STORAGE_KEY, TaskStorage};
