pub mod file_store;
pub mod task_storage;
#[cfg(test)]
mod task_storage_tests;
