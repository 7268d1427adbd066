pub mod storage;
pub mod task;
