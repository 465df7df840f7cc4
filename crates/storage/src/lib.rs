#![forbid(unsafe_code)]

pub mod file_store;
pub mod kv;
pub mod mapping;
pub mod result_log;
pub mod weekly_log;

pub use file_store::JsonFileStore;
pub use kv::{InMemoryStore, KeyValueStore, StorageError, keys};
pub use result_log::ResultLog;
pub use weekly_log::WeeklyTestLog;
