mod file_storage;

pub use file_storage::{PaperStorage, Result, StorageError};
