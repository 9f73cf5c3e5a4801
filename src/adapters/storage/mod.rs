//! Storage adapters - file persistence for shared resources.

mod local_file_storage;

pub use local_file_storage::{LocalFileStorage, MAX_FILE_SIZE_BYTES};
