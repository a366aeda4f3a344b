//! Storage Adapters
//!
//! Implementations of the RecordStore port.
//!
//! ## Available Adapters
//!
//! - **FileRecordStore** - One YAML file per document on disk
//! - **InMemoryRecordStore** - Documents in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileRecordStore, InMemoryRecordStore};
//!
//! let store = FileRecordStore::new("./data/records");
//! let store = InMemoryRecordStore::new();
//! ```

mod file_record_store;
mod in_memory_record_store;

pub use file_record_store::FileRecordStore;
pub use in_memory_record_store::InMemoryRecordStore;
