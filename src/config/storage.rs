//! Record storage configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::storage::{FileRecordStore, InMemoryRecordStore};
use crate::application::WriteMode;
use crate::ports::RecordStore;

use super::error::ValidationError;

/// Where documents are kept
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

/// Record storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory of the file backend
    #[serde(default = "default_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub write_mode: WriteMode,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("storage.path"));
        }
        Ok(())
    }

    /// Builds the configured store.
    pub fn build_store(&self) -> Arc<dyn RecordStore> {
        match self.backend {
            StorageBackend::Memory => Arc::new(InMemoryRecordStore::new()),
            StorageBackend::File => Arc::new(FileRecordStore::new(&self.path)),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_path(),
            write_mode: WriteMode::default(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("./data/records")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_memory_with_independent_writes() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.write_mode, WriteMode::Independent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_backend_needs_a_path() {
        let config = StorageConfig {
            backend: StorageBackend::File,
            path: PathBuf::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("storage.path"))
        ));
    }
}
