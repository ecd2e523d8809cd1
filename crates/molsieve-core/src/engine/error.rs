use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;
use crate::core::filters::registry::RegistryError;
use crate::core::io::artifacts::ReconcileError;
use crate::core::io::batch::BatchError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Seed file not found: {0}")]
    MissingSeedFile(PathBuf),

    #[error("Batch file '{path}': {source}")]
    Batch { path: PathBuf, source: BatchError },

    #[error("Filter selection failed: {source}")]
    Registry {
        #[from]
        source: RegistryError,
    },

    #[error("Duplicate record identifier(s): {}", .0.join(", "))]
    DuplicateIdentifiers(Vec<String>),

    #[error("Conformer reconciliation failed: {source}")]
    Reconcile {
        #[from]
        source: ReconcileError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Could not create output directory '{path}': {source}")]
    OutputDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
}

impl EngineError {
    pub(crate) fn batch(path: impl Into<PathBuf>) -> impl FnOnce(BatchError) -> Self {
        let path = path.into();
        move |source| Self::Batch { path, source }
    }
}
