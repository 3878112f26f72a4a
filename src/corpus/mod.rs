//! Corpus module for loading validated datasets
//!
//! This module handles:
//! - Checking the dataset directory against the naming contract
//! - Enforcing id contiguity and non-empty records before anything is read
//! - Building the id → record mapping used by the annotation phase

mod manager;

pub use manager::{validate_dataset, CorpusManager};

use crate::storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a dataset
///
/// None of these ever come with a partially loaded dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Dataset path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Dataset directory contains no article files: {0}")]
    EmptyDirectory(PathBuf),

    #[error("Inconsistent dataset at {path}: {reason}")]
    InconsistentDataset { path: PathBuf, reason: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Output directory {output} would remove the input files under {input}")]
    OutputOverlapsInput { input: PathBuf, output: PathBuf },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
