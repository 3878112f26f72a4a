//! Storage traits and error types
//!
//! This module defines the trait interface for dataset backends and
//! associated error types.

use crate::storage::{ArticleMeta, ArticleRecord};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error at {path}: {message}")]
    Serialization { path: PathBuf, message: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for dataset backend implementations
///
/// Every artifact is keyed by article id through the naming contract in
/// `storage::naming`; callers never build file names themselves.
pub trait DatasetStore {
    /// Directory holding the dataset
    fn root(&self) -> &Path;

    // ===== Acquisition =====

    /// Writes the article body to `{id}_raw.txt`
    fn write_raw(&self, article: &ArticleRecord) -> StorageResult<()>;

    /// Writes title, url, author and date to `{id}_meta.json`
    fn write_meta(&self, article: &ArticleRecord) -> StorageResult<()>;

    // ===== Annotation =====

    /// Writes the normalized body to `{id}_cleaned.txt`
    fn write_cleaned(&self, article: &ArticleRecord) -> StorageResult<()>;

    /// Writes an annotation for one article, terminated by a newline
    fn write_annotation(&self, id: u32, annotation: &str) -> StorageResult<()>;

    /// Writes the annotation of a merged corpus, terminated by a newline
    fn write_merged_annotation(&self, annotation: &str) -> StorageResult<()>;

    // ===== Loading =====

    /// Reads the raw body of article `id`
    fn read_raw(&self, id: u32) -> StorageResult<String>;

    /// Reads the metadata of article `id`, if it was stored
    fn read_meta(&self, id: u32) -> StorageResult<Option<ArticleMeta>>;
}
