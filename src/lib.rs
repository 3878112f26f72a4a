//! Corpus-Harvest: a small, reproducible news corpus builder
//!
//! This crate crawls a configured set of seed pages for article links, extracts
//! normalized article records, persists them as a contiguous on-disk dataset,
//! and feeds the validated dataset to a pluggable linguistic analyzer.

pub mod config;
pub mod corpus;
pub mod crawler;
pub mod output;
pub mod pipeline;
pub mod storage;

use thiserror::Error;

/// Main error type for Corpus-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to extract article {id} from {url}: {source}")]
    Extraction {
        id: u32,
        url: String,
        source: crawler::ExtractionError,
    },

    #[error("Dataset error: {0}")]
    Dataset(#[from] corpus::DatasetError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Analyzer error: {0}")]
    Analyzer(#[from] pipeline::AnalyzerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// Every validation failure names the offending field so the run can be
/// fixed without guessing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid seed URL: {0}")]
    InvalidSeedUrl(String),

    #[error("Invalid number of articles: {0}")]
    InvalidArticleCount(String),

    #[error("Number of articles {value} is out of range (maximum {max})")]
    ArticleCountOutOfRange { value: u64, max: u32 },

    #[error("Invalid headers: {0}")]
    InvalidHeaders(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("Invalid flag '{field}': expected a boolean")]
    InvalidFlag { field: &'static str },
}

/// Errors from a single network fetch
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {cause}")]
    Network { url: String, cause: String },

    #[error("Failed to read response body from {url}: {cause}")]
    Body { url: String, cause: String },
}

/// Result type alias for Corpus-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use corpus::CorpusManager;
pub use crawler::{ArticleExtractor, Crawler, Fetcher};
pub use pipeline::{AnnotatedText, AnnotationPipeline, Analyzer};
pub use storage::{ArticleRecord, DatasetStore, FileStore};
