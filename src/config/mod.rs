//! Configuration module for Corpus-Harvest
//!
//! This module handles loading, parsing, and validating the run configuration.
//! Both JSON and TOML files are accepted; they are read into a dynamic value
//! tree first so that every field can be type-checked individually and the
//! failure reported against the field that caused it.
//!
//! # Example
//!
//! ```no_run
//! use corpus_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper_config.json")).unwrap();
//! println!("Will collect {} articles", config.article_quota());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ValidationLimits, NUM_ARTICLES_UPPER_LIMIT, TIMEOUT_LOWER_LIMIT, TIMEOUT_UPPER_LIMIT,
};

// Re-export parser and validation functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_config_with_limits,
    parse_config_str, ConfigFormat,
};
pub use validation::validate_value;
