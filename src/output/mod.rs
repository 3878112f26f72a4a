//! Output module for dataset reports
//!
//! This module handles:
//! - Summarising a loaded dataset
//! - Printing the summary for the `stats` command

pub mod stats;

pub use stats::{print_statistics, DatasetStatistics};
