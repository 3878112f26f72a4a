//! Crawler module for the acquisition phase
//!
//! This module contains the acquisition logic, including:
//! - HTTP fetching with configured headers, timeout and encoding
//! - Article link discovery on seed pages
//! - Per-article field extraction
//! - Overall acquisition coordination

mod coordinator;
mod extractor;
mod fetcher;
mod parser;

pub use coordinator::{
    pad_to_quota, run_acquisition, AcquisitionReport, Crawler, FailurePolicy,
};
pub use extractor::{
    parse_article, unify_date_format, ArticleExtractor, ExtractionError, PAGE_DATE_FORMAT,
};
pub use fetcher::{build_http_client, FetchedPage, Fetcher, POLITENESS_DELAY};
pub use parser::{extract_article_links, is_article_link, ARTICLE_LINK_PATTERN};

use crate::config::Config;
use crate::storage::FileStore;
use crate::HarvestError;
use std::path::Path;

/// Runs a complete acquisition into a fresh directory
///
/// This is the main entry point for building a dataset. It will:
/// 1. Wipe and recreate `output_dir`
/// 2. Build the HTTP fetcher
/// 3. Collect article links from the seed pages
/// 4. Extract and store each article under ids `1..=N`
///
/// # Arguments
///
/// * `config` - The validated run configuration
/// * `output_dir` - Dataset directory
/// * `policy` - What to do when an article fails
pub async fn acquire(
    config: &Config,
    output_dir: &Path,
    policy: FailurePolicy,
) -> Result<AcquisitionReport, HarvestError> {
    let store = FileStore::prepare(output_dir)?;
    let fetcher = Fetcher::new(config)?;
    run_acquisition(config, &fetcher, &store, policy).await
}
