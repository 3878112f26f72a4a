//! Crawler coordinator - acquisition orchestration logic
//!
//! This module contains the sequential acquisition loop:
//! - Walking the seed pages and collecting article links up to the quota
//! - Padding a short link list to the quota
//! - Extracting every article and writing it to the dataset store
//! - Applying the failure policy when an article cannot be extracted

use crate::config::Config;
use crate::crawler::extractor::{ArticleExtractor, ExtractionError};
use crate::crawler::parser::{extract_article_links, ARTICLE_LINK_PATTERN};
use crate::crawler::Fetcher;
use crate::storage::{ArticleRecord, DatasetStore};
use crate::HarvestError;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Collects article URLs from the configured seed pages
pub struct Crawler<'a> {
    config: &'a Config,
    fetcher: &'a Fetcher,
    link_pattern: Regex,
    urls: Vec<String>,
}

impl<'a> Crawler<'a> {
    /// Creates a crawler matching the default `/news-<n>-<n>.html` links
    pub fn new(config: &'a Config, fetcher: &'a Fetcher) -> Self {
        Self {
            config,
            fetcher,
            link_pattern: (*ARTICLE_LINK_PATTERN).clone(),
            urls: Vec::new(),
        }
    }

    /// Replaces the article link pattern
    pub fn with_link_pattern(mut self, pattern: Regex) -> Self {
        self.link_pattern = pattern;
        self
    }

    /// Walks the seed pages and fills the URL list
    ///
    /// Seeds are visited in configured order. A seed that fails to load or
    /// answers with a non-2xx status is skipped. Traversal stops as soon as
    /// the quota is reached, even in the middle of a seed page. If the seeds
    /// run out first, the list is padded with its last URL (see
    /// `pad_to_quota`).
    pub async fn find_articles(&mut self) {
        let quota = self.config.article_quota() as usize;
        self.urls.clear();
        let mut seen = HashSet::new();

        for seed_url in self.config.seed_urls() {
            let page = match self.fetcher.fetch(seed_url).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Skipping seed {}: {}", seed_url, e);
                    continue;
                }
            };

            if !page.is_success() {
                tracing::warn!("Skipping seed {}: HTTP {}", seed_url, page.status);
                continue;
            }

            let base_url = match Url::parse(seed_url) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping seed {}: {}", seed_url, e);
                    continue;
                }
            };

            for link in extract_article_links(&page.body, &base_url, &self.link_pattern) {
                if seen.insert(link.clone()) {
                    tracing::debug!("Discovered article {}", link);
                    self.urls.push(link);
                }

                if self.urls.len() >= quota {
                    tracing::info!("Quota of {} articles reached at seed {}", quota, seed_url);
                    return;
                }
            }
        }

        let discovered = self.urls.len();
        if pad_to_quota(&mut self.urls, quota) {
            tracing::warn!(
                "Only {} distinct articles found for a quota of {}; repeating the last one",
                discovered,
                quota
            );
        }
    }

    /// Discovered article URLs, in discovery order
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn into_urls(self) -> Vec<String> {
        self.urls
    }

    /// Seed pages this crawler walks
    pub fn seed_urls(&self) -> &[String] {
        self.config.seed_urls()
    }
}

/// Pads `urls` with copies of its last element until it holds `quota` entries
///
/// An empty list stays empty. Returns true if anything was added.
pub fn pad_to_quota(urls: &mut Vec<String>, quota: usize) -> bool {
    let Some(last) = urls.last().cloned() else {
        return false;
    };

    if urls.len() >= quota {
        return false;
    }

    urls.resize(quota, last);
    true
}

/// What to do when one article cannot be extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the whole acquisition run
    #[default]
    Abort,

    /// Skip the article and give the next one its id, keeping ids contiguous
    SkipAndRenumber,
}

/// Outcome of an acquisition run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquisitionReport {
    /// URLs handed to the extractor, padding included
    pub discovered: usize,

    /// Records written to the store
    pub stored: usize,

    /// URLs skipped under `FailurePolicy::SkipAndRenumber`
    pub skipped: Vec<String>,
}

/// Runs a complete acquisition: crawl, extract, store
///
/// # Arguments
///
/// * `config` - The validated run configuration
/// * `fetcher` - Fetcher shared by crawling and extraction
/// * `store` - Destination dataset, expected to be empty
/// * `policy` - Failure policy for individual articles
///
/// # Returns
///
/// * `Ok(AcquisitionReport)` - Every kept article was written with ids `1..=stored`
/// * `Err(HarvestError)` - An article failed under `Abort`, or a write failed
pub async fn run_acquisition(
    config: &Config,
    fetcher: &Fetcher,
    store: &dyn DatasetStore,
    policy: FailurePolicy,
) -> Result<AcquisitionReport, HarvestError> {
    let mut crawler = Crawler::new(config, fetcher);
    crawler.find_articles().await;

    let quota = config.article_quota() as usize;
    let urls = crawler.into_urls();
    let mut report = AcquisitionReport {
        discovered: urls.len(),
        ..AcquisitionReport::default()
    };

    tracing::info!("Extracting {} articles", urls.len().min(quota));

    let extractor = ArticleExtractor::new(fetcher);
    let mut next_id: u32 = 1;

    for url in urls.iter().take(quota) {
        match extract_checked(&extractor, url, next_id).await {
            Ok(article) => {
                store.write_raw(&article)?;
                store.write_meta(&article)?;
                tracing::debug!("Stored article {} from {}", article.id, url);
                next_id += 1;
                report.stored += 1;
            }
            Err(source) => match policy {
                FailurePolicy::Abort => {
                    tracing::error!("Article {} from {} failed: {}", next_id, url, source);
                    return Err(HarvestError::Extraction {
                        id: next_id,
                        url: url.clone(),
                        source,
                    });
                }
                FailurePolicy::SkipAndRenumber => {
                    tracing::warn!("Skipping {}: {}", url, source);
                    report.skipped.push(url.clone());
                }
            },
        }
    }

    tracing::info!(
        "Acquisition finished: {} stored, {} skipped",
        report.stored,
        report.skipped.len()
    );

    Ok(report)
}

async fn extract_checked(
    extractor: &ArticleExtractor<'_>,
    url: &str,
    id: u32,
) -> Result<ArticleRecord, ExtractionError> {
    let article = extractor.extract(url, id).await?;
    article
        .check_well_formed()
        .map_err(ExtractionError::Malformed)?;
    Ok(article)
}
