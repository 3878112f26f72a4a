use encoding_rs::Encoding;
use std::collections::BTreeMap;
use std::time::Duration;

/// Default upper bound for `total_articles_to_find_and_parse`
pub const NUM_ARTICLES_UPPER_LIMIT: u32 = 150;

/// Default lower bound (inclusive) for `timeout`, in seconds
pub const TIMEOUT_LOWER_LIMIT: u64 = 0;

/// Default upper bound (inclusive) for `timeout`, in seconds
pub const TIMEOUT_UPPER_LIMIT: u64 = 60;

/// Validated run configuration
///
/// The only way to obtain a `Config` is through validation, so holding one
/// means every field has already passed its checks.
#[derive(Debug, Clone)]
pub struct Config {
    pub(super) seed_urls: Vec<String>,
    pub(super) article_quota: u32,
    pub(super) headers: BTreeMap<String, String>,
    pub(super) encoding_label: String,
    pub(super) encoding: &'static Encoding,
    pub(super) timeout_seconds: u64,
    pub(super) verify_tls: bool,
    pub(super) headless_mode: bool,
}

impl Config {
    /// Seed pages to scan for article links, in crawl order
    pub fn seed_urls(&self) -> &[String] {
        &self.seed_urls
    }

    /// Number of articles to collect
    pub fn article_quota(&self) -> u32 {
        self.article_quota
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Encoding label exactly as configured
    pub fn encoding_label(&self) -> &str {
        &self.encoding_label
    }

    /// Encoding used to decode every response body
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    /// Per-request timeout; `None` when configured as zero
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// Reserved for browser-based fetching; the HTTP fetch path ignores it
    pub fn headless_mode(&self) -> bool {
        self.headless_mode
    }
}

/// Bounds applied while validating numeric fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Maximum accepted article quota
    pub max_articles: u32,

    /// Minimum accepted timeout, in seconds
    pub timeout_lower: u64,

    /// Maximum accepted timeout, in seconds
    pub timeout_upper: u64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_articles: NUM_ARTICLES_UPPER_LIMIT,
            timeout_lower: TIMEOUT_LOWER_LIMIT,
            timeout_upper: TIMEOUT_UPPER_LIMIT,
        }
    }
}
