use crate::config::types::{Config, ValidationLimits};
use crate::ConfigError;
use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::Url;

/// Shape of an acceptable seed URL: scheme, optional `www.`, dotted host
static SEED_URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://(www\.)?[\w.-]+\.\w+").expect("seed URL pattern"));

pub(crate) const SEED_URLS_KEY: &str = "seed_urls";
pub(crate) const TOTAL_ARTICLES_KEY: &str = "total_articles_to_find_and_parse";
pub(crate) const HEADERS_KEY: &str = "headers";
pub(crate) const ENCODING_KEY: &str = "encoding";
pub(crate) const TIMEOUT_KEY: &str = "timeout";
pub(crate) const VERIFY_KEY: &str = "should_verify_certificate";
pub(crate) const HEADLESS_KEY: &str = "headless_mode";

/// Validates a raw configuration tree and builds a `Config` from it
///
/// Fields are checked in a fixed order and the first failure is returned,
/// so the reported error always belongs to the earliest invalid field.
pub fn validate_value(raw: &Value, limits: &ValidationLimits) -> Result<Config, ConfigError> {
    let table = raw.as_object().ok_or_else(|| {
        ConfigError::Parse("configuration root must be a table of fields".to_string())
    })?;

    let seed_urls = validate_seed_urls(table.get(SEED_URLS_KEY))?;
    let article_quota = validate_article_count(table.get(TOTAL_ARTICLES_KEY), limits)?;
    let headers = validate_headers(table.get(HEADERS_KEY))?;
    let (encoding_label, encoding) = validate_encoding(table.get(ENCODING_KEY))?;
    let timeout_seconds = validate_timeout(table.get(TIMEOUT_KEY), limits)?;
    let verify_tls = validate_flag(table, VERIFY_KEY)?;
    let headless_mode = validate_flag(table, HEADLESS_KEY)?;

    Ok(Config {
        seed_urls,
        article_quota,
        headers,
        encoding_label,
        encoding,
        timeout_seconds,
        verify_tls,
        headless_mode,
    })
}

/// Validates the seed URL list
fn validate_seed_urls(value: Option<&Value>) -> Result<Vec<String>, ConfigError> {
    let items = value.and_then(Value::as_array).ok_or_else(|| {
        ConfigError::InvalidSeedUrl("seed_urls must be a list of strings".to_string())
    })?;

    if items.is_empty() {
        return Err(ConfigError::InvalidSeedUrl(
            "seed_urls must contain at least one URL".to_string(),
        ));
    }

    items
        .iter()
        .map(|item| {
            let url = item.as_str().ok_or_else(|| {
                ConfigError::InvalidSeedUrl(format!("seed URL must be a string, got {}", item))
            })?;
            if !SEED_URL_PATTERN.is_match(url) || Url::parse(url).is_err() {
                return Err(ConfigError::InvalidSeedUrl(format!(
                    "'{}' is not an absolute http(s) URL",
                    url
                )));
            }
            Ok(url.to_string())
        })
        .collect()
}

/// Validates the article quota against the configured maximum
fn validate_article_count(
    value: Option<&Value>,
    limits: &ValidationLimits,
) -> Result<u32, ConfigError> {
    let count = match value.and_then(Value::as_u64) {
        Some(count) if count > 0 => count,
        _ => {
            return Err(ConfigError::InvalidArticleCount(format!(
                "{} must be a positive integer, got {}",
                TOTAL_ARTICLES_KEY,
                describe(value)
            )))
        }
    };

    if count > u64::from(limits.max_articles) {
        return Err(ConfigError::ArticleCountOutOfRange {
            value: count,
            max: limits.max_articles,
        });
    }

    // count <= max_articles, which is a u32
    Ok(count as u32)
}

/// Validates the header map, including header name and value syntax
fn validate_headers(value: Option<&Value>) -> Result<BTreeMap<String, String>, ConfigError> {
    let map: &Map<String, Value> = value.and_then(Value::as_object).ok_or_else(|| {
        ConfigError::InvalidHeaders(format!(
            "headers must be a mapping, got {}",
            describe(value)
        ))
    })?;

    let mut headers = BTreeMap::new();
    for (name, value) in map {
        let value = value.as_str().ok_or_else(|| {
            ConfigError::InvalidHeaders(format!("value of header '{}' must be a string", name))
        })?;
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeaders(format!("'{}' is not a header name", name)))?;
        HeaderValue::from_str(value).map_err(|_| {
            ConfigError::InvalidHeaders(format!("value of header '{}' is not valid", name))
        })?;
        headers.insert(name.clone(), value.to_string());
    }

    Ok(headers)
}

/// Validates the encoding label and resolves it
fn validate_encoding(
    value: Option<&Value>,
) -> Result<(String, &'static Encoding), ConfigError> {
    let label = value.and_then(Value::as_str).ok_or_else(|| {
        ConfigError::InvalidEncoding(format!(
            "encoding must be a string, got {}",
            describe(value)
        ))
    })?;

    if label.trim().is_empty() {
        return Err(ConfigError::InvalidEncoding(
            "encoding cannot be empty".to_string(),
        ));
    }

    // Codec-style names (`utf_8`, `latin-1`) are retried without their separators
    let trimmed = label.trim();
    let candidates = [
        trimmed.to_string(),
        trimmed.replace('_', "-"),
        trimmed.replace(['_', '-'], ""),
    ];
    let encoding = candidates
        .iter()
        .find_map(|candidate| Encoding::for_label(candidate.as_bytes()))
        .ok_or_else(|| {
            ConfigError::InvalidEncoding(format!("'{}' is not a known text encoding", label))
        })?;

    Ok((label.to_string(), encoding))
}

/// Validates the timeout against the configured bounds
fn validate_timeout(value: Option<&Value>, limits: &ValidationLimits) -> Result<u64, ConfigError> {
    match value.and_then(Value::as_i64) {
        Some(timeout)
            if timeout >= limits.timeout_lower as i64 && timeout <= limits.timeout_upper as i64 =>
        {
            Ok(timeout as u64)
        }
        _ => Err(ConfigError::InvalidTimeout(format!(
            "timeout must be an integer between {} and {}, got {}",
            limits.timeout_lower,
            limits.timeout_upper,
            describe(value)
        ))),
    }
}

fn validate_flag(table: &Map<String, Value>, field: &'static str) -> Result<bool, ConfigError> {
    table
        .get(field)
        .and_then(Value::as_bool)
        .ok_or(ConfigError::InvalidFlag { field })
}

/// Renders a raw value for error messages
fn describe(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "nothing (field missing)".to_string(),
    }
}
