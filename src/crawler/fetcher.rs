//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building one HTTP client from the run configuration
//! - Decoding response bodies with the configured encoding
//! - A fixed politeness delay after every request
//! - Error classification into `TransportError`

use crate::config::Config;
use crate::TransportError;
use encoding_rs::Encoding;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;

/// Pause taken after every request, whatever its outcome
pub const POLITENESS_DELAY: Duration = Duration::from_secs(1);

/// A fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Body decoded with the configured encoding
    pub body: String,
}

impl FetchedPage {
    /// Returns true for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Builds an HTTP client with the configured headers, timeout and TLS policy
///
/// # Arguments
///
/// * `config` - The validated run configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(TransportError)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, TransportError> {
    let mut headers = HeaderMap::new();
    for (name, value) in config.headers() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::Client(format!("header '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::Client(format!("header '{}': {}", name, e)))?;
        headers.insert(name, value);
    }

    let mut builder = Client::builder()
        .default_headers(headers)
        .danger_accept_invalid_certs(!config.verify_tls())
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| TransportError::Client(e.to_string()))
}

/// Sequential HTTP fetcher shared by the crawler and the article extractor
pub struct Fetcher {
    client: Client,
    encoding: &'static Encoding,
    delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher for the given configuration
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        if config.headless_mode() {
            tracing::warn!("headless_mode is set but only plain HTTP fetching is available");
        }

        Ok(Self {
            client: build_http_client(config)?,
            encoding: config.encoding(),
            delay: POLITENESS_DELAY,
        })
    }

    /// Replaces the politeness delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Fetches a URL once
    ///
    /// Any HTTP status is returned as a page; only transport failures are
    /// errors. The politeness delay is always taken before returning. No
    /// retries are attempted.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, TransportError> {
        tracing::debug!("Fetching {}", url);
        let result = self.send(url).await;
        tokio::time::sleep(self.delay).await;
        result
    }

    /// Fetches a URL and treats any non-2xx status as an error
    pub async fn fetch_success(&self, url: &str) -> Result<FetchedPage, TransportError> {
        let page = self.fetch(url).await?;
        if !page.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: page.status,
            });
        }
        Ok(page)
    }

    async fn send(&self, url: &str) -> Result<FetchedPage, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        let bytes = response.bytes().await.map_err(|e| TransportError::Body {
            url: url.to_string(),
            cause: e.to_string(),
        })?;

        // The configured encoding wins over any charset the server declares
        let (body, _) = self.encoding.decode_without_bom_handling(&bytes);

        Ok(FetchedPage {
            url: final_url,
            status,
            body: body.into_owned(),
        })
    }
}

/// Maps a reqwest failure onto a transport error
fn classify_error(url: &str, e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        TransportError::Network {
            url: url.to_string(),
            cause: "Connection refused".to_string(),
        }
    } else {
        TransportError::Network {
            url: url.to_string(),
            cause: e.to_string(),
        }
    }
}
