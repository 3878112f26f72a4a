use corpus_harvest::config::{validate_value, Config, ValidationLimits};
use corpus_harvest::Fetcher;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// User agent sent by every test configuration
pub const TEST_USER_AGENT: &str = "TestHarvester/1.0";

/// Creates a UTF-8 test configuration for the given seeds and quota
pub fn create_test_config(seeds: &[String], quota: u32) -> Config {
    create_test_config_with_encoding(seeds, quota, "utf-8")
}

/// Creates a test configuration that decodes pages with `encoding`
pub fn create_test_config_with_encoding(seeds: &[String], quota: u32, encoding: &str) -> Config {
    validate_value(
        &json!({
            "seed_urls": seeds,
            "total_articles_to_find_and_parse": quota,
            "headers": {"User-Agent": TEST_USER_AGENT},
            "encoding": encoding,
            "timeout": 5,
            "should_verify_certificate": true,
            "headless_mode": false
        }),
        &ValidationLimits::default(),
    )
    .expect("test config should validate")
}

/// Fetcher with a politeness delay short enough for tests
pub fn test_fetcher(config: &Config) -> Fetcher {
    Fetcher::new(config)
        .expect("Failed to build fetcher")
        .with_delay(Duration::from_millis(1))
}

/// Seed page linking to each of `hrefs`, plus one unrelated link
pub fn seed_page(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a href="{}">Article</a></li>"#, href))
        .collect();
    format!(
        r#"<html><body><a href="/about.html">About</a><ul>{}</ul></body></html>"#,
        links
    )
}

/// Article page with every field present
pub fn article_page(title: &str, date: &str, body: &str, author: &str) -> String {
    format!(
        r#"<html><body>
            <h2>{}</h2>
            <div class="mndata">{}</div>
            <p>{}</p>
            <p align="right"><strong>{}</strong></p>
        </body></html>"#,
        title, date, body, author
    )
}

/// Mounts a GET mock answering `route` with `status` and `body`
pub async fn mount_page(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}
