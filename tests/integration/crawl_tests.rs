//! Integration tests for the crawler and acquisition phase
//!
//! These tests use wiremock to create mock HTTP servers and run the
//! crawl, extract, store cycle end-to-end.

use crate::common::{
    article_page, create_test_config, create_test_config_with_encoding, mount_page, seed_page,
    test_fetcher, TEST_USER_AGENT,
};
use corpus_harvest::crawler::{run_acquisition, ExtractionError, FailurePolicy};
use corpus_harvest::storage::{naming, DatasetStore, AUTHOR_NOT_FOUND};
use corpus_harvest::{ArticleExtractor, Crawler, FileStore, HarvestError, TransportError};
use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_shortfall_is_padded_with_last_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        200,
        seed_page(&["/news-1-1.html", "/news-2-2.html"]),
    )
    .await;

    let config = create_test_config(&[format!("{}/", base_url)], 3);
    let fetcher = test_fetcher(&config);

    let mut crawler = Crawler::new(&config, &fetcher);
    crawler.find_articles().await;

    let second = format!("{}/news-2-2.html", base_url);
    assert_eq!(
        crawler.urls(),
        &[format!("{}/news-1-1.html", base_url), second.clone(), second]
    );
}

#[tokio::test]
async fn test_traversal_stops_at_quota() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/first",
        200,
        seed_page(&["/news-1-1.html", "/news-2-1.html", "/news-3-1.html"]),
    )
    .await;

    // The second seed must never be requested
    Mock::given(method("GET"))
        .and(path("/second"))
        .respond_with(ResponseTemplate::new(200).set_body_string(seed_page(&["/news-9-9.html"])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(
        &[format!("{}/first", base_url), format!("{}/second", base_url)],
        2,
    );
    let fetcher = test_fetcher(&config);

    let mut crawler = Crawler::new(&config, &fetcher);
    crawler.find_articles().await;

    assert_eq!(
        crawler.urls(),
        &[
            format!("{}/news-1-1.html", base_url),
            format!("{}/news-2-1.html", base_url)
        ]
    );
}

#[tokio::test]
async fn test_failing_seed_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/broken", 500, "error".to_string()).await;
    mount_page(&mock_server, "/working", 200, seed_page(&["/news-5-5.html"])).await;

    let config = create_test_config(
        &[
            format!("{}/broken", base_url),
            "http://127.0.0.1:9/unreachable".to_string(),
            format!("{}/working", base_url),
        ],
        1,
    );
    let fetcher = test_fetcher(&config);

    let mut crawler = Crawler::new(&config, &fetcher);
    crawler.find_articles().await;

    assert_eq!(crawler.urls(), &[format!("{}/news-5-5.html", base_url)]);
}

#[tokio::test]
async fn test_duplicate_links_across_seeds() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/a",
        200,
        seed_page(&["/news-1-1.html", "/news-1-1.html"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        200,
        seed_page(&["/news-1-1.html", "/news-2-1.html"]),
    )
    .await;

    let config = create_test_config(
        &[format!("{}/a", base_url), format!("{}/b", base_url)],
        2,
    );
    let fetcher = test_fetcher(&config);

    let mut crawler = Crawler::new(&config, &fetcher);
    crawler.find_articles().await;

    assert_eq!(
        crawler.urls(),
        &[
            format!("{}/news-1-1.html", base_url),
            format!("{}/news-2-1.html", base_url)
        ]
    );
}

#[tokio::test]
async fn test_no_links_found() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 200, seed_page(&[])).await;

    let config = create_test_config(&[format!("{}/", mock_server.uri())], 5);
    let fetcher = test_fetcher(&config);

    let mut crawler = Crawler::new(&config, &fetcher);
    crawler.find_articles().await;

    assert!(crawler.urls().is_empty());
}

#[tokio::test]
async fn test_extractor_reads_every_field() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/news-1-1.html",
        200,
        article_page("Headline", "05.04.2023", "Article body.", "Anna Ivanova"),
    )
    .await;

    let url = format!("{}/news-1-1.html", mock_server.uri());
    let config = create_test_config(&[format!("{}/", mock_server.uri())], 1);
    let fetcher = test_fetcher(&config);

    let article = ArticleExtractor::new(&fetcher).extract(&url, 4).await.unwrap();

    assert_eq!(article.id, 4);
    assert_eq!(article.url, url);
    assert_eq!(article.title, "Headline");
    assert_eq!(article.author, vec!["Anna Ivanova".to_string()]);
    assert_eq!(
        article.published_at.date(),
        NaiveDate::from_ymd_opt(2023, 4, 5).unwrap()
    );
    assert!(article.body.starts_with("Article body."));
}

#[tokio::test]
async fn test_extractor_fallbacks() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/news-1-1.html",
        200,
        "<html><body><p>Only a paragraph.</p></body></html>".to_string(),
    )
    .await;

    let url = format!("{}/news-1-1.html", mock_server.uri());
    let config = create_test_config(&[format!("{}/", mock_server.uri())], 1);
    let fetcher = test_fetcher(&config);

    let article = ArticleExtractor::new(&fetcher).extract(&url, 1).await.unwrap();

    assert_eq!(article.title, "");
    assert_eq!(article.body, "Only a paragraph.");
    assert_eq!(article.author, vec![AUTHOR_NOT_FOUND.to_string()]);
}

#[tokio::test]
async fn test_extractor_reports_http_status() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/news-1-1.html", 404, "missing".to_string()).await;

    let url = format!("{}/news-1-1.html", mock_server.uri());
    let config = create_test_config(&[format!("{}/", mock_server.uri())], 1);
    let fetcher = test_fetcher(&config);

    let result = ArticleExtractor::new(&fetcher).extract(&url, 1).await;
    assert!(matches!(
        result,
        Err(ExtractionError::Fetch(TransportError::Status { status: 404, .. }))
    ));
}

#[tokio::test]
async fn test_acquisition_writes_contiguous_dataset() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        200,
        seed_page(&["/news-1-1.html", "/news-2-2.html"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/news-1-1.html",
        200,
        article_page("First", "01.02.2023", "First body.", "Anna"),
    )
    .await;
    mount_page(
        &mock_server,
        "/news-2-2.html",
        200,
        article_page("Second", "02.02.2023", "Second body.", "Ivan"),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let store = FileStore::prepare(dir.path().join("articles")).unwrap();
    let config = create_test_config(&[format!("{}/", base_url)], 3);
    let fetcher = test_fetcher(&config);

    let report = run_acquisition(&config, &fetcher, &store, FailurePolicy::Abort)
        .await
        .unwrap();

    assert_eq!(report.discovered, 3);
    assert_eq!(report.stored, 3);
    assert!(report.skipped.is_empty());

    for id in 1..=3 {
        assert!(store.root().join(naming::raw(id)).is_file());
        assert!(store.root().join(naming::meta(id)).is_file());
    }

    // The padded third record repeats the last discovered article
    assert_eq!(store.read_raw(3).unwrap(), store.read_raw(2).unwrap());
    let meta = store.read_meta(3).unwrap().unwrap();
    assert_eq!(meta.id, 3);
    assert_eq!(meta.url, format!("{}/news-2-2.html", base_url));
    assert_eq!(meta.title, "Second");
    assert_eq!(meta.date, "2023-02-02 00:00:00");
}

#[tokio::test]
async fn test_acquisition_aborts_on_failed_article() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        200,
        seed_page(&["/news-1-1.html", "/news-2-1.html", "/news-3-1.html"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/news-1-1.html",
        200,
        article_page("First", "01.02.2023", "First body.", "Anna"),
    )
    .await;
    mount_page(&mock_server, "/news-2-1.html", 404, "gone".to_string()).await;

    // Nothing after the failure is fetched
    Mock::given(method("GET"))
        .and(path("/news-3-1.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let config = create_test_config(&[format!("{}/", base_url)], 3);
    let fetcher = test_fetcher(&config);

    let result = run_acquisition(&config, &fetcher, &store, FailurePolicy::Abort).await;

    match result {
        Err(HarvestError::Extraction { id, url, .. }) => {
            assert_eq!(id, 2);
            assert_eq!(url, format!("{}/news-2-1.html", base_url));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(dir.path().join(naming::raw(1)).is_file());
    assert!(!dir.path().join(naming::raw(2)).exists());
}

#[tokio::test]
async fn test_acquisition_skips_and_renumbers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        200,
        seed_page(&["/news-1-1.html", "/news-2-1.html", "/news-3-1.html"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/news-1-1.html",
        200,
        article_page("First", "01.02.2023", "First body.", "Anna"),
    )
    .await;
    // Empty body counts as a failed extraction
    mount_page(
        &mock_server,
        "/news-2-1.html",
        200,
        "<html><body><h2>No text</h2></body></html>".to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/news-3-1.html",
        200,
        article_page("Third", "03.02.2023", "Third body.", "Pyotr"),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    let config = create_test_config(&[format!("{}/", base_url)], 3);
    let fetcher = test_fetcher(&config);

    let report = run_acquisition(&config, &fetcher, &store, FailurePolicy::SkipAndRenumber)
        .await
        .unwrap();

    assert_eq!(report.stored, 2);
    assert_eq!(report.skipped, vec![format!("{}/news-2-1.html", base_url)]);

    let second = store.read_meta(2).unwrap().unwrap();
    assert_eq!(second.title, "Third");
    assert!(!dir.path().join(naming::raw(3)).exists());
    assert!(fs::read_to_string(dir.path().join(naming::raw(2)))
        .unwrap()
        .starts_with("Third body."));
}

#[tokio::test]
async fn test_configured_encoding_overrides_declared_charset() {
    let mock_server = MockServer::start().await;
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode("<p>Привет, мир!</p>");

    Mock::given(method("GET"))
        .and(path("/news-1-1.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(bytes.into_owned(), "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config_with_encoding(
        &[format!("{}/", mock_server.uri())],
        1,
        "windows-1251",
    );
    let fetcher = test_fetcher(&config);

    let page = fetcher
        .fetch(&format!("{}/news-1-1.html", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(page.body, "<p>Привет, мир!</p>");
}

#[tokio::test]
async fn test_configured_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("User-Agent", TEST_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(seed_page(&[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&[format!("{}/", mock_server.uri())], 1);
    let fetcher = test_fetcher(&config);

    let page = fetcher
        .fetch(&format!("{}/", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(page.status, 200);
}
