//! Article page extraction
//!
//! Turns one fetched article page into an `ArticleRecord`:
//! - body: every `<p>` block, space-joined
//! - title: the first `<h2>`
//! - date: `div.mndata` in `dd.mm.yyyy` form, else the extraction time
//! - author: bold text of right-aligned signature paragraphs, else a sentinel

use crate::crawler::Fetcher;
use crate::storage::{ArticleRecord, AUTHOR_NOT_FOUND};
use crate::TransportError;
use chrono::{Local, NaiveDate, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Date format used by the `div.mndata` element
pub const PAGE_DATE_FORMAT: &str = "%d.%m.%Y";

/// Errors produced while extracting a single article
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Fetch(#[from] TransportError),

    #[error("Extracted record is not usable: {0}")]
    Malformed(String),
}

/// Fetches article pages and extracts their fields
pub struct ArticleExtractor<'a> {
    fetcher: &'a Fetcher,
}

impl<'a> ArticleExtractor<'a> {
    pub fn new(fetcher: &'a Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetches `url` and extracts the article stored under `id`
    ///
    /// A transport failure or non-2xx status yields an error; the caller
    /// decides whether that aborts the run.
    pub async fn extract(&self, url: &str, id: u32) -> Result<ArticleRecord, ExtractionError> {
        let page = self.fetcher.fetch_success(url).await?;
        Ok(parse_article(&page.body, url, id))
    }
}

/// Extracts an article from already fetched markup
pub fn parse_article(html: &str, url: &str, id: u32) -> ArticleRecord {
    let document = Html::parse_document(html);
    let mut article = ArticleRecord::new(id, url);

    article.body = extract_body(&document);
    article.title = extract_title(&document);
    article.published_at = extract_date(&document, url);
    article.author = extract_authors(&document);

    article
}

/// Parses a `dd.mm.yyyy` page date into midnight of that day
pub fn unify_date_format(date: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(date.trim(), PAGE_DATE_FORMAT)
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Joins the text of every paragraph in the document
fn extract_body(document: &Html) -> String {
    let Ok(p_selector) = Selector::parse("p") else {
        return String::new();
    };

    document
        .select(&p_selector)
        .map(element_text)
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_title(document: &Html) -> String {
    Selector::parse("h2")
        .ok()
        .and_then(|selector| document.select(&selector).next().map(element_text))
        .map(|title| title.trim().to_string())
        .unwrap_or_default()
}

fn extract_date(document: &Html, url: &str) -> NaiveDateTime {
    let raw = Selector::parse("div.mndata")
        .ok()
        .and_then(|selector| document.select(&selector).next().map(element_text));

    match raw {
        Some(raw) => unify_date_format(&raw).unwrap_or_else(|| {
            tracing::warn!("Unparseable date '{}' on {}, using current time", raw.trim(), url);
            Local::now().naive_local()
        }),
        None => Local::now().naive_local(),
    }
}

/// Collects the bold text of every right-aligned signature paragraph
fn extract_authors(document: &Html) -> Vec<String> {
    let mut authors = Vec::new();

    if let (Ok(signature_selector), Ok(strong_selector)) = (
        Selector::parse(r#"p[align="right"]"#),
        Selector::parse("strong"),
    ) {
        for signature in document.select(&signature_selector) {
            if let Some(strong) = signature.select(&strong_selector).next() {
                authors.push(element_text(strong).trim().to_string());
            }
        }
    }

    if authors.is_empty() {
        authors.push(AUTHOR_NOT_FOUND.to_string());
    }

    authors
}
