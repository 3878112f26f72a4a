//! HTML link extraction for seed pages
//!
//! Seed pages are scanned for `<a href>` elements whose target looks like an
//! article, e.g. `/news-12345-678.html`. Matching links are resolved against
//! the seed URL.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Path shape of an article link
pub static ARTICLE_LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/news-\d+-\d+\.html").expect("article link pattern"));

/// Returns true if `href` contains the article path shape
pub fn is_article_link(href: &str) -> bool {
    ARTICLE_LINK_PATTERN.is_match(href)
}

/// Extracts article links from a seed page, in document order
///
/// Duplicates are kept; de-duplication is the crawler's job since it spans
/// several seed pages.
///
/// # Arguments
///
/// * `html` - The seed page markup
/// * `base_url` - The seed URL, used to resolve relative links
/// * `pattern` - Pattern an `href` must contain to count as an article
///
/// # Example
///
/// ```
/// use corpus_harvest::crawler::{extract_article_links, ARTICLE_LINK_PATTERN};
/// use url::Url;
///
/// let html = r#"<a href="/news-1-2.html">One</a><a href="/about.html">About</a>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let links = extract_article_links(html, &base, &ARTICLE_LINK_PATTERN);
/// assert_eq!(links, vec!["https://example.com/news-1-2.html".to_string()]);
/// ```
pub fn extract_article_links(html: &str, base_url: &Url, pattern: &Regex) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if !pattern.is_match(href) {
                continue;
            }

            if let Some(absolute_url) = resolve_link(href, base_url) {
                links.push(absolute_url);
            }
        }
    }

    links
}

/// Schemes that never lead to an article page
const SKIPPED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];

/// Turns an article href into an absolute HTTP(S) URL
///
/// Blank hrefs, non-navigational schemes and anything that does not resolve
/// to `http`/`https` yield `None`.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || SKIPPED_SCHEMES.iter().any(|scheme| href.starts_with(scheme)) {
        return None;
    }

    base_url
        .join(href)
        .ok()
        .filter(|resolved| matches!(resolved.scheme(), "http" | "https"))
        .map(String::from)
}
