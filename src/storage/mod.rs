//! Storage module for persisting article datasets
//!
//! This module owns the on-disk layout of a dataset:
//! - The article record model shared by every phase
//! - The per-id file naming contract (`{id}_raw.txt`, `{id}_meta.json`, ...)
//! - A filesystem-backed `DatasetStore` implementation
//! - The "cleaned text" normalization written during annotation

mod files;
mod traits;

pub use files::FileStore;
pub use traits::{DatasetStore, StorageError, StorageResult};

use crate::pipeline::AnnotatedText;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Author placeholder used when no signature block was found
pub const AUTHOR_NOT_FOUND: &str = "NOT FOUND";

/// Date format used in metadata files
pub const META_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// File naming contract for a dataset directory
pub mod naming {
    /// Suffix shared by all raw text files
    pub const RAW_SUFFIX: &str = "_raw.txt";

    /// Suffix shared by all metadata files
    pub const META_SUFFIX: &str = "_meta.json";

    /// Suffix shared by all cleaned text files
    pub const CLEANED_SUFFIX: &str = "_cleaned.txt";

    /// Suffix shared by all per-article annotation files
    pub const CONLLU_SUFFIX: &str = "_conllu.conllu";

    /// Annotation artifact written when a merged corpus is annotated as one document
    pub const MERGED_ANNOTATION: &str = "auto_annotated.conllu";

    /// Merged corpus text
    pub const MERGED_TEXT: &str = "corpus.txt";

    pub fn raw(id: u32) -> String {
        format!("{}{}", id, RAW_SUFFIX)
    }

    pub fn meta(id: u32) -> String {
        format!("{}{}", id, META_SUFFIX)
    }

    pub fn cleaned(id: u32) -> String {
        format!("{}{}", id, CLEANED_SUFFIX)
    }

    pub fn conllu(id: u32) -> String {
        format!("{}{}", id, CONLLU_SUFFIX)
    }

    /// Extracts the numeric id from a file name carrying `suffix`
    ///
    /// Returns `None` when the name does not end with the suffix or the prefix
    /// is not a plain decimal number.
    pub fn parse_id(file_name: &str, suffix: &str) -> Option<u32> {
        let prefix = file_name.strip_suffix(suffix)?;
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        prefix.parse().ok()
    }
}

/// One acquired article
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    /// Position in the dataset, starting at 1
    pub id: u32,

    /// Source URL
    pub url: String,

    /// Headline, empty if none was found
    pub title: String,

    /// Space-joined paragraph texts
    pub body: String,

    /// Authors; holds `AUTHOR_NOT_FOUND` when none was extracted
    pub author: Vec<String>,

    /// Publication date, or acquisition time when the page had none
    pub published_at: NaiveDateTime,

    /// Annotation attached by the annotation pipeline
    pub annotation: Option<AnnotatedText>,
}

impl ArticleRecord {
    /// Creates an empty record for `url` with fallback metadata
    pub fn new(id: u32, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            title: String::new(),
            body: String::new(),
            author: vec![AUTHOR_NOT_FOUND.to_string()],
            published_at: Local::now().naive_local(),
            annotation: None,
        }
    }

    /// Checks that the record can be stored without breaking dataset invariants
    pub fn check_well_formed(&self) -> Result<(), String> {
        if self.id == 0 {
            return Err("article id must be positive".to_string());
        }
        if self.body.is_empty() {
            return Err(format!("article {} has no text", self.id));
        }
        if self.author.is_empty() {
            return Err(format!("article {} has an empty author list", self.id));
        }
        Ok(())
    }

    /// Builds the metadata view written next to the raw text
    pub fn to_meta(&self) -> ArticleMeta {
        ArticleMeta {
            id: self.id,
            url: self.url.clone(),
            title: self.title.clone(),
            date: self.published_at.format(META_DATE_FORMAT).to_string(),
            author: self.author.clone(),
        }
    }

    /// Copies metadata fields onto this record
    ///
    /// An unparseable date leaves `published_at` untouched.
    pub fn apply_meta(&mut self, meta: ArticleMeta) {
        self.url = meta.url;
        self.title = meta.title;
        if let Ok(date) = NaiveDateTime::parse_from_str(&meta.date, META_DATE_FORMAT) {
            self.published_at = date;
        }
        if !meta.author.is_empty() {
            self.author = meta.author;
        }
    }
}

/// Serialized form of `{id}_meta.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleMeta {
    pub id: u32,
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub author: Vec<String>,
}

/// Normalizes article text for the cleaned artifact
///
/// Lowercases, drops every character that is neither alphanumeric nor
/// whitespace, and collapses whitespace runs into single spaces.
pub fn clean_text(text: &str) -> String {
    let filtered: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}
