//! Statistics generation from a loaded dataset
//!
//! This module provides functionality for summarising a validated dataset
//! and displaying the summary.

use crate::corpus::CorpusManager;
use crate::storage::{naming, AUTHOR_NOT_FOUND};
use chrono::NaiveDateTime;
use std::collections::BTreeSet;

/// Dataset statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetStatistics {
    /// Number of articles in the dataset
    pub total_articles: usize,

    /// Total body length in words
    pub total_words: usize,

    /// Shortest and longest body, in words
    pub min_words: usize,
    pub max_words: usize,

    /// Articles with a non-empty title
    pub with_title: usize,

    /// Articles whose author could not be extracted
    pub without_author: usize,

    /// Distinct author names, sentinel excluded
    pub distinct_authors: usize,

    /// Publication date range
    pub earliest: Option<NaiveDateTime>,
    pub latest: Option<NaiveDateTime>,

    /// Annotation-phase artifacts present on disk
    pub cleaned_files: usize,
    pub annotation_files: usize,
}

impl DatasetStatistics {
    /// Computes statistics for every record of `corpus`
    pub fn from_corpus(corpus: &CorpusManager) -> Self {
        let mut stats = DatasetStatistics {
            total_articles: corpus.len(),
            ..Default::default()
        };
        let mut authors = BTreeSet::new();

        for (position, (&id, article)) in corpus.articles().iter().enumerate() {
            let words = article.body.split_whitespace().count();
            stats.total_words += words;
            if position == 0 {
                stats.min_words = words;
                stats.max_words = words;
            } else {
                stats.min_words = stats.min_words.min(words);
                stats.max_words = stats.max_words.max(words);
            }

            if !article.title.is_empty() {
                stats.with_title += 1;
            }

            if article.author.iter().all(|a| a == AUTHOR_NOT_FOUND) {
                stats.without_author += 1;
            }
            authors.extend(
                article
                    .author
                    .iter()
                    .filter(|a| a.as_str() != AUTHOR_NOT_FOUND)
                    .cloned(),
            );

            let date = article.published_at;
            stats.earliest = Some(stats.earliest.map_or(date, |d| d.min(date)));
            stats.latest = Some(stats.latest.map_or(date, |d| d.max(date)));

            if corpus.path().join(naming::cleaned(id)).is_file() {
                stats.cleaned_files += 1;
            }
            if corpus.path().join(naming::conllu(id)).is_file() {
                stats.annotation_files += 1;
            }
        }

        stats.distinct_authors = authors.len();
        stats
    }

    /// Mean body length in words
    pub fn average_words(&self) -> f64 {
        if self.total_articles == 0 {
            0.0
        } else {
            self.total_words as f64 / self.total_articles as f64
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &DatasetStatistics) {
    println!("=== Dataset Statistics ===\n");

    println!("Overview:");
    println!("  Articles: {}", stats.total_articles);
    println!("  Total words: {}", stats.total_words);
    println!(
        "  Words per article: {:.1} (min {}, max {})",
        stats.average_words(),
        stats.min_words,
        stats.max_words
    );
    println!();

    println!("Metadata:");
    println!("  With title: {}", stats.with_title);
    println!("  Without author: {}", stats.without_author);
    println!("  Distinct authors: {}", stats.distinct_authors);
    if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
        println!(
            "  Published: {} .. {}",
            earliest.format("%Y-%m-%d"),
            latest.format("%Y-%m-%d")
        );
    }
    println!();

    let coverage = if stats.total_articles > 0 {
        (stats.annotation_files as f64 / stats.total_articles as f64) * 100.0
    } else {
        0.0
    };

    println!("Annotation:");
    println!("  Cleaned texts: {}", stats.cleaned_files);
    println!(
        "  Annotated: {} ({:.1}%)",
        stats.annotation_files, coverage
    );
}
