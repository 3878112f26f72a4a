//! Annotation pipeline for loaded datasets
//!
//! This module contains:
//! - The `Analyzer` capability and its bundled implementations
//! - Per-article annotation with positional result alignment
//! - Merged mode, where prefix-matched files are annotated as one document

mod analyzer;
mod annotate;
mod merged;

pub use analyzer::{AnalyzerError, AnnotatedText, Analyzer, CommandAnalyzer, TokenAnalyzer};
pub use annotate::{annotate_merged, AnnotationPipeline, PipelineReport};
pub use merged::{ensure_separate_output, MergedCorpus, MERGE_SEPARATOR};
