use crate::corpus::{DatasetError, DatasetResult};
use crate::pipeline::annotate::annotate_merged;
use crate::pipeline::Analyzer;
use crate::storage::{naming, DatasetStore};
use crate::HarvestError;
use std::fs;
use std::path::{Path, PathBuf};

/// Separator placed between merged source files
pub const MERGE_SEPARATOR: &str = "\n\n";

/// Text files sharing a name prefix, combined into one document
#[derive(Debug, Clone)]
pub struct MergedCorpus {
    sources: Vec<PathBuf>,
    text: String,
}

impl MergedCorpus {
    /// Combines every regular file in `input_dir` whose stem starts with `prefix`
    ///
    /// Files are taken in file name order. A previously written merged text in
    /// the same directory is never picked up.
    pub fn combine(input_dir: &Path, prefix: &str) -> DatasetResult<Self> {
        if !input_dir.exists() {
            return Err(DatasetError::PathNotFound(input_dir.to_path_buf()));
        }
        if !input_dir.is_dir() {
            return Err(DatasetError::NotADirectory(input_dir.to_path_buf()));
        }

        let io_error = |path: &Path, source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut sources = Vec::new();
        for entry in fs::read_dir(input_dir).map_err(|e| io_error(input_dir, e))? {
            let path = entry.map_err(|e| io_error(input_dir, e))?.path();
            if !path.is_file() || path.file_name().map_or(false, |n| n == naming::MERGED_TEXT) {
                continue;
            }

            let matches = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map_or(false, |stem| stem.starts_with(prefix));
            if matches {
                sources.push(path);
            }
        }

        if sources.is_empty() {
            return Err(DatasetError::EmptyDirectory(input_dir.to_path_buf()));
        }
        sources.sort();

        let mut parts = Vec::with_capacity(sources.len());
        for source in &sources {
            parts.push(fs::read_to_string(source).map_err(|e| io_error(source, e))?);
        }

        tracing::info!(
            "Merged {} files with prefix '{}' from {}",
            sources.len(),
            prefix,
            input_dir.display()
        );

        Ok(Self {
            sources,
            text: parts.join(MERGE_SEPARATOR),
        })
    }

    /// Files that went into the merged text, in merge order
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Writes the merged text to `path`
    pub fn save(&self, path: &Path) -> DatasetResult<()> {
        fs::write(path, &self.text).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Annotates the merged text as a single document
    pub fn annotate(
        &self,
        analyzer: &dyn Analyzer,
        store: &dyn DatasetStore,
    ) -> Result<usize, HarvestError> {
        annotate_merged(&self.text, analyzer, store)
    }
}

/// Checks that wiping `output_dir` cannot touch `input_dir`
///
/// An output directory that does not exist yet is always safe. An existing
/// one must neither equal `input_dir` nor contain it.
pub fn ensure_separate_output(input_dir: &Path, output_dir: &Path) -> DatasetResult<()> {
    if !output_dir.exists() {
        return Ok(());
    }

    let canonical = |path: &Path| {
        path.canonicalize().map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let input = canonical(input_dir)?;
    let output = canonical(output_dir)?;
    if input.starts_with(&output) {
        return Err(DatasetError::OutputOverlapsInput { input, output });
    }

    Ok(())
}
