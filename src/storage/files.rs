//! Filesystem-backed dataset store
//!
//! All artifacts live flat inside one directory and are named by the
//! contract in `storage::naming`.

use crate::storage::traits::{DatasetStore, StorageError, StorageResult};
use crate::storage::{clean_text, naming, ArticleMeta, ArticleRecord};
use std::fs;
use std::path::{Path, PathBuf};

/// Dataset store writing plain files under a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store over an existing directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates an empty store, removing anything already at `root`
    ///
    /// Each acquisition run starts from a clean directory so ids from a
    /// previous run can never mix with the new ones.
    pub fn prepare(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        if root.exists() {
            tracing::debug!("Removing previous dataset at {}", root.display());
            fs::remove_dir_all(&root).map_err(|e| io_error(&root, e))?;
        }
        fs::create_dir_all(&root).map_err(|e| io_error(&root, e))?;
        Ok(Self { root })
    }

    /// Full path of a file inside the store
    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    fn write(&self, file_name: &str, contents: &str) -> StorageResult<()> {
        let path = self.path_of(file_name);
        fs::write(&path, contents).map_err(|e| io_error(&path, e))
    }
}

impl DatasetStore for FileStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn write_raw(&self, article: &ArticleRecord) -> StorageResult<()> {
        self.write(&naming::raw(article.id), &article.body)
    }

    fn write_meta(&self, article: &ArticleRecord) -> StorageResult<()> {
        let path = self.path_of(&naming::meta(article.id));
        let json = serde_json::to_string_pretty(&article.to_meta()).map_err(|e| {
            StorageError::Serialization {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
        fs::write(&path, json).map_err(|e| io_error(&path, e))
    }

    fn write_cleaned(&self, article: &ArticleRecord) -> StorageResult<()> {
        self.write(&naming::cleaned(article.id), &clean_text(&article.body))
    }

    fn write_annotation(&self, id: u32, annotation: &str) -> StorageResult<()> {
        self.write(&naming::conllu(id), &format!("{}\n", annotation))
    }

    fn write_merged_annotation(&self, annotation: &str) -> StorageResult<()> {
        self.write(naming::MERGED_ANNOTATION, &format!("{}\n", annotation))
    }

    fn read_raw(&self, id: u32) -> StorageResult<String> {
        let path = self.path_of(&naming::raw(id));
        fs::read_to_string(&path).map_err(|e| io_error(&path, e))
    }

    fn read_meta(&self, id: u32) -> StorageResult<Option<ArticleMeta>> {
        let path = self.path_of(&naming::meta(id));
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StorageError::Serialization {
                path,
                message: e.to_string(),
            })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}
