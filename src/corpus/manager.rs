use crate::corpus::{DatasetError, DatasetResult};
use crate::storage::{naming, ArticleMeta, ArticleRecord, StorageError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// In-memory view of a validated dataset
///
/// Records are keyed by id; iteration follows ascending id order.
#[derive(Debug)]
pub struct CorpusManager {
    path: PathBuf,
    articles: BTreeMap<u32, ArticleRecord>,
}

impl CorpusManager {
    /// Validates and loads the dataset stored under `path`
    ///
    /// # Validation
    ///
    /// 1. `path` exists and is a directory
    /// 2. It holds at least one `{id}_raw.txt` file
    /// 3. Raw file ids are exactly `1..=N`, no raw file is empty, and any
    ///    metadata files cover the same ids
    ///
    /// Records are read only once every check has passed.
    pub fn load(path: &Path) -> DatasetResult<Self> {
        let files = scan_dataset(path)?;

        let mut articles = BTreeMap::new();
        for (id, raw_path) in (1..).zip(&files.raw) {
            let mut article = ArticleRecord::new(id, String::new());
            article.body = read_file(raw_path)?;
            if let Some(meta_path) = files.meta.get(&id) {
                article.apply_meta(read_meta(meta_path)?);
            }
            articles.insert(id, article);
        }

        tracing::info!("Loaded {} articles from {}", articles.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            articles,
        })
    }

    /// Dataset directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records keyed by id
    pub fn articles(&self) -> &BTreeMap<u32, ArticleRecord> {
        &self.articles
    }

    pub fn articles_mut(&mut self) -> &mut BTreeMap<u32, ArticleRecord> {
        &mut self.articles
    }

    /// Looks up one record by id
    pub fn get(&self, id: u32) -> Option<&ArticleRecord> {
        self.articles.get(&id)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Checks a dataset directory without reading any record
///
/// Returns the number of records `N` on success.
pub fn validate_dataset(path: &Path) -> DatasetResult<u32> {
    scan_dataset(path).map(|files| files.raw.len() as u32)
}

/// Record files found by a successful scan
struct DatasetFiles {
    /// Raw text files; entry `k` holds id `k + 1`
    raw: Vec<PathBuf>,

    /// Metadata files by id
    meta: BTreeMap<u32, PathBuf>,
}

/// Scans and validates a dataset directory, keeping the file names as found
fn scan_dataset(path: &Path) -> DatasetResult<DatasetFiles> {
    if !path.exists() {
        return Err(DatasetError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(DatasetError::NotADirectory(path.to_path_buf()));
    }

    let io_error = |source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut raw_files = Vec::new();
    let mut meta_files = Vec::new();

    for entry in fs::read_dir(path).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if name.ends_with(naming::RAW_SUFFIX) {
            raw_files.push((name, entry.path()));
        } else if let Some(id) = naming::parse_id(&name, naming::META_SUFFIX) {
            meta_files.push((id, entry.path()));
        }
    }

    if raw_files.is_empty() {
        return Err(DatasetError::EmptyDirectory(path.to_path_buf()));
    }

    let inconsistent = |reason: String| DatasetError::InconsistentDataset {
        path: path.to_path_buf(),
        reason,
    };

    let mut raw = Vec::with_capacity(raw_files.len());
    for (name, file_path) in raw_files {
        let id = naming::parse_id(&name, naming::RAW_SUFFIX)
            .ok_or_else(|| inconsistent(format!("'{}' does not start with a numeric id", name)))?;

        let size = fs::metadata(&file_path)
            .map_err(|source| DatasetError::Io {
                path: file_path.clone(),
                source,
            })?
            .len();
        if size == 0 {
            return Err(inconsistent(format!("article {} ('{}') is empty", id, name)));
        }

        raw.push((id, file_path));
    }

    raw.sort_unstable_by_key(|(id, _)| *id);
    let ids: Vec<u32> = raw.iter().map(|(id, _)| *id).collect();
    let count = ids.len() as u32;
    if let Some(reason) = describe_id_mismatch(&ids, count) {
        return Err(inconsistent(reason));
    }

    if !meta_files.is_empty() {
        meta_files.sort_unstable_by_key(|(id, _)| *id);
        let meta_ids: Vec<u32> = meta_files.iter().map(|(id, _)| *id).collect();
        if let Some(reason) = describe_id_mismatch(&meta_ids, count) {
            return Err(inconsistent(format!("metadata files: {}", reason)));
        }
    }

    Ok(DatasetFiles {
        raw: raw.into_iter().map(|(_, file_path)| file_path).collect(),
        meta: meta_files.into_iter().collect(),
    })
}

fn read_file(path: &Path) -> DatasetResult<String> {
    fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_meta(path: &Path) -> DatasetResult<ArticleMeta> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| {
        StorageError::Serialization {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Explains how sorted `ids` differ from `1..=count`, if they do
fn describe_id_mismatch(ids: &[u32], count: u32) -> Option<String> {
    if ids.len() as u32 != count {
        return Some(format!("expected {} files, found {}", count, ids.len()));
    }

    for (position, (&found, expected)) in ids.iter().zip(1..=count).enumerate() {
        if found != expected {
            let detail = if position > 0 && ids[position - 1] == found {
                format!("id {} appears more than once", found)
            } else {
                format!("id {} is missing", expected)
            };
            return Some(detail);
        }
    }

    None
}
