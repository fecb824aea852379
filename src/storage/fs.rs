use crate::storage::traits::{Storage, StorageError, StorageResult};
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};

/// Computes where a URL captured on `date` is stored
///
/// The path is `<base>/<YYYY>/<MM>/<DD>/` followed by the URL with its
/// scheme removed. A URL ending in `/` is stored as `index_file` inside
/// that directory; otherwise the last segment is the file name. Query
/// strings, fragments, and empty segments are dropped.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use docs_mirror::storage::capture_path;
/// use std::path::Path;
///
/// let date = NaiveDate::from_ymd_opt(2024, 9, 26).unwrap();
/// let path = capture_path(
///     Path::new("aws_html"),
///     date,
///     "index.html",
///     "https://docs.example.com/ec2/index.html",
/// )
/// .unwrap();
/// assert_eq!(path, Path::new("aws_html/2024/09/26/docs.example.com/ec2/index.html"));
/// ```
pub fn capture_path(
    base: &Path,
    date: NaiveDate,
    index_file: &str,
    url: &str,
) -> StorageResult<PathBuf> {
    let (_, rest) = url
        .split_once("://")
        .ok_or_else(|| StorageError::InvalidUrl(url.to_string()))?;

    let rest = match rest.find(['?', '#']) {
        Some(end) => &rest[..end],
        None => rest,
    };

    let mut segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(StorageError::UnsafePath(url.to_string()));
    }

    if rest.ends_with('/') || segments.len() < 2 {
        segments.push(index_file);
    }

    let mut path = base.join(date.format("%Y").to_string());
    path.push(date.format("%m").to_string());
    path.push(date.format("%d").to_string());
    for segment in segments {
        path.push(segment);
    }

    Ok(path)
}

/// Writes documents into a date-partitioned directory tree
#[derive(Debug, Clone)]
pub struct FsStorage {
    base_dir: PathBuf,
    index_file: String,
}

impl FsStorage {
    pub fn new(base_dir: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            index_file: index_file.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Stores a document under the given capture date
    ///
    /// Existing files at the same path are overwritten.
    pub fn store_on(&self, date: NaiveDate, url: &str, body: &[u8]) -> StorageResult<PathBuf> {
        let path = capture_path(&self.base_dir, date, &self.index_file, url)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, body)?;

        Ok(path)
    }
}

impl Storage for FsStorage {
    fn store(&self, url: &str, body: &[u8]) -> StorageResult<PathBuf> {
        self.store_on(Utc::now().date_naive(), url, body)
    }
}
