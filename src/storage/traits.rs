//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL has no scheme separator: {0}")]
    InvalidUrl(String),

    #[error("Refusing to write outside the mirror root for {0}")]
    UnsafePath(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Implementations are shared between workers, so `store` takes `&self`
/// and must be safe to call concurrently. Calls may block; async callers
/// should run them on the blocking pool.
pub trait Storage: Send + Sync {
    /// Persists a fetched document
    ///
    /// # Arguments
    ///
    /// * `url` - The URL the document was fetched from
    /// * `body` - The response body
    ///
    /// # Returns
    ///
    /// The path the document was written to
    fn store(&self, url: &str, body: &[u8]) -> StorageResult<PathBuf>;
}
