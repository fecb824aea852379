//! Storage module for persisting mirrored documents
//!
//! Documents are written to `<base>/<YYYY>/<MM>/<DD>/<host>/<path>`, where
//! the date is the UTC capture date. The path is a pure function of the
//! date and the URL, so refetching a URL on the same day overwrites it.

mod fs;
mod traits;

pub use fs::{capture_path, FsStorage};
pub use traits::{Storage, StorageError, StorageResult};
