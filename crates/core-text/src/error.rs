//! Typed failures surfaced by the document store.

use std::path::{Path, PathBuf};

/// Errors returned by [`crate::Document`] file and structural edit operations.
///
/// Navigation-driven edits (`delete_char`, `join_lines`) never produce an
/// error; out-of-range input there is a silent no-op.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("'{}' is not a regular file", .0.display())]
    NotAFile(PathBuf),
    #[error("file too large: {size} bytes (max {max} bytes)")]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },
    #[error("no filename specified")]
    NoFilename,
    #[error("invalid line number: {0}")]
    InvalidLine(usize),
    #[error("permission denied: '{}'", .0.display())]
    PermissionDenied(PathBuf),
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
    #[error("i/o failure on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// Classify an `io::Error` raised while touching `path`.
    pub(crate) fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}
