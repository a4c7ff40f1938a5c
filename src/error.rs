use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while constructing or loading a signature database
///
/// These are configuration mistakes and are thrown synchronously to the
/// caller; they never surface from the detection path.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("duplicate signature: pattern {pattern} already registered at offset {offset}")]
    Duplicate { pattern: String, offset: usize },

    #[error("malformed signature database: {0}")]
    Malformed(String),

    #[error("unsupported database version: {0}")]
    UnsupportedVersion(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A file whose header bytes could not be obtained
///
/// Captured per file and converted to an `Unreadable` report at the
/// directory-walk boundary; one unreadable file never aborts a batch.
#[derive(Error, Debug)]
#[error("unreadable file {}: {source}", path.display())]
pub struct FileUnreadable {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FileUnreadable {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised by the directory entry points
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
