use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the memory stores, the relevance filter, and the façade.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Backing storage is missing, unreadable, or unwritable.
    #[error("cannot access {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing storage exists but does not hold valid structured data.
    #[error("{} is not a valid interaction store: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reverse index points past the oldest stored record.
    #[error("index {index} is out of range ({len} records stored)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Token looks numeric but is not a valid non-negative integer.
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// Recall by a non-numeric token.
    #[error("freeform recall is not supported: {0}")]
    FreeformRecallUnsupported(String),

    /// The relevance service rejected or was never given credentials.
    #[error("relevance service rejected credentials: {0}")]
    FilterUnauthorized(String),
}

impl MemoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// `true` for errors that are legitimate negative answers rather than faults.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, MemoryError>;
