use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by corpus loading, index construction and search.
///
/// Build-phase errors are fatal to the build call: no partial index is ever
/// handed back alongside one of these.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The corpus file could not be opened or statted.
    #[error("cannot access corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The corpus file was read in one pass but fewer bytes arrived than its size.
    #[error("could not read all bytes of corpus file ({read} of {expected})")]
    Read { expected: u64, read: u64 },
    #[error("malformed corpus json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid query: {0}")]
    Query(String),
    /// An indexing worker terminated abnormally.
    #[error("indexing worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;
