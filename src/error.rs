//! Error types shared across the core.
//!
//! Classification and aggregation functions are total and never produce these;
//! only identity lookups and I/O surface an `Err` to the caller. Nothing here
//! is fatal to the process; commands decide whether to retry, fall back to
//! the cached collection, or report and exit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range input that cannot be degraded to a default.
    #[error("validation: {0}")]
    Validation(String),

    /// An id lookup (task, employee or dependency) found no match.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote API could not be reached or returned garbage.
    /// Recoverable by falling back to the last-known-good cached collection.
    #[error("remote fetch: {0}")]
    RemoteFetch(String),

    /// Local storage read/write failure. Logged, best-effort.
    #[error("persistence: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Persistence(e.to_string())
    }
}
