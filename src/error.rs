//! Error types for gazette-grep
//!
//! One error enum covers every stage of the pipeline. Each variant carries
//! the offending input (URL, archive path, member path) so a failure can be
//! diagnosed from the log trail alone. Nothing is retried automatically, and
//! the orchestrator maps every error to a plain not-found outcome before it
//! reaches a caller.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gazette-grep operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for gazette-grep
#[derive(Debug, Error)]
pub enum Error {
    /// A page or archive request completed with a non-success status
    #[error("fetch failed for {url}: HTTP {status}")]
    HttpStatus {
        /// The URL that was requested
        url: String,
        /// The HTTP status code returned by the server
        status: u16,
    },

    /// Transport-level network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A link target could not be resolved against the index page URL
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Archive could not be opened or read
    #[error("extraction failed for {archive}: {reason}")]
    Extraction {
        /// The archive file that failed to extract
        archive: PathBuf,
        /// The reason extraction failed
        reason: String,
    },

    /// No configured encoding decoded the member without error
    #[error("no configured encoding decoded {file}")]
    Decode {
        /// The member file that could not be decoded
        file: PathBuf,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
