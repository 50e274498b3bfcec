//! # gazette-grep
//!
//! Backend library for searching the latest issue of a remotely published
//! gazette archive.
//!
//! The pipeline discovers every `P<digits>.zip` link on a remote index page,
//! selects the one with the largest issue number, streams it to disk,
//! extracts its text members, and scans them for a caller-supplied substring.
//! Each hit is reported together with the record block that contains it,
//! bounded by `(Cd)` delimiter lines.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Sequential** - Each stage completes (or fails) before the next starts
//! - **Value-returning** - The orchestrator reports an outcome, never panics
//!   or leaks errors past its boundary
//!
//! ## Quick Start
//!
//! ```no_run
//! use gazette_grep::{Config, GazetteGrep, RunOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let grep = GazetteGrep::new(Config::default())?;
//!
//!     match grep.run_default_index("acme industries").await {
//!         RunOutcome::Completed(result) => {
//!             println!(
//!                 "{} match(es) in {}",
//!                 result.total_matches, result.archive_url
//!             );
//!         }
//!         RunOutcome::NotFound { stage } => {
//!             eprintln!("pipeline stopped at the {stage} stage");
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Record-boundary context resolution
pub mod context;
/// Error types
pub mod error;
/// Text-member extraction from downloaded archives
pub mod extraction;
/// Streaming archive download
pub mod fetcher;
/// Bounded in-memory log trail
pub mod log_buffer;
/// End-to-end pipeline orchestration
pub mod pipeline;
/// Index-page scanning and link selection
pub mod scanner;
/// Multi-encoding substring search
pub mod search;
/// Core types shared across stages
pub mod types;

// Re-export commonly used types
pub use config::{Config, FetchConfig, SearchConfig};
pub use context::{ContextBlock, resolve_context};
pub use error::{Error, Result};
pub use extraction::MemberExtractor;
pub use fetcher::ArchiveFetcher;
pub use log_buffer::{LogBuffer, LogEntry, LogLevel};
pub use pipeline::GazetteGrep;
pub use scanner::LinkScanner;
pub use search::SearchEngine;
pub use types::{
    ArchiveReference, DownloadResult, ExtractedMember, MatchRecord, PipelineResult, RunOutcome,
    Stage,
};
