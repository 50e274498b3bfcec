//! End-to-end orchestration of the scan, fetch, extract, and search stages
//!
//! The pipeline is a sequential state machine: each stage must produce a
//! usable output before the next starts, any stage producing nothing aborts
//! the run, and nothing is retried. The orchestrator always returns a
//! [`RunOutcome`] value; errors are logged with the failing stage and the
//! offending input, then mapped to a not-found signal.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::extraction::MemberExtractor;
use crate::fetcher::ArchiveFetcher;
use crate::log_buffer::{LogBuffer, LogEntry, LogLevel};
use crate::scanner::LinkScanner;
use crate::search::SearchEngine;
use crate::types::{
    ArchiveReference, DownloadResult, ExtractedMember, MatchRecord, PipelineResult, RunOutcome,
    Stage,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, warn};

/// The full discover-download-extract-search pipeline
///
/// Owns the HTTP client, the per-stage components, and the log trail shared
/// with the presentation layer. Construction is cheap; a single instance can
/// serve many runs, though concurrent runs sharing the same destination
/// directories may race on file creation and their log entries interleave.
pub struct GazetteGrep {
    config: Config,
    scanner: LinkScanner,
    fetcher: ArchiveFetcher,
    extractor: MemberExtractor,
    search_engine: Arc<SearchEngine>,
    log: Arc<LogBuffer>,
}

impl GazetteGrep {
    /// Create a pipeline from `config` with a fresh log trail
    pub fn new(config: Config) -> Result<Self> {
        Self::with_log(config, Arc::new(LogBuffer::new()))
    }

    /// Create a pipeline appending to an existing log trail
    ///
    /// The HTTP client is shared by the scan and fetch stages and carries no
    /// request timeout (carried-over limitation of the current design).
    pub fn with_log(config: Config, log: Arc<LogBuffer>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.fetch.user_agent.clone())
            .build()
            .map_err(Error::Network)?;

        let scanner = LinkScanner::new(client.clone(), Arc::clone(&log));
        let fetcher = ArchiveFetcher::new(client, Arc::clone(&log));
        let extractor = MemberExtractor::new(Arc::clone(&log), config.search.text_suffix.clone());
        let search_engine = Arc::new(SearchEngine::new(
            Arc::clone(&log),
            &config.search.encodings,
        ));

        Ok(Self {
            config,
            scanner,
            fetcher,
            extractor,
            search_engine,
            log,
        })
    }

    /// The configuration this pipeline was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the log trail, for the presentation layer
    pub fn log(&self) -> Arc<LogBuffer> {
        Arc::clone(&self.log)
    }

    /// Snapshot of the log trail, oldest first
    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.log.entries()
    }

    /// Drop every retained log entry
    pub fn clear_log(&self) {
        self.log.clear();
    }

    /// Scan `index_url` for the highest-numbered archive link
    pub async fn scan(&self, index_url: &str) -> Result<Option<ArchiveReference>> {
        self.scanner.scan(index_url).await
    }

    /// Download `archive_url` into `dest_dir`
    pub async fn fetch(&self, archive_url: &str, dest_dir: &Path) -> Result<DownloadResult> {
        self.fetcher.fetch(archive_url, dest_dir).await
    }

    /// Extract the text members of `archive_path` into `dest_dir`
    pub async fn extract_text_members(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
    ) -> Result<Vec<ExtractedMember>> {
        self.extractor
            .extract_text_members(archive_path, dest_dir)
            .await
    }

    /// Search `members` for `query`
    ///
    /// The blocking file reads run off the async runtime; the search itself
    /// never fails, so a panicking task degrades to an empty result with a
    /// log entry.
    pub async fn search(&self, members: &[ExtractedMember], query: &str) -> Vec<MatchRecord> {
        let engine = Arc::clone(&self.search_engine);
        let members = members.to_vec();
        let query = query.to_string();
        match tokio::task::spawn_blocking(move || engine.search(&members, &query)).await {
            Ok(records) => records,
            Err(e) => {
                self.log
                    .append(LogLevel::Error, format!("search task failed: {e}"));
                Vec::new()
            }
        }
    }

    /// Run the full pipeline against the configured default index page
    pub async fn run_default_index(&self, query: &str) -> RunOutcome {
        let index_url = self.config.fetch.index_url.clone();
        self.run(&index_url, query).await
    }

    /// Run the full pipeline: scan, fetch, extract, then search
    ///
    /// The first stage that yields nothing aborts the run and names itself
    /// in the returned [`RunOutcome::NotFound`]; the search stage always
    /// completes, so zero matches is still a completion. Errors never cross
    /// this boundary.
    pub async fn run(&self, index_url: &str, query: &str) -> RunOutcome {
        self.log.append(
            LogLevel::Info,
            format!("pipeline started for query \"{query}\""),
        );

        let reference = match self.scanner.scan(index_url).await {
            Ok(Some(reference)) => reference,
            Ok(None) => {
                return self.abort(Stage::Scan, "no link matched the issue filename pattern");
            }
            Err(e) => return self.abort_error(Stage::Scan, index_url, &e),
        };

        let download = match self
            .fetcher
            .fetch(&reference.resolved_url, &self.config.fetch.download_dir)
            .await
        {
            Ok(download) => download,
            Err(e) => return self.abort_error(Stage::Fetch, &reference.resolved_url, &e),
        };

        let members = match self
            .extractor
            .extract_text_members(&download.local_path, &self.config.fetch.extract_dir)
            .await
        {
            Ok(members) if members.is_empty() => {
                return self.abort(Stage::Extract, "archive contains no text members");
            }
            Ok(members) => members,
            Err(e) => {
                let input = download.local_path.display().to_string();
                return self.abort_error(Stage::Extract, &input, &e);
            }
        };

        let matches = self.search(&members, query).await;
        let total_matches = matches.len() as u64;
        self.log.append(
            LogLevel::Info,
            format!("pipeline completed with {total_matches} match(es)"),
        );

        RunOutcome::Completed(PipelineResult {
            archive_url: reference.resolved_url,
            archive_path: download.local_path,
            extracted_members: members.into_iter().map(|m| m.local_path).collect(),
            matches,
            total_matches,
        })
    }

    fn abort(&self, stage: Stage, reason: &str) -> RunOutcome {
        warn!(%stage, reason, "pipeline aborted");
        self.log.append(
            LogLevel::Warning,
            format!("{stage} stage produced no result: {reason}"),
        );
        RunOutcome::NotFound { stage }
    }

    fn abort_error(&self, stage: Stage, input: &str, error: &Error) -> RunOutcome {
        error!(%stage, input, %error, "pipeline stage failed");
        self.log.append(
            LogLevel::Error,
            format!("{stage} stage failed for {input}: {error}"),
        );
        RunOutcome::NotFound { stage }
    }
}
