//! Core types for gazette-grep

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A discovered archive link on the index page
///
/// Created once per scan for the winning candidate; the href is kept exactly
/// as it appeared in the page, alongside its absolutized form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveReference {
    /// Raw link target as it appeared in the page
    pub href: String,

    /// Link target resolved against the index page URL
    pub resolved_url: String,

    /// Issue number parsed from the `P<digits>.zip` filename
    pub issue_number: u64,
}

impl ArchiveReference {
    /// Final path segment of the resolved URL (the archive filename)
    pub fn filename(&self) -> &str {
        self.resolved_url
            .rsplit('/')
            .next()
            .unwrap_or(&self.resolved_url)
    }
}

/// Outcome of a completed archive download
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResult {
    /// Where the archive was written on disk
    pub local_path: PathBuf,

    /// Total bytes written
    pub byte_size: u64,
}

/// One text member extracted from the archive
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMember {
    /// Where the member was written on disk
    pub local_path: PathBuf,

    /// The member's name inside the archive
    pub archive_name: String,
}

/// One substring occurrence in an extracted member
///
/// A line containing the query any number of times yields exactly one record.
/// All line numbers are 1-based.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Name of the file the match was found in
    pub source_file: String,

    /// 1-based number of the matched line
    pub line_number: u64,

    /// The matched line, trimmed of surrounding whitespace
    pub line_text: String,

    /// The record block containing the match, joined with newlines
    pub context_text: String,

    /// 1-based first line of the record block
    pub context_start_line: u64,

    /// 1-based last line of the record block
    pub context_end_line: u64,

    /// Number of lines in the record block
    pub context_line_count: u64,
}

/// Aggregate result of a fully completed pipeline run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// URL of the selected archive
    pub archive_url: String,

    /// Where the archive was downloaded to
    pub archive_path: PathBuf,

    /// Paths of every extracted text member
    pub extracted_members: Vec<PathBuf>,

    /// Every match found, in file-then-line order
    pub matches: Vec<MatchRecord>,

    /// Total number of matches
    pub total_matches: u64,
}

/// One of the four sequential pipeline stages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Index-page scan and link selection
    Scan,
    /// Archive download
    Fetch,
    /// Text-member extraction
    Extract,
    /// Substring search
    Search,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Scan => "scan",
            Stage::Fetch => "fetch",
            Stage::Extract => "extract",
            Stage::Search => "search",
        };
        write!(f, "{name}")
    }
}

/// Terminal outcome of a pipeline run
///
/// The orchestrator always returns a value: either the aggregate result, or
/// a not-found signal naming the first stage that produced nothing. The
/// stage is carried for observability, not for caller control flow.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RunOutcome {
    /// Every stage ran; zero matches is still a completion
    Completed(PipelineResult),
    /// A stage failed or produced no usable output
    NotFound {
        /// The stage that stopped the pipeline
        stage: Stage,
    },
}

impl RunOutcome {
    /// True when the pipeline reached the terminal completed state
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    /// The aggregate result, if the run completed
    pub fn into_result(self) -> Option<PipelineResult> {
        match self {
            RunOutcome::Completed(result) => Some(result),
            RunOutcome::NotFound { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_reference_filename_is_final_path_segment() {
        let reference = ArchiveReference {
            href: "/rpi/P205.zip".to_string(),
            resolved_url: "https://example.com/rpi/P205.zip".to_string(),
            issue_number: 205,
        };
        assert_eq!(reference.filename(), "P205.zip");
    }

    #[test]
    fn stage_display_names() {
        assert_eq!(Stage::Scan.to_string(), "scan");
        assert_eq!(Stage::Fetch.to_string(), "fetch");
        assert_eq!(Stage::Extract.to_string(), "extract");
        assert_eq!(Stage::Search.to_string(), "search");
    }

    #[test]
    fn run_outcome_not_found_carries_stage() {
        let outcome = RunOutcome::NotFound {
            stage: Stage::Extract,
        };
        assert!(!outcome.is_completed());
        assert_eq!(outcome.into_result(), None);
    }
}
