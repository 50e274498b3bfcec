//! Multi-encoding substring search across extracted members
//!
//! Each member is decoded once, with the first encoding in the configured
//! list that decodes the whole file without error. Members no encoding can
//! decode (or that cannot be read at all) are skipped with a log entry and
//! the search continues. Matching is a case-insensitive per-line containment
//! test; a line holding the query several times still yields one record.

use crate::context::resolve_context;
use crate::error::{Error, Result};
use crate::log_buffer::{LogBuffer, LogLevel};
use crate::types::{ExtractedMember, MatchRecord};
use encoding_rs::Encoding;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Scans extracted members for a query substring
pub struct SearchEngine {
    encodings: Vec<&'static Encoding>,
    log: Arc<LogBuffer>,
}

impl SearchEngine {
    /// Create an engine trying `encoding_labels` in order when decoding
    ///
    /// Labels are WHATWG encoding names ("utf-8", "windows-1252", ...).
    /// Unknown labels are dropped with a warning rather than failing
    /// construction.
    pub fn new(log: Arc<LogBuffer>, encoding_labels: &[String]) -> Self {
        let encodings = encoding_labels
            .iter()
            .filter_map(|label| match Encoding::for_label(label.as_bytes()) {
                Some(encoding) => Some(encoding),
                None => {
                    warn!(%label, "unknown encoding label ignored");
                    None
                }
            })
            .collect();
        Self { encodings, log }
    }

    /// Search every member for `query`, in file-then-line order
    ///
    /// Returns one [`MatchRecord`] per line containing the query,
    /// case-insensitively, together with its surrounding record block. An
    /// empty member list or a query found nowhere yields an empty list, not
    /// a failure.
    pub fn search(&self, members: &[ExtractedMember], query: &str) -> Vec<MatchRecord> {
        let needle = query.to_lowercase();
        let mut records = Vec::new();

        for member in members {
            let lines = match self.read_lines(&member.local_path) {
                Ok(lines) => lines,
                Err(e) => {
                    self.log.append(
                        LogLevel::Warning,
                        format!("skipping {}: {e}", member.local_path.display()),
                    );
                    continue;
                }
            };

            let source_file = member
                .local_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| member.archive_name.clone());

            for (index, line) in lines.iter().enumerate() {
                if !line.trim().to_lowercase().contains(&needle) {
                    continue;
                }
                let context = resolve_context(&lines, index);
                records.push(MatchRecord {
                    source_file: source_file.clone(),
                    line_number: index as u64 + 1,
                    line_text: line.trim().to_string(),
                    context_text: context.text,
                    context_start_line: context.start_line,
                    context_end_line: context.end_line,
                    context_line_count: context.lines.len() as u64,
                });
            }
        }

        self.log.append(
            LogLevel::Info,
            format!(
                "search finished with {} match(es) across {} member(s)",
                records.len(),
                members.len()
            ),
        );
        records
    }

    /// Read and decode one member into its full line buffer,
    /// line endings retained per line
    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = std::fs::read(path)?;
        let content = self.decode(&bytes, path)?;
        Ok(content.split_inclusive('\n').map(str::to_string).collect())
    }

    /// First-success decode over the configured encoding chain
    fn decode(&self, bytes: &[u8], path: &Path) -> Result<String> {
        for encoding in &self.encodings {
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes)
            {
                debug!(
                    file = %path.display(),
                    encoding = encoding.name(),
                    "decoded member"
                );
                return Ok(text.into_owned());
            }
        }
        Err(Error::Decode {
            file: path.to_path_buf(),
        })
    }
}
