//! Text-member extraction from downloaded archives
//!
//! Only members whose name ends with the configured text suffix are
//! extracted; everything else in the archive is left untouched. Each
//! extracted member keeps its archive-internal relative path under the
//! destination directory.

use crate::error::{Error, Result};
use crate::log_buffer::{LogBuffer, LogLevel};
use crate::types::ExtractedMember;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tracing::{debug, warn};

/// Extracts the text members of an archive to a working directory
pub struct MemberExtractor {
    log: Arc<LogBuffer>,
    text_suffix: String,
}

impl MemberExtractor {
    /// Create an extractor selecting members by `text_suffix`
    /// (compared case-insensitively)
    pub fn new(log: Arc<LogBuffer>, text_suffix: String) -> Self {
        Self { log, text_suffix }
    }

    /// Extract every text member of `archive_path` into `dest_dir`
    ///
    /// The destination directory is created if absent. A corrupt or
    /// unreadable archive is an error; a valid archive containing zero text
    /// members yields an empty list, which callers treat as a stop condition
    /// rather than a failure.
    pub async fn extract_text_members(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
    ) -> Result<Vec<ExtractedMember>> {
        debug!(
            archive_path = %archive_path.display(),
            dest_dir = %dest_dir.display(),
            "extracting text members"
        );

        let archive = archive_path.to_path_buf();
        let dest = dest_dir.to_path_buf();
        let suffix = self.text_suffix.to_lowercase();

        // The zip crate is blocking; keep it off the async runtime.
        let members = spawn_blocking(move || extract_text_members_blocking(&archive, &dest, &suffix))
            .await
            .map_err(|e| Error::Extraction {
                archive: archive_path.to_path_buf(),
                reason: format!("extraction task panicked: {e}"),
            })??;

        if members.is_empty() {
            self.log.append(
                LogLevel::Warning,
                format!(
                    "archive {} contains no {} members",
                    archive_path.display(),
                    self.text_suffix
                ),
            );
        } else {
            self.log.append(
                LogLevel::Info,
                format!(
                    "extracted {} text member(s) from {}",
                    members.len(),
                    archive_path.display()
                ),
            );
        }
        Ok(members)
    }
}

fn extract_text_members_blocking(
    archive_path: &Path,
    dest_dir: &Path,
    suffix: &str,
) -> Result<Vec<ExtractedMember>> {
    std::fs::create_dir_all(dest_dir)?;

    let file = std::fs::File::open(archive_path).map_err(|e| Error::Extraction {
        archive: archive_path.to_path_buf(),
        reason: format!("failed to open archive: {e}"),
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| Error::Extraction {
        archive: archive_path.to_path_buf(),
        reason: format!("failed to read archive: {e}"),
    })?;

    let mut members = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| Error::Extraction {
            archive: archive_path.to_path_buf(),
            reason: format!("failed to read archive entry: {e}"),
        })?;

        let name = entry.name().to_string();
        if entry.is_dir() || !name.to_lowercase().ends_with(suffix) {
            continue;
        }

        let relative: PathBuf = match entry.enclosed_name() {
            Some(path) => path.to_path_buf(),
            None => {
                warn!(%name, "skipping member with unsafe path");
                continue;
            }
        };

        let out_path = dest_dir.join(&relative);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = std::fs::File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out)?;

        members.push(ExtractedMember {
            local_path: out_path,
            archive_name: name,
        });
    }

    Ok(members)
}
