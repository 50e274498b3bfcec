//! Streaming archive download with byte progress tracking

use crate::error::{Error, Result};
use crate::log_buffer::{LogBuffer, LogLevel};
use crate::types::DownloadResult;
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Completion percentage step at which progress is appended to the log trail
const PROGRESS_STEP: u64 = 25;

/// Streams the selected archive to local storage
pub struct ArchiveFetcher {
    client: reqwest::Client,
    log: Arc<LogBuffer>,
}

impl ArchiveFetcher {
    /// Create a fetcher using `client` for downloads
    pub fn new(client: reqwest::Client, log: Arc<LogBuffer>) -> Self {
        Self { client, log }
    }

    /// Download `archive_url` into `dest_dir`, creating the directory if needed
    ///
    /// The local filename is the URL's final path segment, verbatim. The body
    /// is written chunk by chunk as the transport delivers it, with
    /// cumulative bytes checked against the declared content length to log
    /// completion percentage; a missing `Content-Length` only disables the
    /// percentage messages.
    ///
    /// A non-2xx status or transport error is returned without retry, and a
    /// partially written file is left on disk. The client carries no request
    /// timeout. Both are accepted limitations of the current design.
    pub async fn fetch(&self, archive_url: &str, dest_dir: &Path) -> Result<DownloadResult> {
        tokio::fs::create_dir_all(dest_dir).await?;

        let filename = final_path_segment(archive_url);
        let local_path = dest_dir.join(filename);
        debug!(archive_url, local_path = %local_path.display(), "starting archive download");
        self.log
            .append(LogLevel::Info, format!("downloading {archive_url}"));

        let response = self.client.get(archive_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            self.log.append(
                LogLevel::Error,
                format!("archive download returned HTTP {status} for {archive_url}"),
            );
            return Err(Error::HttpStatus {
                url: archive_url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_length = response.content_length();
        if content_length.is_none() {
            debug!(archive_url, "no content length; progress percentage disabled");
        }

        let mut file = tokio::fs::File::create(&local_path).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;
        let mut next_milestone = PROGRESS_STEP;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;

            if let Some(total) = content_length.filter(|total| *total > 0) {
                let percent = written.saturating_mul(100) / total;
                while next_milestone <= 100 && percent >= next_milestone {
                    self.log.append(
                        LogLevel::Info,
                        format!("download {next_milestone}% complete ({written}/{total} bytes)"),
                    );
                    next_milestone += PROGRESS_STEP;
                }
            }
        }
        file.flush().await?;

        self.log.append(
            LogLevel::Info,
            format!("downloaded {filename} ({written} bytes)"),
        );
        Ok(DownloadResult {
            local_path,
            byte_size: written,
        })
    }
}

/// Final path segment of a URL, used verbatim as the local filename
fn final_path_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_path_segment_takes_last_component() {
        assert_eq!(
            final_path_segment("https://example.com/rpi/P205.zip"),
            "P205.zip"
        );
        assert_eq!(final_path_segment("P205.zip"), "P205.zip");
    }
}
