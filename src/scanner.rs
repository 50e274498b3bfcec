//! Index-page scanning and archive link selection
//!
//! One GET against the index page, then every anchor target is inspected.
//! Links merely containing `.zip` count toward a diagnostic total; only a
//! final path segment fully matching `P<digits>.zip` can be selected. The
//! candidate with the largest issue number wins, and on equal numbers the
//! first-encountered link is kept.

use crate::error::{Error, Result};
use crate::log_buffer::{LogBuffer, LogLevel};
use crate::types::ArchiveReference;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::{Arc, OnceLock};
use tracing::debug;
use url::Url;

/// Anchored filename pattern selecting one issue archive
#[allow(clippy::expect_used)]
fn issue_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^P(\d+)\.zip$").expect("static pattern is valid"))
}

#[allow(clippy::expect_used)]
fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("static selector is valid"))
}

/// Issue number of a filename fully matching the `P<digits>.zip` pattern
///
/// Containment is not enough: the whole filename must match, with the letter
/// prefix and extension compared case-sensitively. Digit runs too large for
/// a `u64` are rejected.
pub fn parse_issue_number(filename: &str) -> Option<u64> {
    let captures = issue_pattern().captures(filename)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Scans the index page for the highest-numbered issue archive
pub struct LinkScanner {
    client: reqwest::Client,
    log: Arc<LogBuffer>,
}

impl LinkScanner {
    /// Create a scanner using `client` for page fetches
    pub fn new(client: reqwest::Client, log: Arc<LogBuffer>) -> Self {
        Self { client, log }
    }

    /// Fetch `index_url` and select the highest-numbered archive link
    ///
    /// Issues exactly one GET; a non-success status or transport error is
    /// returned without retry. `Ok(None)` means the page was fetched but no
    /// link matched the strict filename pattern.
    pub async fn scan(&self, index_url: &str) -> Result<Option<ArchiveReference>> {
        debug!(index_url, "fetching archive index page");
        self.log
            .append(LogLevel::Info, format!("scanning index page {index_url}"));

        let response = self.client.get(index_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            self.log.append(
                LogLevel::Error,
                format!("index page returned HTTP {status} for {index_url}"),
            );
            return Err(Error::HttpStatus {
                url: index_url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let reference = select_latest_archive(&body, index_url, &self.log)?;
        match &reference {
            Some(reference) => self.log.append(
                LogLevel::Info,
                format!(
                    "selected {} (issue {})",
                    reference.filename(),
                    reference.issue_number
                ),
            ),
            None => self.log.append(
                LogLevel::Warning,
                "no link matched the issue filename pattern",
            ),
        }
        Ok(reference)
    }
}

/// Select the highest-numbered issue archive among the page's anchors
///
/// Unusable HTML parses to a document with no anchors and yields `Ok(None)`;
/// it is never a hard failure. Ties on the issue number keep the first
/// candidate encountered in document order.
pub fn select_latest_archive(
    html: &str,
    index_url: &str,
    log: &LogBuffer,
) -> Result<Option<ArchiveReference>> {
    let base = Url::parse(index_url)?;
    let document = Html::parse_document(html);

    let mut zip_links = 0usize;
    let mut best: Option<(u64, String)> = None;

    for anchor in document.select(anchor_selector()) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.contains(".zip") {
            continue;
        }
        zip_links += 1;

        let filename = href.rsplit('/').next().unwrap_or(href);
        let Some(issue_number) = parse_issue_number(filename) else {
            debug!(href, "zip link does not match the issue filename pattern");
            continue;
        };

        // Strictly greater, so the first candidate wins a tie.
        let is_new_best = match &best {
            Some((best_issue, _)) => issue_number > *best_issue,
            None => true,
        };
        if is_new_best {
            best = Some((issue_number, href.to_string()));
        }
    }

    log.append(
        LogLevel::Info,
        format!("found {zip_links} zip link(s) on the index page"),
    );

    let Some((issue_number, href)) = best else {
        return Ok(None);
    };
    let resolved = base.join(&href)?;
    Ok(Some(ArchiveReference {
        href,
        resolved_url: resolved.to_string(),
        issue_number,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const INDEX_URL: &str = "https://example.com/rpi/";

    fn page(anchors: &[&str]) -> String {
        let links: String = anchors
            .iter()
            .map(|href| format!("<a href=\"{href}\">link</a>"))
            .collect();
        format!("<html><body><table><tr><td>{links}</td></tr></table></body></html>")
    }

    fn select(anchors: &[&str]) -> Option<ArchiveReference> {
        let log = LogBuffer::new();
        select_latest_archive(&page(anchors), INDEX_URL, &log).unwrap()
    }

    #[test]
    fn selects_largest_issue_number() {
        let reference = select(&["P10.zip", "P205.zip", "P33.zip", "readme.zip"]).unwrap();
        assert_eq!(reference.issue_number, 205);
        assert_eq!(reference.href, "P205.zip");
    }

    #[test]
    fn loose_zip_links_are_never_selected() {
        // Contains ".zip" and a larger number, but does not fully match the
        // pattern: prefix junk, trailing junk, wrong-case prefix.
        let reference = select(&[
            "XP9999.zip",
            "P9999.zip.bak",
            "p9999.zip",
            "P9999.ZIP",
            "P7.zip",
        ])
        .unwrap();
        assert_eq!(reference.issue_number, 7);
    }

    #[test]
    fn tie_keeps_first_encountered_candidate() {
        let reference = select(&["a/P100.zip", "b/P100.zip"]).unwrap();
        assert_eq!(reference.href, "a/P100.zip");
    }

    #[test]
    fn relative_href_is_resolved_against_index_url() {
        let reference = select(&["P42.zip"]).unwrap();
        assert_eq!(reference.resolved_url, "https://example.com/rpi/P42.zip");

        let reference = select(&["/archives/P42.zip"]).unwrap();
        assert_eq!(
            reference.resolved_url,
            "https://example.com/archives/P42.zip"
        );
    }

    #[test]
    fn absolute_href_is_kept_as_is() {
        let reference = select(&["https://mirror.example.org/P42.zip"]).unwrap();
        assert_eq!(
            reference.resolved_url,
            "https://mirror.example.org/P42.zip"
        );
    }

    #[test]
    fn page_without_strict_candidates_yields_none() {
        assert_eq!(select(&["readme.zip", "data.tar.gz", "index.html"]), None);
        assert_eq!(select(&[]), None);
    }

    #[test]
    fn unusable_html_yields_none_not_an_error() {
        let log = LogBuffer::new();
        let result = select_latest_archive("<<<%% not html at all", INDEX_URL, &log).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn anchors_without_href_are_ignored() {
        let log = LogBuffer::new();
        let html = "<a name=\"P99.zip\">no target</a><a href=\"P3.zip\">ok</a>";
        let reference = select_latest_archive(html, INDEX_URL, &log).unwrap().unwrap();
        assert_eq!(reference.issue_number, 3);
    }

    #[test]
    fn parse_issue_number_requires_full_match() {
        assert_eq!(parse_issue_number("P205.zip"), Some(205));
        assert_eq!(parse_issue_number("P007.zip"), Some(7));
        assert_eq!(parse_issue_number("P.zip"), None);
        assert_eq!(parse_issue_number("P12.zipx"), None);
        assert_eq!(parse_issue_number("xP12.zip"), None);
        assert_eq!(parse_issue_number("p12.zip"), None);
        assert_eq!(parse_issue_number("P12.ZIP"), None);
    }

    #[test]
    fn parse_issue_number_rejects_oversized_digit_runs() {
        assert_eq!(parse_issue_number("P99999999999999999999999.zip"), None);
    }

    #[test]
    fn zip_link_count_is_logged_even_without_selection() {
        let log = LogBuffer::new();
        let result = select_latest_archive(&page(&["readme.zip"]), INDEX_URL, &log).unwrap();
        assert_eq!(result, None);
        let entries = log.entries();
        assert!(
            entries.iter().any(|e| e.message.contains("1 zip link(s)")),
            "diagnostic count missing from: {entries:?}"
        );
    }
}
