//! Record-boundary context resolution around a matched line
//!
//! Extracted gazette text is a sequence of records separated by delimiter
//! lines, ones whose trimmed content starts with `(Cd)`. The block around a
//! match runs from just below the previous delimiter through (and including)
//! the next one. The resolver is a pure function over the full line buffer
//! and is idempotent for a given input.

use serde::Serialize;

/// Marker prefix identifying a record-delimiter line
pub const DELIMITER_MARKER: &str = "(Cd)";

/// Contiguous block of lines surrounding one match
///
/// Line numbers are 1-based. `lines` holds the block with line endings
/// stripped; `text` is the same block joined with single newlines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContextBlock {
    /// The block joined with newlines, for human-readable display
    pub text: String,

    /// The block's lines, endings stripped
    pub lines: Vec<String>,

    /// 1-based first line of the block
    pub start_line: u64,

    /// 1-based last line of the block
    pub end_line: u64,

    /// 1-based number of the matched line
    pub match_line_number: u64,

    /// 1-based number of the delimiter just above the block, when one exists
    /// (the delimiter itself is not part of the block)
    pub preceding_delimiter_line: Option<u64>,

    /// 1-based number of the delimiter closing the block, when one exists
    /// (that delimiter is the block's last line)
    pub following_delimiter_line: Option<u64>,
}

/// True when the line's trimmed content starts with the `(Cd)` marker
fn is_delimiter(line: &str) -> bool {
    line.trim().starts_with(DELIMITER_MARKER)
}

/// Trailing newline characters stripped from a line
fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

/// Resolve the record block containing `lines[match_index]`
///
/// The block start is found by scanning backward from the match: the scan
/// stops at the first delimiter line, which stays outside the block. The
/// block end is found by scanning forward: the scan stops at the first
/// delimiter line, which is included as the block's last line. Without a
/// delimiter in either direction the block extends to the buffer's edge.
///
/// An out-of-range `match_index` degrades to a minimal single-line block
/// (empty text, no delimiter information) instead of failing; callers
/// always receive a usable block.
pub fn resolve_context(lines: &[String], match_index: usize) -> ContextBlock {
    compute_block(lines, match_index).unwrap_or_else(|| fallback_block(lines, match_index))
}

fn compute_block(lines: &[String], match_index: usize) -> Option<ContextBlock> {
    // The only failure: the index does not name a line.
    lines.get(match_index)?;

    let mut start = match_index;
    let mut preceding_delimiter_line = None;
    for index in (0..match_index).rev() {
        if is_delimiter(&lines[index]) {
            preceding_delimiter_line = Some(index as u64 + 1);
            break;
        }
        start = index;
    }

    let mut end = match_index;
    let mut following_delimiter_line = None;
    for (index, line) in lines.iter().enumerate().skip(match_index + 1) {
        end = index;
        if is_delimiter(line) {
            following_delimiter_line = Some(index as u64 + 1);
            break;
        }
    }

    let block_lines: Vec<String> = lines[start..=end]
        .iter()
        .map(|line| strip_line_ending(line).to_string())
        .collect();
    let text = block_lines.join("\n");

    Some(ContextBlock {
        text,
        lines: block_lines,
        start_line: start as u64 + 1,
        end_line: end as u64 + 1,
        match_line_number: match_index as u64 + 1,
        preceding_delimiter_line,
        following_delimiter_line,
    })
}

/// Minimal block holding only the matched line (empty when unavailable)
fn fallback_block(lines: &[String], match_index: usize) -> ContextBlock {
    let matched = lines
        .get(match_index)
        .map(|line| strip_line_ending(line).to_string())
        .unwrap_or_default();
    let line_number = match_index as u64 + 1;
    ContextBlock {
        text: matched.clone(),
        lines: vec![matched],
        start_line: line_number,
        end_line: line_number,
        match_line_number: line_number,
        preceding_delimiter_line: None,
        following_delimiter_line: None,
    }
}
