//! Locating the Nth occurrence of a search target in a buffer.
//!
//! Plain-text targets are matched line by line, scanning forward from the
//! anchor line; a target that only occurs above the anchor is not found.
//! Regex targets are matched over the whole buffer and ignore the anchor.

use crate::buffer::TextBuffer;
use crate::error::EditError;
use regex::Regex;
use std::ops::Range;

/// Minimum normalized similarity for a line to be suggested as a near miss.
const HINT_THRESHOLD: f64 = 0.6;

/// A located match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSpan {
    /// Whole lines `[start, end)`, 0-based.
    Lines(Range<usize>),
    /// Bytes `[start, end)` of the buffer.
    Bytes(Range<usize>),
}

/// Compile `pattern` for regex matching.
pub fn compile(pattern: &str) -> Result<Regex, EditError> {
    Regex::new(pattern).map_err(|source| EditError::MalformedPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Find occurrence `occurrence` (1-based) of a plain-text target.
///
/// Candidate starts run from `min(start_line - 1, line_count - 1)` through
/// `line_count - target_lines`. With `ignore_leading_whitespace`, non-blank
/// target lines are compared with leading whitespace stripped from both
/// sides; a blank target line only matches an empty file line.
pub fn find_plain(
    buffer: &TextBuffer,
    pattern: &str,
    ignore_leading_whitespace: bool,
    start_line: usize,
    occurrence: usize,
) -> Option<Range<usize>> {
    let target: Vec<&str> = pattern.split('\n').collect();
    let line_count = buffer.line_count();
    let last_start = line_count.checked_sub(target.len())?;
    let first_start = start_line.saturating_sub(1).min(line_count - 1);
    let lines: Vec<&str> = buffer.lines().collect();

    let mut found = 0;
    for start in first_start..=last_start {
        let is_match = target
            .iter()
            .zip(&lines[start..start + target.len()])
            .all(|(wanted, actual)| lines_equal(actual, wanted, ignore_leading_whitespace));
        if is_match {
            found += 1;
            if found == occurrence {
                return Some(start..start + target.len());
            }
        }
    }
    None
}

fn lines_equal(actual: &str, wanted: &str, ignore_leading_whitespace: bool) -> bool {
    if !ignore_leading_whitespace {
        return actual == wanted;
    }
    let wanted = wanted.trim_start();
    if wanted.trim_end().is_empty() {
        // Blank target lines still anchor structure.
        actual == wanted
    } else {
        actual.trim_start() == wanted
    }
}

/// Find occurrence `occurrence` (1-based) of `regex` anywhere in the buffer.
///
/// The scan resumes at the end of each match. An empty match advances it by
/// one character, so enumeration always terminates. Unlike
/// [`Regex::find_iter`], an empty match directly after a non-empty one is
/// counted (`a*` over `"baaa"` yields `0..0`, `1..4`, `4..4`).
pub fn find_regex(buffer: &TextBuffer, regex: &Regex, occurrence: usize) -> Option<Range<usize>> {
    let text = buffer.as_str();
    let mut position = 0;
    let mut found = 0;

    while position <= text.len() {
        let hit = regex.find_at(text, position)?;
        found += 1;
        if found == occurrence {
            return Some(hit.range());
        }
        position = if hit.is_empty() {
            hit.end() + text[hit.end()..].chars().next().map_or(1, char::len_utf8)
        } else {
            hit.end()
        };
    }
    None
}

/// Describe the line most similar to the first non-blank target line, at or
/// after the scan start, when nothing matched exactly.
pub fn closest_line_hint(buffer: &TextBuffer, pattern: &str, start_line: usize) -> Option<String> {
    let wanted = pattern.lines().map(str::trim).find(|line| !line.is_empty())?;
    let first = start_line.saturating_sub(1).min(buffer.line_count() - 1);

    let (index, score) = buffer
        .lines()
        .enumerate()
        .skip(first)
        .map(|(index, line)| (index, strsim::normalized_levenshtein(line.trim(), wanted)))
        .fold(None, |best: Option<(usize, f64)>, candidate| match best {
            Some(best) if best.1 >= candidate.1 => Some(best),
            _ => Some(candidate),
        })?;

    (score >= HINT_THRESHOLD)
        .then(|| format!("closest line {} is {:.0}% similar", index + 1, score * 100.0))
}
