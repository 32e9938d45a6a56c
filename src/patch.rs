//! Applying one change request to a session's buffer.
//!
//! Each change is turned into a single [`Splice`]: insertions splice whole
//! lines before a line, plain-text matches splice the matched line span and
//! regex matches splice the matched byte span. Regions written by earlier
//! changes are tracked in current-buffer coordinates so that a later change
//! landing inside one of them is rejected instead of silently rewriting it.

use crate::buffer::TextBuffer;
use crate::edit::Splice;
use crate::error::EditError;
use crate::indent::{apply_indentation, detect_indent, indentation_of};
use crate::matcher::{self, MatchSpan};
use crate::request::{ChangeKind, ChangeRequest, ValidationError, ValidationIssue};
use std::ops::Range;

/// What a successfully applied change did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Inserted { line: usize, lines: usize },
    Replaced { span: MatchSpan },
    Deleted { span: MatchSpan },
}

#[derive(Debug)]
pub struct PatchApplier {
    buffer: TextBuffer,
    written: Vec<Range<usize>>,
}

impl PatchApplier {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            buffer: TextBuffer::new(content),
            written: Vec::new(),
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn into_content(self) -> String {
        self.buffer.into_string()
    }

    /// Apply a single change. On error the buffer is unchanged.
    ///
    /// `index` is the change's position in its request, used only to report
    /// a change that never passed validation.
    pub fn apply(&mut self, index: usize, change: &ChangeRequest) -> Result<Applied, EditError> {
        let Some(kind) = change.kind() else {
            if change.search_pattern.is_some() {
                return Err(EditError::EmptyPattern);
            }
            return Err(ValidationError::from(ValidationIssue::missing_operation(index)).into());
        };

        match kind {
            ChangeKind::Insert { text } => self.insert(change, text),
            ChangeKind::Replace { pattern, text } => {
                let span = self.locate(change, pattern)?;
                self.replace(change, span.clone(), Some(text))?;
                Ok(Applied::Replaced { span })
            }
            ChangeKind::Delete { pattern } => {
                let span = self.locate(change, pattern)?;
                self.replace(change, span.clone(), None)?;
                Ok(Applied::Deleted { span })
            }
        }
    }

    fn insert(&mut self, change: &ChangeRequest, text: &str) -> Result<Applied, EditError> {
        let line = change
            .start_line
            .saturating_sub(1)
            .min(self.buffer.line_count());

        let indent = if !change.preserve_indentation {
            String::new()
        } else if line > 0 {
            indentation_of(self.buffer.line(line - 1)).to_string()
        } else {
            detect_indent(self.buffer.as_str())
        };

        let lines = apply_indentation(text, &indent);
        let point = self.buffer.insertion_point(line);
        let splice = Splice::insertion(point.offset, point.render(&lines.join("\n")));
        self.commit(splice)?;

        Ok(Applied::Inserted {
            line,
            lines: lines.len(),
        })
    }

    fn locate(&self, change: &ChangeRequest, pattern: &str) -> Result<MatchSpan, EditError> {
        let not_found = |hint| EditError::NoMatch {
            occurrence: change.match_occurrence,
            start_line: change.start_line,
            hint,
        };

        if change.use_regex {
            let regex = matcher::compile(pattern)?;
            matcher::find_regex(&self.buffer, &regex, change.match_occurrence)
                .map(MatchSpan::Bytes)
                .ok_or_else(|| not_found(None))
        } else {
            matcher::find_plain(
                &self.buffer,
                pattern,
                change.ignore_leading_whitespace,
                change.start_line,
                change.match_occurrence,
            )
            .map(MatchSpan::Lines)
            .ok_or_else(|| {
                not_found(matcher::closest_line_hint(
                    &self.buffer,
                    pattern,
                    change.start_line,
                ))
            })
        }
    }

    fn replace(
        &mut self,
        change: &ChangeRequest,
        span: MatchSpan,
        text: Option<&str>,
    ) -> Result<(), EditError> {
        let first_line = match &span {
            MatchSpan::Lines(lines) => lines.start,
            MatchSpan::Bytes(bytes) => self.buffer.line_of_offset(bytes.start),
        };
        let indent = if change.preserve_indentation {
            indentation_of(self.buffer.line(first_line))
        } else {
            ""
        };
        let replacement = text.map(|text| apply_indentation(text, indent).join("\n"));

        let splice = match (span, replacement) {
            (MatchSpan::Lines(lines), Some(replacement)) => {
                let range = self.buffer.replacement_range(lines);
                Splice::new(range.start, range.end, replacement)
            }
            (MatchSpan::Lines(lines), None) => {
                let range = self.buffer.removal_range(lines);
                Splice::new(range.start, range.end, "")
            }
            (MatchSpan::Bytes(range), replacement) => {
                Splice::new(range.start, range.end, replacement.unwrap_or_default())
            }
        };
        self.commit(splice)
    }

    /// Reject splices that overlap earlier writes, then apply and record.
    fn commit(&mut self, splice: Splice) -> Result<(), EditError> {
        let target = splice.range();
        if self.written.iter().any(|region| overlaps(region, &target)) {
            return Err(EditError::Overlap {
                byte_start: target.start,
                byte_end: target.end,
            });
        }

        let delta = splice.delta();
        let written = splice.apply(&mut self.buffer)?;

        for region in &mut self.written {
            if region.start >= target.end {
                region.start = region.start.saturating_add_signed(delta);
                region.end = region.end.saturating_add_signed(delta);
            }
        }
        self.written.push(written);
        Ok(())
    }
}

/// Whether two byte ranges share content. An empty range is a point and only
/// overlaps a range that strictly contains it.
fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    match (a.is_empty(), b.is_empty()) {
        (false, false) => a.start < b.end && b.start < a.end,
        (true, false) => b.start < a.start && a.start < b.end,
        (false, true) => a.start < b.start && b.start < a.end,
        (true, true) => false,
    }
}
