//! Canonical in-memory text buffer for an edit session.
//!
//! The buffer owns a single flat `String` and a line-start index derived from
//! it. Lines are the `\n`-separated pieces of the text, so a buffer always has
//! at least one (possibly empty) line and a trailing newline produces a final
//! empty line. The index is rebuilt after every mutation; there is no second
//! representation to keep in sync.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    /// Byte offset of the first character of each line.
    line_starts: Vec<usize>,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = index_lines(&text);
        Self { text, line_starts }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of lines; never zero.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Content of line `index` (0-based) without its newline.
    pub fn line(&self, index: usize) -> Option<&str> {
        if index >= self.line_count() {
            return None;
        }
        Some(&self.text[self.line_start(index)..self.line_end(index)])
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.text.split('\n')
    }

    /// Byte offset where line `index` starts. `index == line_count()` maps to
    /// the end of the buffer.
    pub fn line_start(&self, index: usize) -> usize {
        self.line_starts
            .get(index)
            .copied()
            .unwrap_or(self.text.len())
    }

    /// Byte offset just past the content of line `index`, excluding its `\n`.
    pub fn line_end(&self, index: usize) -> usize {
        match self.line_starts.get(index + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        }
    }

    /// 0-based index of the line containing byte `offset`.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(insert_at) => insert_at.saturating_sub(1),
        }
    }

    /// Byte range that, when replaced by the `\n`-joined replacement lines,
    /// has the same effect as replacing lines `lines` in a line array.
    ///
    /// Requires a non-empty line range; an empty range is an insertion, see
    /// [`TextBuffer::insertion_point`].
    pub fn replacement_range(&self, lines: Range<usize>) -> Range<usize> {
        debug_assert!(lines.start < lines.end && lines.end <= self.line_count());
        self.line_start(lines.start)..self.line_end(lines.end - 1)
    }

    /// Byte range whose removal has the same effect as deleting lines `lines`
    /// from a line array, separators included.
    pub fn removal_range(&self, lines: Range<usize>) -> Range<usize> {
        debug_assert!(lines.start < lines.end && lines.end <= self.line_count());
        if lines.end < self.line_count() {
            self.line_start(lines.start)..self.line_start(lines.end)
        } else if lines.start > 0 {
            // Trailing lines: drop the separator that precedes them instead.
            self.line_end(lines.start - 1)..self.text.len()
        } else {
            0..self.text.len()
        }
    }

    /// Byte offset and separator placement for inserting whole lines before
    /// line `index`. `index == line_count()` appends after the last line.
    pub fn insertion_point(&self, index: usize) -> InsertionPoint {
        if index < self.line_count() {
            InsertionPoint {
                offset: self.line_start(index),
                separator: Separator::After,
            }
        } else {
            InsertionPoint {
                offset: self.text.len(),
                separator: Separator::Before,
            }
        }
    }

    /// Replace `range` with `text` and rebuild the line index.
    ///
    /// Callers validate the range first; see [`crate::edit::Splice::apply`].
    pub(crate) fn replace_range(&mut self, range: Range<usize>, text: &str) {
        self.text.replace_range(range, text);
        self.line_starts = index_lines(&self.text);
    }
}

/// Where inserted lines go and which side of them needs a `\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    pub offset: usize,
    pub separator: Separator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// Inserted before an existing line: the new block ends with `\n`.
    After,
    /// Appended after the last line: the new block starts with `\n`.
    Before,
}

impl InsertionPoint {
    pub fn render(&self, joined_lines: &str) -> String {
        match self.separator {
            Separator::After => format!("{joined_lines}\n"),
            Separator::Before => format!("\n{joined_lines}"),
        }
    }
}

fn index_lines(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(idx, _)| idx + 1))
        .collect()
}
