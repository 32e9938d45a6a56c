use crate::buffer::TextBuffer;
use crate::error::EditError;
use std::ops::Range;
use xxhash_rust::xxh3::xxh3_64;

/// The fundamental edit primitive: a byte-span replacement.
///
/// Insertions, line replacements, deletions and regex substitutions all
/// compile down to this single primitive. Intelligence lives in span
/// acquisition (the matcher), not in application.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Splice does nothing until apply() is called"]
pub struct Splice {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// New text to put at [byte_start, byte_end)
    pub new_text: String,
}

/// Fingerprint of a file's content as it was read.
///
/// A session takes one right after reading and checks it against the file
/// again just before writing, so a concurrent change on disk is never
/// overwritten with a result computed from stale content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    /// Exact text match required
    ExactMatch(String),
    /// xxh3 hash of expected text (cheaper to hold for large files)
    Hash(u64),
}

impl EditVerification {
    /// Check if the provided text matches the verification criteria.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => text == expected,
            EditVerification::Hash(expected_hash) => xxh3_64(text.as_bytes()) == *expected_hash,
        }
    }

    /// Create verification from text, using hash for text over 1KB.
    pub fn from_text(text: &str) -> Self {
        if text.len() > 1024 {
            EditVerification::Hash(xxh3_64(text.as_bytes()))
        } else {
            EditVerification::ExactMatch(text.to_string())
        }
    }
}

impl Splice {
    pub fn new(byte_start: usize, byte_end: usize, new_text: impl Into<String>) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
        }
    }

    /// Splice that puts `new_text` at `offset` without removing anything.
    pub fn insertion(offset: usize, new_text: impl Into<String>) -> Self {
        Self::new(offset, offset, new_text)
    }

    pub fn range(&self) -> Range<usize> {
        self.byte_start..self.byte_end
    }

    /// Range the new text occupies once applied.
    pub fn written_range(&self) -> Range<usize> {
        self.byte_start..self.byte_start + self.new_text.len()
    }

    /// Signed change in buffer length caused by applying this splice.
    pub fn delta(&self) -> isize {
        self.new_text.len() as isize - (self.byte_end - self.byte_start) as isize
    }

    /// Validate the splice range against the current buffer contents.
    fn validate(&self, content: &str) -> Result<(), EditError> {
        if self.byte_start > self.byte_end
            || self.byte_end > content.len()
            || !content.is_char_boundary(self.byte_start)
            || !content.is_char_boundary(self.byte_end)
        {
            return Err(EditError::InvalidRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                len: content.len(),
            });
        }
        Ok(())
    }

    /// Apply this splice to the buffer.
    ///
    /// The buffer is untouched unless validation passes. Returns the range
    /// now occupied by the new text.
    pub fn apply(self, buffer: &mut TextBuffer) -> Result<Range<usize>, EditError> {
        self.validate(buffer.as_str())?;
        let written = self.written_range();
        buffer.replace_range(self.range(), &self.new_text);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_verification_exact_match() {
        let verify = EditVerification::ExactMatch("hello world".to_string());
        assert!(verify.matches("hello world"));
        assert!(!verify.matches("hello"));
    }

    #[test]
    fn test_edit_verification_hash() {
        let text = "hello world";
        let verify = EditVerification::Hash(xxh3_64(text.as_bytes()));
        assert!(verify.matches(text));
        assert!(!verify.matches("goodbye world"));
    }

    #[test]
    fn test_edit_verification_from_text_large() {
        let text = "x".repeat(2000);
        let verify = EditVerification::from_text(&text);
        assert!(matches!(verify, EditVerification::Hash(_)));
        assert!(verify.matches(&text));
        assert!(!verify.matches(&"x".repeat(2001)));
        assert!(matches!(
            EditVerification::from_text("small"),
            EditVerification::ExactMatch(_)
        ));
    }

    #[test]
    fn test_splice_applies_and_reports_written_range() {
        let mut buffer = TextBuffer::new("hello world");
        let written = Splice::new(0, 5, "HOWDY").apply(&mut buffer).unwrap();
        assert_eq!(buffer.as_str(), "HOWDY world");
        assert_eq!(written, 0..5);
    }

    #[test]
    fn test_splice_invalid_range_leaves_buffer_untouched() {
        let mut buffer = TextBuffer::new("hello world");
        let result = Splice::new(5, 20, "x").apply(&mut buffer);
        assert!(matches!(result, Err(EditError::InvalidRange { .. })));

        let result = Splice::new(10, 5, "x").apply(&mut buffer);
        assert!(matches!(result, Err(EditError::InvalidRange { .. })));
        assert_eq!(buffer.as_str(), "hello world");
    }

    #[test]
    fn test_splice_rejects_non_char_boundary() {
        let mut buffer = TextBuffer::new("héllo");
        let result = Splice::new(0, 2, "x").apply(&mut buffer);
        assert!(matches!(result, Err(EditError::InvalidRange { .. })));
        assert_eq!(buffer.as_str(), "héllo");
    }

    #[test]
    fn test_insertion_and_delta() {
        let mut buffer = TextBuffer::new("line1\nline2\n");
        let splice = Splice::insertion(6, "new\n");
        assert_eq!(splice.delta(), 4);
        assert_eq!(splice.apply(&mut buffer).unwrap(), 6..10);
        assert_eq!(buffer.as_str(), "line1\nnew\nline2\n");

        let splice = Splice::new(10, 15, "L2");
        assert_eq!(splice.delta(), -3);
        assert_eq!(splice.written_range(), 10..12);
    }
}
