use serde::{Deserialize, Serialize};

use crate::error::{InkwellError, Result};

/// The text being edited.
///
/// Offsets are byte offsets into `content` and must fall on char boundaries.
/// `revision` increases on every mutation, including ones that leave the text
/// byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    content: String,
    revision: u64,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            revision: 0,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Replaces the whole text, as a keystroke in the editing surface does.
    pub fn replace_all(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.revision += 1;
    }

    /// Replaces the first literal occurrence of `needle` with `replacement`.
    ///
    /// Returns `false` and leaves the document untouched (revision included)
    /// when `needle` does not occur.
    pub fn replace_first(&mut self, needle: &str, replacement: &str) -> bool {
        let Some(at) = self.content.find(needle) else {
            return false;
        };
        self.content
            .replace_range(at..at + needle.len(), replacement);
        self.revision += 1;
        true
    }

    /// Replaces `[start, end)` with `text`.
    pub fn splice(&mut self, start: usize, end: usize, text: &str) -> Result<()> {
        self.check_range(start, end)?;
        self.content.replace_range(start..end, text);
        self.revision += 1;
        Ok(())
    }

    /// Returns the text in `[start, end)` if the range fits the document.
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        self.check_range(start, end).ok()?;
        self.content.get(start..end)
    }

    /// Clamps `offset` into the document and down onto a char boundary.
    pub fn clamp_offset(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.content.len());
        while !self.content.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        let len = self.content.len();
        if start > end
            || end > len
            || !self.content.is_char_boundary(start)
            || !self.content.is_char_boundary(end)
        {
            return Err(InkwellError::invalid_range(start, end, len));
        }
        Ok(())
    }
}
