//! Paragraph-under-cursor extraction.

/// A trimmed paragraph taken from the document at a cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// The paragraph text with surrounding whitespace removed.
    pub text: String,
    /// Byte offset of the start of the untrimmed line.
    pub line_start: usize,
    /// Byte offset one past the end of the untrimmed line.
    pub line_end: usize,
}

impl Paragraph {
    /// Length in chars, which is what review eligibility is measured in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the paragraph is long enough to be worth a review call.
    pub fn is_reviewable(&self, min_chars: usize) -> bool {
        self.char_len() > min_chars
    }
}

/// Returns the line containing `cursor`, trimmed.
///
/// Scans back to the nearest preceding `\n` (or the start) and forward to the
/// nearest following `\n` (or the end). A cursor past the end or inside a
/// multi-byte char is clamped down first.
pub fn paragraph_at(content: &str, cursor: usize) -> Paragraph {
    let mut cursor = cursor.min(content.len());
    while !content.is_char_boundary(cursor) {
        cursor -= 1;
    }

    let line_start = content[..cursor].rfind('\n').map_or(0, |i| i + 1);
    let line_end = content[cursor..]
        .find('\n')
        .map_or(content.len(), |i| cursor + i);

    Paragraph {
        text: content[line_start..line_end].trim().to_string(),
        line_start,
        line_end,
    }
}
