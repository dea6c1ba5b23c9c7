use serde::{Deserialize, Serialize};

use crate::error::{InkwellError, Result};

/// File extensions the chat panel accepts.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "md", "pdf"];

/// A file attached to a chat turn.
///
/// `content` is always decoded text. Binary formats are decoded lossily and
/// will come out garbled; no format-specific extraction is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub name: String,
    /// Declared MIME type (e.g. `text/markdown`).
    #[serde(rename = "type")]
    pub mime_type: String,
    pub content: String,
}

impl FileAttachment {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    /// Builds an attachment from raw bytes, rejecting unsupported extensions.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();
        if !Self::is_accepted(&name) {
            return Err(InkwellError::UnsupportedAttachment {
                name,
                accepted: ACCEPTED_EXTENSIONS
                    .iter()
                    .map(|ext| format!(".{ext}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        Ok(Self {
            name,
            mime_type: mime_type.into(),
            content: String::from_utf8_lossy(bytes).into_owned(),
        })
    }

    /// Whether `name` has one of the [`ACCEPTED_EXTENSIONS`] (case-insensitive).
    pub fn is_accepted(name: &str) -> bool {
        std::path::Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ACCEPTED_EXTENSIONS
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(ext))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_extensions() {
        assert!(FileAttachment::is_accepted("notes.md"));
        assert!(FileAttachment::is_accepted("NOTES.TXT"));
        assert!(FileAttachment::is_accepted("paper.pdf"));
        assert!(!FileAttachment::is_accepted("image.png"));
        assert!(!FileAttachment::is_accepted("README"));
    }

    #[test]
    fn test_from_bytes_decodes_lossily() {
        let attachment =
            FileAttachment::from_bytes("paper.pdf", "application/pdf", b"%PDF\xff\xfe").unwrap();
        assert!(attachment.content.starts_with("%PDF"));
        assert!(attachment.content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_from_bytes_rejects_unsupported() {
        let err = FileAttachment::from_bytes("photo.jpg", "image/jpeg", b"").unwrap_err();
        assert!(matches!(err, InkwellError::UnsupportedAttachment { .. }));
        assert!(err.to_string().contains(".txt, .md, .pdf"));
    }
}
