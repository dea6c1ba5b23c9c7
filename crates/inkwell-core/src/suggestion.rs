//! Proactive review suggestions.

use serde::{Deserialize, Serialize};

/// A proposed replacement for a paragraph the reviewer looked at.
///
/// Not tied to offsets: `original_text` is searched for literally when the
/// suggestion is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Replacement text.
    pub text: String,
    /// Short reason shown above the replacement.
    pub explanation: String,
    /// The paragraph as it was when reviewed; the match key on accept.
    pub original_text: String,
}

impl Suggestion {
    pub fn new(
        text: impl Into<String>,
        explanation: impl Into<String>,
        original_text: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            explanation: explanation.into(),
            original_text: original_text.into(),
        }
    }
}
