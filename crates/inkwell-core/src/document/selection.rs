use serde::{Deserialize, Serialize};

/// Screen position used to float the rewrite toolbar next to a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub top: f32,
    pub left: f32,
}

/// A live drag-selection.
///
/// `start` and `end` are byte offsets valid against the document as it was
/// when the selection was made; later edits do not update them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub anchor: Anchor,
}

impl Selection {
    pub fn new(text: impl Into<String>, start: usize, end: usize, anchor: Anchor) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            anchor,
        }
    }
}
