//! Editor state and its named transitions.
//!
//! Everything the editing surface renders lives in [`EditorState`]. It is only
//! ever changed by applying an [`EditorEvent`], so every mutation of the
//! document goes through one place and the suggestion invalidation rules are
//! enforced here rather than by each caller.

use serde::{Deserialize, Serialize};

use crate::document::{Anchor, Document, Selection};
use crate::error::InkwellError;
use crate::suggestion::Suggestion;

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A user-visible alert raised by a pipeline the user is waiting on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// A transition of [`EditorState`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The user typed: the whole text is replaced and the caret moved.
    Edited { content: String, cursor: usize },
    /// A drag-selection ended over `[start, end)`. An empty range clears the
    /// current selection.
    Selected {
        start: usize,
        end: usize,
        anchor: Anchor,
    },
    SelectionCleared,
    SuggestionOffered(Suggestion),
    SuggestionCleared,
    /// Replace the first occurrence of the live suggestion's original text.
    SuggestionAccepted,
    /// Replace `[start, end)` with `text`.
    Spliced {
        start: usize,
        end: usize,
        text: String,
    },
    ReviewStarted,
    ReviewFinished,
    RewriteStarted,
    RewriteFinished,
    Notified(Notification),
    NotificationDismissed,
}

/// What applying an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// State changed.
    Changed,
    /// Nothing to do; state untouched.
    Unchanged,
    /// The event did not fit the current state; state untouched.
    Rejected(InkwellError),
}

impl Applied {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    document: Document,
    cursor: usize,
    selection: Option<Selection>,
    suggestion: Option<Suggestion>,
    notification: Option<Notification>,
    reviews_in_flight: usize,
    rewrites_in_flight: usize,
}

impl EditorState {
    pub fn new(content: impl Into<String>) -> Self {
        let document = Document::new(content);
        let cursor = document.len();
        Self {
            document,
            cursor,
            ..Self::default()
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn content(&self) -> &str {
        self.document.content()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn suggestion(&self) -> Option<&Suggestion> {
        self.suggestion.as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn is_reviewing(&self) -> bool {
        self.reviews_in_flight > 0
    }

    pub fn is_rewriting(&self) -> bool {
        self.rewrites_in_flight > 0
    }

    /// Pure form of [`EditorState::apply`].
    pub fn reduce(mut self, event: EditorEvent) -> Self {
        self.apply(event);
        self
    }

    /// Applies `event` in place and reports the outcome.
    pub fn apply(&mut self, event: EditorEvent) -> Applied {
        match event {
            EditorEvent::Edited { content, cursor } => {
                self.document.replace_all(content);
                self.cursor = self.document.clamp_offset(cursor);
                self.suggestion = None;
                Applied::Changed
            }
            EditorEvent::Selected { start, end, anchor } => self.select(start, end, anchor),
            EditorEvent::SelectionCleared => Self::changed_if(self.selection.take().is_some()),
            EditorEvent::SuggestionOffered(suggestion) => {
                self.suggestion = Some(suggestion);
                Applied::Changed
            }
            EditorEvent::SuggestionCleared => Self::changed_if(self.suggestion.take().is_some()),
            EditorEvent::SuggestionAccepted => {
                let Some(suggestion) = self.suggestion.take() else {
                    return Applied::Unchanged;
                };
                // The suggestion is consumed whether or not its paragraph is
                // still there.
                self.document
                    .replace_first(&suggestion.original_text, &suggestion.text);
                Applied::Changed
            }
            EditorEvent::Spliced { start, end, text } => {
                match self.document.splice(start, end, &text) {
                    Ok(()) => {
                        self.suggestion = None;
                        self.cursor = self.document.clamp_offset(start + text.len());
                        Applied::Changed
                    }
                    Err(err) => Applied::Rejected(err),
                }
            }
            EditorEvent::ReviewStarted => {
                self.reviews_in_flight += 1;
                Applied::Changed
            }
            EditorEvent::ReviewFinished => {
                Self::changed_if(Self::decrement(&mut self.reviews_in_flight))
            }
            EditorEvent::RewriteStarted => {
                self.rewrites_in_flight += 1;
                Applied::Changed
            }
            EditorEvent::RewriteFinished => {
                Self::changed_if(Self::decrement(&mut self.rewrites_in_flight))
            }
            EditorEvent::Notified(notification) => {
                self.notification = Some(notification);
                Applied::Changed
            }
            EditorEvent::NotificationDismissed => {
                Self::changed_if(self.notification.take().is_some())
            }
        }
    }

    fn select(&mut self, start: usize, end: usize, anchor: Anchor) -> Applied {
        let (start, end) = (start.min(end), start.max(end));
        if start == end {
            return Self::changed_if(self.selection.take().is_some());
        }
        let Some(text) = self.document.slice(start, end) else {
            return Applied::Rejected(InkwellError::invalid_range(
                start,
                end,
                self.document.len(),
            ));
        };
        if text.trim().is_empty() {
            return Applied::Unchanged;
        }
        self.selection = Some(Selection::new(text, start, end, anchor));
        Applied::Changed
    }

    fn decrement(counter: &mut usize) -> bool {
        if *counter == 0 {
            return false;
        }
        *counter -= 1;
        true
    }

    fn changed_if(changed: bool) -> Applied {
        if changed {
            Applied::Changed
        } else {
            Applied::Unchanged
        }
    }
}
