//! Accepting or dismissing the live suggestion.

use inkwell_core::{Applied, EditorEvent};

use crate::reviewer::DebouncedReviewer;
use crate::store::EditorStore;

/// Result of [`SuggestionApplier::accept`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// The original paragraph was found and replaced.
    Replaced,
    /// The original paragraph is gone; the suggestion was dropped.
    NotFound,
    /// There was no live suggestion.
    NoSuggestion,
}

pub struct SuggestionApplier {
    store: EditorStore,
    reviewer: DebouncedReviewer,
}

impl SuggestionApplier {
    pub fn new(store: EditorStore, reviewer: DebouncedReviewer) -> Self {
        Self { store, reviewer }
    }

    /// Replaces the first occurrence of the suggestion's original text.
    ///
    /// This is not a user edit, so it does not schedule a new review.
    pub fn accept(&self) -> AcceptOutcome {
        let outcome = self.store.update(|state| {
            let revision_before = state.document().revision();
            match state.apply(EditorEvent::SuggestionAccepted) {
                Applied::Changed if state.document().revision() != revision_before => {
                    AcceptOutcome::Replaced
                }
                Applied::Changed => AcceptOutcome::NotFound,
                Applied::Unchanged | Applied::Rejected(_) => AcceptOutcome::NoSuggestion,
            }
        });
        if outcome == AcceptOutcome::NotFound {
            tracing::debug!("[Suggestion] Original paragraph no longer present");
        }
        self.reviewer.suggestion_resolved();
        outcome
    }

    /// Drops the suggestion without touching the document.
    pub fn dismiss(&self) -> bool {
        let dismissed = self.store.apply(EditorEvent::SuggestionCleared).is_changed();
        self.reviewer.suggestion_resolved();
        dismissed
    }
}
