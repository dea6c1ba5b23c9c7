//! The single owner of [`EditorState`].
//!
//! All mutations go through [`EditorStore::apply`] (or one of the guarded
//! variants), which runs the reducer under the channel lock and notifies
//! subscribers when something changed. The lock is never held across an
//! `.await`.

use std::sync::Arc;

use inkwell_core::document::Selection;
use inkwell_core::{Applied, EditorEvent, EditorState};
use tokio::sync::watch;

#[derive(Clone)]
pub struct EditorStore {
    tx: Arc<watch::Sender<EditorState>>,
}

impl EditorStore {
    pub fn new(initial: EditorState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Applies `event` and notifies subscribers if the state changed.
    pub fn apply(&self, event: EditorEvent) -> Applied {
        let mut outcome = Applied::Unchanged;
        self.tx.send_if_modified(|state| {
            outcome = state.apply(event);
            outcome.is_changed()
        });
        outcome
    }

    /// Applies `event` only if `guard` holds for the current state, checked
    /// under the same lock. Returns `None` when the guard rejected it.
    pub fn apply_if(
        &self,
        guard: impl FnOnce(&EditorState) -> bool,
        event: EditorEvent,
    ) -> Option<Applied> {
        let mut outcome = None;
        self.tx.send_if_modified(|state| {
            if !guard(state) {
                return false;
            }
            let applied = state.apply(event);
            let changed = applied.is_changed();
            outcome = Some(applied);
            changed
        });
        outcome
    }

    /// Runs `f` against the state under the lock and notifies subscribers
    /// unconditionally. For multi-step transitions that must be atomic.
    pub fn update<R>(&self, f: impl FnOnce(&mut EditorState) -> R) -> R {
        let mut result = None;
        self.tx.send_modify(|state| result = Some(f(state)));
        result.expect("send_modify runs the closure exactly once")
    }

    /// Removes and returns the live selection.
    pub fn take_selection(&self) -> Option<Selection> {
        let mut taken = None;
        self.tx.send_if_modified(|state| {
            taken = state.selection().cloned();
            state.apply(EditorEvent::SelectionCleared).is_changed()
        });
        taken
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> EditorState {
        self.tx.borrow().clone()
    }

    pub fn content(&self) -> String {
        self.tx.borrow().content().to_string()
    }

    /// Reads the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&EditorState) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver that observes every change.
    pub fn subscribe(&self) -> watch::Receiver<EditorState> {
        self.tx.subscribe()
    }
}

/// Applies `finish` when dropped, so an in-flight indicator is cleared even
/// if the awaiting future is cancelled.
pub(crate) struct IndicatorGuard {
    store: EditorStore,
    finish: Option<EditorEvent>,
}

impl IndicatorGuard {
    pub(crate) fn start(store: &EditorStore, start: EditorEvent, finish: EditorEvent) -> Self {
        store.apply(start);
        Self {
            store: store.clone(),
            finish: Some(finish),
        }
    }
}

impl Drop for IndicatorGuard {
    fn drop(&mut self) {
        if let Some(finish) = self.finish.take() {
            self.store.apply(finish);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::Suggestion;

    #[test]
    fn test_apply_notifies_only_on_change() {
        let store = EditorStore::new(EditorState::new("text"));
        let mut rx = store.subscribe();

        assert_eq!(store.apply(EditorEvent::SuggestionCleared), Applied::Unchanged);
        assert!(!rx.has_changed().unwrap());

        store.apply(EditorEvent::Edited {
            content: "text!".into(),
            cursor: 5,
        });
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().content(), "text!");
    }

    #[test]
    fn test_apply_if_respects_guard() {
        let store = EditorStore::new(EditorState::new("abc"));
        let offer = EditorEvent::SuggestionOffered(Suggestion::new("x", "", "abc"));

        assert_eq!(store.apply_if(|s| s.content() == "other", offer.clone()), None);
        assert!(store.snapshot().suggestion().is_none());

        assert_eq!(
            store.apply_if(|s| s.content() == "abc", offer),
            Some(Applied::Changed)
        );
        assert!(store.snapshot().suggestion().is_some());
    }

    #[test]
    fn test_take_selection_clears_it() {
        let store = EditorStore::new(EditorState::new("Hello world"));
        store.apply(EditorEvent::Selected {
            start: 0,
            end: 5,
            anchor: Default::default(),
        });
        assert_eq!(store.take_selection().unwrap().text, "Hello");
        assert!(store.snapshot().selection().is_none());
        assert!(store.take_selection().is_none());
    }

    #[test]
    fn test_indicator_guard_finishes_on_drop() {
        let store = EditorStore::new(EditorState::default());
        {
            let _guard =
                IndicatorGuard::start(&store, EditorEvent::RewriteStarted, EditorEvent::RewriteFinished);
            assert!(store.snapshot().is_rewriting());
        }
        assert!(!store.snapshot().is_rewriting());
    }
}
