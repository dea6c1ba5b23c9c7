//! One editing session: the document, its reviewer and the chat beside it.

use std::sync::Arc;

use inkwell_core::conversation::FileAttachment;
use inkwell_core::document::Anchor;
use inkwell_core::error::Result;
use inkwell_core::{Applied, EditorEvent, EditorState, InkwellConfig, ModelGateway};
use tokio::sync::watch;

use crate::conversation::{ConversationSession, SendOutcome};
use crate::reviewer::{DebouncedReviewer, ReviewPhase};
use crate::selection_rewriter::{RewriteInstruction, RewriteOutcome, SelectionRewriter};
use crate::store::EditorStore;
use crate::suggestion_applier::{AcceptOutcome, SuggestionApplier};

/// Entry point for a UI.
///
/// Every method that can start a timer or a request must be called from
/// within a tokio runtime.
pub struct WriterSession {
    store: EditorStore,
    reviewer: DebouncedReviewer,
    applier: SuggestionApplier,
    rewriter: SelectionRewriter,
    conversation: ConversationSession,
}

impl WriterSession {
    pub fn new(gateway: Arc<dyn ModelGateway>, config: &InkwellConfig) -> Self {
        Self::with_content(gateway, config, "")
    }

    pub fn with_content(
        gateway: Arc<dyn ModelGateway>,
        config: &InkwellConfig,
        content: impl Into<String>,
    ) -> Self {
        let store = EditorStore::new(EditorState::new(content));
        let reviewer = DebouncedReviewer::new(store.clone(), gateway.clone(), config.review.clone());
        Self {
            applier: SuggestionApplier::new(store.clone(), reviewer.clone()),
            rewriter: SelectionRewriter::new(store.clone(), gateway.clone(), config.rewrite.clone()),
            conversation: ConversationSession::new(gateway),
            reviewer,
            store,
        }
    }

    /// Replaces the document with what the user typed and restarts the
    /// review quiet period.
    pub fn edit(&self, content: impl Into<String>, cursor: usize) {
        let content = content.into();
        self.store.apply(EditorEvent::Edited {
            content: content.clone(),
            cursor,
        });
        let cursor = self.store.with_state(|s| s.cursor());
        self.reviewer.content_changed(content, cursor);
    }

    /// Sets the live selection. An empty range clears it; whitespace-only
    /// text leaves the previous selection in place.
    pub fn select(&self, start: usize, end: usize, anchor: Anchor) -> Result<()> {
        match self.store.apply(EditorEvent::Selected { start, end, anchor }) {
            Applied::Rejected(err) => Err(err),
            Applied::Changed | Applied::Unchanged => Ok(()),
        }
    }

    pub fn clear_selection(&self) {
        self.store.apply(EditorEvent::SelectionCleared);
    }

    pub fn accept_suggestion(&self) -> AcceptOutcome {
        self.applier.accept()
    }

    pub fn dismiss_suggestion(&self) -> bool {
        self.applier.dismiss()
    }

    pub async fn rewrite_selection(
        &self,
        instruction: impl Into<RewriteInstruction>,
    ) -> Result<RewriteOutcome> {
        self.rewriter.rewrite(instruction).await
    }

    /// Sends a chat turn with a snapshot of the current document.
    pub async fn send_message(&self, text: &str, attachments: Vec<FileAttachment>) -> SendOutcome {
        let document = self.document_context();
        self.conversation.send(text, attachments, document).await
    }

    /// Sends a chat turn with the staged files.
    pub async fn send_staged(&self, text: &str) -> SendOutcome {
        let document = self.document_context();
        self.conversation.send_staged(text, document).await
    }

    pub fn dismiss_notification(&self) {
        self.store.apply(EditorEvent::NotificationDismissed);
    }

    pub fn state(&self) -> EditorState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<EditorState> {
        self.store.subscribe()
    }

    pub fn review_phase(&self) -> ReviewPhase {
        self.reviewer.phase()
    }

    pub fn conversation(&self) -> &ConversationSession {
        &self.conversation
    }

    fn document_context(&self) -> Option<String> {
        let content = self.store.content();
        (!content.is_empty()).then_some(content)
    }
}
