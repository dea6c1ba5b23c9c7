//! Debounced proactive review.
//!
//! Every edit restarts a quiet-period timer. When the timer fires, the
//! paragraph under the cursor (as of the edit) is sent for review. The answer
//! is only turned into a suggestion if no edit happened since and the
//! document still holds exactly the text that was snapshotted; anything else
//! is dropped.
//!
//! An in-flight request is never aborted. A newer edit makes its answer stale,
//! and the staleness check throws it away.

use std::sync::{Arc, Mutex, MutexGuard};

use inkwell_core::config::ReviewConfig;
use inkwell_core::document::paragraph_at;
use inkwell_core::{EditorEvent, ModelGateway, Suggestion};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::store::{EditorStore, IndicatorGuard};

/// Where the reviewer is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPhase {
    /// Nothing scheduled.
    Idle,
    /// Waiting for the quiet period to elapse.
    Pending,
    /// A review request is outstanding.
    InFlight,
    /// The last review produced the live suggestion.
    Suggesting,
}

/// What a review cycle ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Paragraph too short, no request sent.
    Skipped,
    /// The document changed while the request was out.
    Stale,
    /// The service had nothing to suggest (or failed).
    NoSuggestion,
    Suggested(Suggestion),
}

struct ReviewerInner {
    /// Bumped on every edit; a timer or response from an older generation no
    /// longer owns the phase.
    generation: u64,
    timer: Option<JoinHandle<()>>,
    phase: ReviewPhase,
}

#[derive(Clone)]
pub struct DebouncedReviewer {
    store: EditorStore,
    gateway: Arc<dyn ModelGateway>,
    config: ReviewConfig,
    inner: Arc<Mutex<ReviewerInner>>,
}

impl DebouncedReviewer {
    pub fn new(store: EditorStore, gateway: Arc<dyn ModelGateway>, config: ReviewConfig) -> Self {
        Self {
            store,
            gateway,
            config,
            inner: Arc::new(Mutex::new(ReviewerInner {
                generation: 0,
                timer: None,
                phase: ReviewPhase::Idle,
            })),
        }
    }

    pub fn phase(&self) -> ReviewPhase {
        self.lock().phase
    }

    /// Restarts the quiet period for a new document state.
    ///
    /// Must be called from within a tokio runtime. The caller has already
    /// applied the edit to the store, which cleared any live suggestion.
    pub fn content_changed(&self, snapshot: String, cursor: usize) {
        let mut inner = self.lock();
        inner.generation += 1;
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
        inner.phase = ReviewPhase::Pending;

        let generation = inner.generation;
        let reviewer = self.clone();
        let quiet_period = self.config.debounce();
        inner.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            if !reviewer.is_current(generation) {
                return;
            }
            // Detached from the timer handle: aborting a later timer must not
            // cancel this request.
            tokio::spawn(async move {
                reviewer.review(generation, snapshot, cursor).await;
            });
        }));
        tracing::trace!(generation, "[Reviewer] Quiet period restarted");
    }

    /// Marks a live suggestion as resolved (accepted or dismissed).
    pub fn suggestion_resolved(&self) {
        let mut inner = self.lock();
        if inner.phase == ReviewPhase::Suggesting {
            inner.phase = ReviewPhase::Idle;
        }
    }

    /// Runs one review cycle for the document `snapshot` with the caret at
    /// `cursor`.
    pub(crate) async fn review(&self, generation: u64, snapshot: String, cursor: usize) -> ReviewOutcome {
        let paragraph = paragraph_at(&snapshot, cursor);
        if !paragraph.is_reviewable(self.config.min_paragraph_chars) {
            tracing::debug!(
                paragraph_chars = paragraph.char_len(),
                "[Reviewer] Paragraph too short, skipping review"
            );
            self.set_phase(generation, ReviewPhase::Idle);
            return ReviewOutcome::Skipped;
        }

        self.set_phase(generation, ReviewPhase::InFlight);
        let verdict = {
            let _reviewing =
                IndicatorGuard::start(&self.store, EditorEvent::ReviewStarted, EditorEvent::ReviewFinished);
            tracing::debug!(
                generation,
                paragraph_chars = paragraph.char_len(),
                "[Reviewer] Requesting review"
            );
            self.gateway.review(&paragraph.text).await
        };

        let Some(replacement) = verdict.replacement() else {
            // Stale or not, nothing would be shown.
            let stale = self.store.with_state(|s| s.content() != snapshot);
            self.set_phase(generation, ReviewPhase::Idle);
            return if stale {
                ReviewOutcome::Stale
            } else {
                ReviewOutcome::NoSuggestion
            };
        };

        let suggestion = Suggestion::new(
            replacement,
            verdict
                .explanation
                .clone()
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| self.config.default_explanation.clone()),
            paragraph.text,
        );

        // Lock order is store, then reviewer. Nothing takes them the other way.
        let offered = self.store.apply_if(
            |state| {
                let mut inner = self.lock();
                // An edit followed by a revert restores the content but not
                // the generation.
                let current = inner.generation == generation && state.content() == snapshot;
                if current {
                    inner.phase = ReviewPhase::Suggesting;
                }
                current
            },
            EditorEvent::SuggestionOffered(suggestion.clone()),
        );
        if offered.is_none() {
            tracing::debug!(generation, "[Reviewer] Document changed during review, discarding");
            self.set_phase(generation, ReviewPhase::Idle);
            return ReviewOutcome::Stale;
        }

        tracing::info!(generation, "[Reviewer] Suggestion ready");
        ReviewOutcome::Suggested(suggestion)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    /// Only the newest generation may move the phase.
    fn set_phase(&self, generation: u64, phase: ReviewPhase) {
        let mut inner = self.lock();
        if inner.generation == generation {
            inner.phase = phase;
        }
    }

    fn lock(&self) -> MutexGuard<'_, ReviewerInner> {
        // The guarded data stays consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
