#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use inkwell_core::{DraftRequest, GatewayError, ModelGateway, ReviewVerdict, RewriteRequest};
use tokio::sync::Notify;

/// Over the 50-char review threshold.
pub const LONG_PARAGRAPH: &str =
    "The quarterly results exceeded every forecast we had made in the spring.";

/// Scripted gateway with call counters and optional gates.
#[derive(Default)]
pub struct MockGateway {
    pub review_calls: AtomicUsize,
    pub reviews_completed: AtomicUsize,
    pub reviewed: Mutex<Vec<String>>,
    verdicts: Mutex<VecDeque<ReviewVerdict>>,
    review_gate: Option<Arc<Notify>>,

    pub rewrite_requests: Mutex<Vec<RewriteRequest>>,
    rewrite_reply: Option<Result<String, GatewayError>>,
    rewrite_gate: Option<Arc<Notify>>,

    pub draft_calls: AtomicUsize,
    pub drafts: Mutex<Vec<DraftRequest>>,
    draft_error: Option<GatewayError>,
    draft_delays: HashMap<String, Duration>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verdicts returned by successive reviews; afterwards, no suggestion.
    pub fn with_verdicts(mut self, verdicts: impl IntoIterator<Item = ReviewVerdict>) -> Self {
        self.verdicts = Mutex::new(verdicts.into_iter().collect());
        self
    }

    /// Reviews block until the returned gate is notified (once per review).
    pub fn gate_reviews(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.review_gate = Some(gate.clone());
        (self, gate)
    }

    pub fn with_rewrite_reply(mut self, reply: Result<String, GatewayError>) -> Self {
        self.rewrite_reply = Some(reply);
        self
    }

    pub fn gate_rewrites(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.rewrite_gate = Some(gate.clone());
        (self, gate)
    }

    pub fn failing_drafts(mut self) -> Self {
        self.draft_error = Some(GatewayError::transport("connection reset"));
        self
    }

    /// Delays the reply to `prompt` by `delay`.
    pub fn with_draft_delay(mut self, prompt: &str, delay: Duration) -> Self {
        self.draft_delays.insert(prompt.to_string(), delay);
        self
    }

    pub fn review_calls(&self) -> usize {
        self.review_calls.load(Ordering::SeqCst)
    }

    pub fn draft_calls(&self) -> usize {
        self.draft_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn generate_draft(&self, request: DraftRequest) -> Result<String, GatewayError> {
        self.draft_calls.fetch_add(1, Ordering::SeqCst);
        self.drafts.lock().unwrap().push(request.clone());
        if let Some(delay) = self.draft_delays.get(&request.prompt) {
            tokio::time::sleep(*delay).await;
        }
        match &self.draft_error {
            Some(err) => Err(err.clone()),
            None => Ok(format!("reply to {}", request.prompt)),
        }
    }

    async fn rewrite(&self, request: RewriteRequest) -> Result<String, GatewayError> {
        self.rewrite_requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.rewrite_gate {
            gate.notified().await;
        }
        self.rewrite_reply
            .clone()
            .unwrap_or_else(|| Ok(request.selection.to_uppercase()))
    }

    async fn review(&self, paragraph: &str) -> ReviewVerdict {
        self.review_calls.fetch_add(1, Ordering::SeqCst);
        self.reviewed.lock().unwrap().push(paragraph.to_string());
        if let Some(gate) = &self.review_gate {
            gate.notified().await;
        }
        self.reviews_completed.fetch_add(1, Ordering::SeqCst);
        self.verdicts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default()
    }
}

/// Lets spawned tasks run without moving virtual time past any timer of
/// interest.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
