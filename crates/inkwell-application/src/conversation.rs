//! Chat transcript and the draft-generation round trip.

use std::sync::{Arc, Mutex, MutexGuard};

use inkwell_core::conversation::{CHAT_FALLBACK_REPLY, FileAttachment, Message};
use inkwell_core::{DraftRequest, ModelGateway};
use serde::Serialize;
use tokio::sync::watch;

/// Append-only list of chat messages plus the typing indicator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    pub messages: Vec<Message>,
    /// Sends whose reply has not arrived yet.
    pub replies_pending: usize,
}

impl Transcript {
    pub fn is_typing(&self) -> bool {
        self.replies_pending > 0
    }
}

/// Result of [`ConversationSession::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank text without attachments; nothing was appended or sent.
    Rejected,
    Replied(Message),
    /// Generation failed and the fallback reply was appended.
    Failed(Message),
}

pub struct ConversationSession {
    gateway: Arc<dyn ModelGateway>,
    transcript: watch::Sender<Transcript>,
    staged: Mutex<Vec<FileAttachment>>,
}

impl ConversationSession {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        let (transcript, _rx) = watch::channel(Transcript::default());
        Self {
            gateway,
            transcript,
            staged: Mutex::new(Vec::new()),
        }
    }

    /// Sends a chat turn and appends the reply once it arrives.
    ///
    /// `document` is the editor content at send time. Concurrent sends are
    /// independent; replies land in the order they complete.
    pub async fn send(
        &self,
        text: &str,
        attachments: Vec<FileAttachment>,
        document: Option<String>,
    ) -> SendOutcome {
        if text.trim().is_empty() && attachments.is_empty() {
            return SendOutcome::Rejected;
        }

        let request = DraftRequest {
            prompt: text.to_string(),
            context: document,
            files: attachments.clone(),
        };
        self.transcript.send_modify(|t| {
            t.messages.push(Message::user(text, attachments));
            t.replies_pending += 1;
        });
        let _pending = PendingReply {
            transcript: &self.transcript,
        };
        tracing::debug!(
            prompt_chars = request.prompt.chars().count(),
            files = request.files.len(),
            "[Conversation] Generating reply"
        );

        let result = self.gateway.generate_draft(request).await;
        let reply = match &result {
            Ok(text) => Message::model(text.as_str()),
            Err(err) => {
                tracing::warn!("[Conversation] Draft generation failed: {err}");
                Message::model(CHAT_FALLBACK_REPLY)
            }
        };
        self.transcript
            .send_modify(|t| t.messages.push(reply.clone()));

        if result.is_ok() {
            SendOutcome::Replied(reply)
        } else {
            SendOutcome::Failed(reply)
        }
    }

    /// Adds a file to the next [`send_staged`](Self::send_staged).
    pub fn stage_attachment(&self, attachment: FileAttachment) {
        self.lock_staged().push(attachment);
    }

    /// Removes the staged file at `index`, if any.
    pub fn unstage_attachment(&self, index: usize) -> Option<FileAttachment> {
        let mut staged = self.lock_staged();
        (index < staged.len()).then(|| staged.remove(index))
    }

    pub fn staged_attachments(&self) -> Vec<FileAttachment> {
        self.lock_staged().clone()
    }

    /// Sends with the staged files. The stage is cleared only if the send is
    /// accepted.
    pub async fn send_staged(&self, text: &str, document: Option<String>) -> SendOutcome {
        let attachments = {
            let mut staged = self.lock_staged();
            if text.trim().is_empty() && staged.is_empty() {
                return SendOutcome::Rejected;
            }
            std::mem::take(&mut *staged)
        };
        self.send(text, attachments, document).await
    }

    pub fn messages(&self) -> Vec<Message> {
        self.transcript.borrow().messages.clone()
    }

    pub fn is_typing(&self) -> bool {
        self.transcript.borrow().is_typing()
    }

    pub fn subscribe(&self) -> watch::Receiver<Transcript> {
        self.transcript.subscribe()
    }

    fn lock_staged(&self) -> MutexGuard<'_, Vec<FileAttachment>> {
        self.staged.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Decrements `replies_pending` when the send finishes or is dropped.
struct PendingReply<'a> {
    transcript: &'a watch::Sender<Transcript>,
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        self.transcript
            .send_modify(|t| t.replies_pending = t.replies_pending.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use inkwell_core::conversation::MessageRole;
    use inkwell_core::{GatewayError, ReviewVerdict, RewriteRequest};

    struct EchoGateway;

    #[async_trait]
    impl ModelGateway for EchoGateway {
        async fn generate_draft(&self, request: DraftRequest) -> Result<String, GatewayError> {
            Ok(format!("echo: {} ({} files)", request.prompt, request.files.len()))
        }

        async fn rewrite(&self, request: RewriteRequest) -> Result<String, GatewayError> {
            Ok(request.selection)
        }

        async fn review(&self, _paragraph: &str) -> ReviewVerdict {
            ReviewVerdict::no_suggestion()
        }
    }

    fn session() -> ConversationSession {
        ConversationSession::new(Arc::new(EchoGateway))
    }

    #[tokio::test]
    async fn test_send_appends_user_then_model() {
        let session = session();
        let outcome = session.send("hi", Vec::new(), None).await;

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].content, "echo: hi (0 files)");
        assert_eq!(outcome, SendOutcome::Replied(messages[1].clone()));
        assert!(!session.is_typing());
    }

    #[tokio::test]
    async fn test_attachment_only_send_is_accepted() {
        let session = session();
        let file = FileAttachment::new("a.txt", "text/plain", "data");
        let outcome = session.send("  ", vec![file], None).await;
        assert!(matches!(outcome, SendOutcome::Replied(_)));
        assert_eq!(session.messages()[0].attachments.len(), 1);
    }

    #[tokio::test]
    async fn test_staged_files_are_sent_and_cleared() {
        let session = session();
        session.stage_attachment(FileAttachment::new("a.txt", "text/plain", "a"));
        session.stage_attachment(FileAttachment::new("b.md", "text/markdown", "b"));
        assert_eq!(session.unstage_attachment(0).unwrap().name, "a.txt");
        assert!(session.unstage_attachment(5).is_none());

        session.send_staged("use this", None).await;
        assert!(session.staged_attachments().is_empty());
        assert_eq!(session.messages()[1].content, "echo: use this (1 files)");
    }

    #[tokio::test]
    async fn test_blank_send_with_empty_stage_is_rejected() {
        let session = session();
        assert_eq!(session.send_staged("", None).await, SendOutcome::Rejected);
        assert!(session.messages().is_empty());
        assert!(!session.is_typing());
    }
}
