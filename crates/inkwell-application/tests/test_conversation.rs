mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{MockGateway, settle};
use inkwell_application::{SendOutcome, WriterSession};
use inkwell_core::InkwellConfig;
use inkwell_core::conversation::{CHAT_FALLBACK_REPLY, FileAttachment, MessageRole};

fn session_with(gateway: &Arc<MockGateway>, content: &str) -> WriterSession {
    WriterSession::with_content(gateway.clone(), &InkwellConfig::default(), content)
}

#[tokio::test]
async fn test_blank_send_makes_no_request() {
    let gateway = Arc::new(MockGateway::new());
    let session = session_with(&gateway, "Some draft");

    for text in ["", "   ", "\n\t"] {
        assert_eq!(session.send_message(text, Vec::new()).await, SendOutcome::Rejected);
    }
    assert_eq!(gateway.draft_calls(), 0);
    assert!(session.conversation().messages().is_empty());
}

#[tokio::test]
async fn test_failed_draft_appends_one_fallback_after_user_message() {
    let gateway = Arc::new(MockGateway::new().failing_drafts());
    let session = session_with(&gateway, "");

    let outcome = session.send_message("Write an intro", Vec::new()).await;

    let messages = session.conversation().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].content, "Write an intro");
    assert_eq!(messages[1].role, MessageRole::Model);
    assert_eq!(messages[1].content, CHAT_FALLBACK_REPLY);
    assert!(messages[1].is_fallback());
    assert_eq!(outcome, SendOutcome::Failed(messages[1].clone()));
    assert!(!session.conversation().is_typing());
}

#[tokio::test]
async fn test_send_carries_document_snapshot() {
    let gateway = Arc::new(MockGateway::new());
    let session = session_with(&gateway, "Current draft body");

    session.send_message("Summarize", Vec::new()).await;
    session.edit("", 0);
    session.send_message("Start over", Vec::new()).await;

    let drafts = gateway.drafts.lock().unwrap();
    assert_eq!(drafts[0].context.as_deref(), Some("Current draft body"));
    assert_eq!(drafts[1].context, None);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_sends_append_in_completion_order() {
    let gateway = Arc::new(
        MockGateway::new()
            .with_draft_delay("slow", Duration::from_millis(500))
            .with_draft_delay("fast", Duration::from_millis(100)),
    );
    let session = session_with(&gateway, "");

    let (slow, fast, typing) = tokio::join!(
        session.send_message("slow", Vec::new()),
        session.send_message("fast", Vec::new()),
        async {
            settle().await;
            session.conversation().is_typing()
        }
    );
    assert!(typing);
    assert!(matches!(slow, SendOutcome::Replied(_)));
    assert!(matches!(fast, SendOutcome::Replied(_)));

    let contents: Vec<_> = session
        .conversation()
        .messages()
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, ["slow", "fast", "reply to fast", "reply to slow"]);
    assert!(!session.conversation().is_typing());
}

#[tokio::test]
async fn test_staged_attachments_go_with_next_send() {
    let gateway = Arc::new(MockGateway::new());
    let session = session_with(&gateway, "");
    let conversation = session.conversation();
    conversation.stage_attachment(FileAttachment::new("notes.md", "text/markdown", "# Notes"));

    let outcome = session.send_staged("Use my notes").await;

    assert!(matches!(outcome, SendOutcome::Replied(_)));
    assert!(conversation.staged_attachments().is_empty());
    let drafts = gateway.drafts.lock().unwrap();
    assert_eq!(drafts[0].files[0].name, "notes.md");
    assert_eq!(conversation.messages()[0].attachments.len(), 1);
}

#[tokio::test]
async fn test_transcript_subscribers_are_notified() {
    let gateway = Arc::new(MockGateway::new());
    let session = session_with(&gateway, "");
    let mut rx = session.conversation().subscribe();

    session.send_message("Hi", Vec::new()).await;

    assert!(rx.has_changed().unwrap());
    let transcript = rx.borrow_and_update();
    assert_eq!(transcript.messages.len(), 2);
    assert!(!transcript.is_typing());
}
