//! Boundary to the remote text-generation service.
//!
//! The application layer only talks to the model through [`ModelGateway`].
//! Each operation is a single request/response with no retry and no streaming.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::FileAttachment;

/// Input of a chat draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRequest {
    pub prompt: String,
    /// Snapshot of the document at send time.
    pub context: Option<String>,
    pub files: Vec<FileAttachment>,
}

/// Input of an instructed rewrite of a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRequest {
    pub selection: String,
    pub instruction: String,
    /// Full document at request time; implementations may truncate it.
    pub context: String,
}

/// Result of a proactive paragraph review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewVerdict {
    pub has_suggestion: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ReviewVerdict {
    pub fn no_suggestion() -> Self {
        Self::default()
    }

    pub fn suggest(suggestion: impl Into<String>, explanation: Option<String>) -> Self {
        Self {
            has_suggestion: true,
            explanation,
            suggestion: Some(suggestion.into()),
        }
    }

    /// The replacement text, if the verdict actually carries a usable one.
    pub fn replacement(&self) -> Option<&str> {
        if !self.has_suggestion {
            return None;
        }
        self.suggestion.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Failure of a gateway call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        retryable: bool,
    },

    /// The response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The service answered without any text.
    #[error("Empty response")]
    EmptyResponse,

    /// No API key is configured.
    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

impl GatewayError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Whether the same request might succeed later. Informational only.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { retryable, .. } => *retryable,
            Self::Transport(_) => true,
            _ => false,
        }
    }
}

/// The three operations the writing pipelines need from a model.
///
/// `review` has no error channel: it is best-effort, and implementations must
/// turn every failure into [`ReviewVerdict::no_suggestion`].
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn generate_draft(&self, request: DraftRequest) -> Result<String, GatewayError>;

    async fn rewrite(&self, request: RewriteRequest) -> Result<String, GatewayError>;

    async fn review(&self, paragraph: &str) -> ReviewVerdict;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_wire_names() {
        let verdict: ReviewVerdict = serde_json::from_str(
            r#"{"hasSuggestion": true, "explanation": "Tighter", "suggestion": "Better."}"#,
        )
        .unwrap();
        assert_eq!(verdict, ReviewVerdict::suggest("Better.", Some("Tighter".into())));
    }

    #[test]
    fn test_replacement_requires_flag_and_text() {
        assert_eq!(ReviewVerdict::suggest("x", None).replacement(), Some("x"));
        assert_eq!(ReviewVerdict::suggest("  ", None).replacement(), None);
        let flagged_without_text = ReviewVerdict {
            has_suggestion: true,
            ..ReviewVerdict::default()
        };
        assert_eq!(flagged_without_text.replacement(), None);
        let text_without_flag = ReviewVerdict {
            suggestion: Some("x".into()),
            ..ReviewVerdict::default()
        };
        assert_eq!(text_without_flag.replacement(), None);
    }

    #[test]
    fn test_retryable_classification() {
        assert!(GatewayError::transport("reset").is_retryable());
        assert!(!GatewayError::EmptyResponse.is_retryable());
        let throttled = GatewayError::Http {
            status: 429,
            message: "slow down".into(),
            retryable: true,
        };
        assert!(throttled.is_retryable());
    }
}
