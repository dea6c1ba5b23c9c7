//! Error types for Inkwell.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole Inkwell workspace.
///
/// Gateway failures have their own type ([`crate::gateway::GatewayError`])
/// because every pipeline converts them into a degraded UI state instead of
/// propagating them.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InkwellError {
    /// A byte range does not fit the current document.
    #[error("Invalid range {start}..{end} for document of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// An operation needed a live selection and there was none.
    #[error("No active selection")]
    NoSelection,

    /// User input failed validation (blank instruction, empty send, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Attachment with a file type the chat panel does not accept.
    #[error("Unsupported attachment '{name}': only {accepted} files are accepted")]
    UnsupportedAttachment { name: String, accepted: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl InkwellError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidRange error
    pub fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self::InvalidRange { start, end, len }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an InvalidRange error
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, Self::InvalidRange { .. })
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if the error was caused by user input rather than the system.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::NoSelection | Self::UnsupportedAttachment { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for InkwellError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for InkwellError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for InkwellError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, InkwellError>`.
pub type Result<T> = std::result::Result<T, InkwellError>;
