pub mod config;
pub mod conversation;
pub mod document;
pub mod error;
pub mod gateway;
pub mod secret;
pub mod state;
pub mod suggestion;

// Re-export common types
pub use config::InkwellConfig;
pub use error::{InkwellError, Result};
pub use gateway::{DraftRequest, GatewayError, ModelGateway, ReviewVerdict, RewriteRequest};
pub use state::{Applied, EditorEvent, EditorState, Notification, NotificationLevel};
pub use suggestion::Suggestion;
