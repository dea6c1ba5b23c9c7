//! Conversation domain module.
//!
//! - `message`: transcript entries (`Message`, `MessageRole`)
//! - `attachment`: files attached to a chat turn (`FileAttachment`)

mod attachment;
mod message;

pub use attachment::{ACCEPTED_EXTENSIONS, FileAttachment};
pub use message::{CHAT_FALLBACK_REPLY, Message, MessageRole};
