//! Model gateway implementations.

pub mod gemini_gateway;
pub mod prompts;

pub use gemini_gateway::{FactCheck, GeminiGateway, GroundingSource, decode_review};
