//! AI agronomist assistant.
//!
//! - `prompt`: injects the farm context into a fixed diagnostic template
//! - `gemini`: blocking client for the Gemini `generateContent` endpoint
//! - `session`: the conversation, threaded explicitly between turns

use crate::error::AppError;

pub mod gemini;
pub mod prompt;
pub mod session;

pub use gemini::GeminiClient;
pub use prompt::build_prompt;
pub use session::{ChatMessage, ChatSession, Role};

/// Anything that turns a prompt into a text reply.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, AppError>;
}
