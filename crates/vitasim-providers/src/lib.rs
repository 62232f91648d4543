//! Remote capability layer for VitaSim.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`] — one stateless completion call: configuration + history + new text
//! - [`gemini::GeminiProvider`] — HTTP client for the Gemini `generateContent` endpoint
//! - [`chat::ChatSession`] — a session handle bound to one history snapshot
//! - [`error::ProviderError`] — every way a remote call can fail

pub mod chat;
pub mod error;
pub mod gemini;
pub mod traits;

pub use chat::ChatSession;
pub use error::ProviderError;
pub use gemini::GeminiProvider;
pub use traits::{GenerateRequest, LlmProvider};
