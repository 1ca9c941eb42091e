//! Chat-completion client for the upstream AI endpoint.
//!
//! DeepSeek exposes an OpenAI-compatible API; the client speaks
//! POST /chat/completions with bearer auth and a bounded timeout.

mod deepseek;

pub use deepseek::{ChatMessage, ChatResponse, Choice, DeepSeekClient, DeepSeekError};
