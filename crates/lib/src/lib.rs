//! Tutorbot core library — config, content guard, chat-completion client,
//! reply generator, and the webhook HTTP server used by the CLI.

pub mod config;
pub mod guard;
pub mod llm;
pub mod server;
pub mod tutor;
