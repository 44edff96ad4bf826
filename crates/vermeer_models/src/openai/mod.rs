//! OpenAI-compatible chat-completion driver.

mod client;

pub use client::OpenAiClient;
