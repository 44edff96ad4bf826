//! Resilient client pipeline and provider drivers.
//!
//! [`ResilientClient`] is the single entry point callers use: it wraps any
//! [`vermeer_interface::CompletionDriver`] with sliding-window admission
//! control and bounded-retry execution. The [`openai`] module provides a
//! concrete driver for OpenAI-compatible chat-completion APIs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod openai;
mod resilient;

pub use openai::OpenAiClient;
pub use resilient::ResilientClient;
