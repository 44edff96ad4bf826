//! Core data types for the Vermeer resilient completion client.
//!
//! This crate provides the foundation data types used across all Vermeer interfaces.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod message;
mod request;
mod response;
mod role;
mod telemetry;

pub use message::Message;
pub use request::{CompletionRequest, CompletionRequestBuilder};
pub use response::{Choice, CompletionResponse, Usage};
pub use role::Role;
pub use telemetry::init_telemetry;
