//! Trait definitions for the Vermeer resilient completion client.
//!
//! This crate defines the two seams of the system: the completion API
//! collaborator ([`CompletionDriver`]) and the caller-injected observer
//! for attempt lifecycle events ([`CallObserver`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod observer;
mod traits;

pub use observer::{CallObserver, NoopObserver};
pub use traits::CompletionDriver;
