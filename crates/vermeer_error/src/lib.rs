//! Error types for the Vermeer library.
//!
//! This crate provides the foundation error types used throughout the Vermeer
//! ecosystem.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use vermeer_error::{VermeerResult, ConfigError};
//!
//! fn load_settings() -> VermeerResult<String> {
//!     Err(ConfigError::new("missing budget table"))?
//! }
//!
//! match load_settings() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod upstream;

pub use client::{ClientError, ClientErrorKind};
pub use config::ConfigError;
pub use error::{VermeerError, VermeerErrorKind, VermeerResult};
pub use upstream::{RetryableError, UpstreamError, UpstreamErrorKind};
