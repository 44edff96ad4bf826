//! Top-level error wrapper types.

use crate::{ClientError, ConfigError, UpstreamError};

/// This is the foundation error enum. Each Vermeer crate converts its local
/// errors into one of these variants at the public boundary.
///
/// # Examples
///
/// ```
/// use vermeer_error::{VermeerError, ConfigError};
///
/// let cfg_err = ConfigError::new("budget table unreadable");
/// let err: VermeerError = cfg_err.into();
/// assert!(format!("{}", err).contains("Config Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VermeerErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Resilient client error
    #[from(ClientError)]
    Client(ClientError),
    /// Raw upstream error (escaped before client wrapping)
    #[from(UpstreamError)]
    Upstream(UpstreamError),
}

/// Vermeer error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vermeer_error::{VermeerResult, ConfigError};
///
/// fn might_fail() -> VermeerResult<()> {
///     Err(ConfigError::new("missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vermeer Error: {}", _0)]
pub struct VermeerError(Box<VermeerErrorKind>);

impl VermeerError {
    /// Create a new error from a kind.
    pub fn new(kind: VermeerErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VermeerErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to VermeerErrorKind
impl<T> From<T> for VermeerError
where
    T: Into<VermeerErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Vermeer operations.
///
/// # Examples
///
/// ```
/// use vermeer_error::{VermeerResult, UpstreamError};
///
/// fn call_api() -> VermeerResult<String> {
///     Err(UpstreamError::api(500, "internal error"))?
/// }
/// ```
pub type VermeerResult<T> = std::result::Result<T, VermeerError>;
