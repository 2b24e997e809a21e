//! Chat platform error types.
//!
//! Every outbound call a reactive message makes (create, edit, delete, react,
//! fetch) reports failures through [`PlatformError`]. The reactive core only
//! distinguishes two conditions: the platform refused for missing rights
//! ([`PlatformErrorKind::Forbidden`]) and the target is gone
//! ([`PlatformErrorKind::NotFound`]). Everything else is propagated.

/// Platform error variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PlatformErrorKind {
    /// Platform rejected the operation because the bot lacks a permission.
    #[display("Forbidden: {_0}")]
    Forbidden(String),

    /// Message, channel or reaction no longer exists.
    #[display("Not found: {_0}")]
    NotFound(String),

    /// Platform rejected the request body.
    #[display("Invalid request: {_0}")]
    InvalidRequest(String),

    /// Network, gateway or serialization failure.
    #[display("Transport error: {_0}")]
    Transport(String),
}

/// Platform error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    kind: PlatformErrorKind,
    line: u32,
    file: &'static str,
}

impl PlatformError {
    /// Create a new PlatformError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use quill_error::{PlatformError, PlatformErrorKind};
    ///
    /// let err = PlatformError::new(PlatformErrorKind::NotFound("message 42".into()));
    /// assert!(err.is_not_found());
    /// ```
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PlatformErrorKind {
        &self.kind
    }

    /// True for [`PlatformErrorKind::Forbidden`].
    pub fn is_forbidden(&self) -> bool {
        matches!(self.kind, PlatformErrorKind::Forbidden(_))
    }

    /// True for [`PlatformErrorKind::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, PlatformErrorKind::NotFound(_))
    }
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
