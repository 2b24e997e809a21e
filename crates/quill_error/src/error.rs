//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, PlatformError, ReactiveError, RenderError, RouteError};

/// This is the foundation error enum. Every crate in the workspace funnels
/// its failures through one of these variants.
///
/// # Examples
///
/// ```
/// use quill_error::{QuillError, RenderError};
///
/// let render_err = RenderError::new("frame index out of range");
/// let err: QuillError = render_err.into();
/// assert!(format!("{}", err).contains("Render Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum QuillErrorKind {
    /// Chat platform call failed
    #[from(PlatformError)]
    Platform(PlatformError),
    /// Route table misconfiguration
    #[from(RouteError)]
    Route(RouteError),
    /// Feature render logic failed
    #[from(RenderError)]
    Render(RenderError),
    /// Reactive message misuse
    #[from(ReactiveError)]
    Reactive(ReactiveError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Quill error with kind discrimination.
///
/// # Examples
///
/// ```
/// use quill_error::{ConfigError, QuillResult};
///
/// fn might_fail() -> QuillResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Quill Error: {}", _0)]
pub struct QuillError(Box<QuillErrorKind>);

impl QuillError {
    /// Create a new error from a kind.
    pub fn new(kind: QuillErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &QuillErrorKind {
        &self.0
    }

    /// The platform error underneath, if this is one.
    pub fn as_platform(&self) -> Option<&PlatformError> {
        match self.kind() {
            QuillErrorKind::Platform(e) => Some(e),
            _ => None,
        }
    }

    /// True when the platform rejected the call for missing rights.
    pub fn is_forbidden(&self) -> bool {
        self.as_platform().is_some_and(PlatformError::is_forbidden)
    }

    /// True when the target message or channel no longer exists.
    pub fn is_not_found(&self) -> bool {
        self.as_platform().is_some_and(PlatformError::is_not_found)
    }
}

// Generic From implementation for any type that converts to QuillErrorKind
impl<T> From<T> for QuillError
where
    T: Into<QuillErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Quill operations.
///
/// # Examples
///
/// ```
/// use quill_error::{QuillResult, RenderError};
///
/// fn render() -> QuillResult<String> {
///     Err(RenderError::new("no frames"))?
/// }
/// ```
pub type QuillResult<T> = std::result::Result<T, QuillError>;
