//! Route table errors.
//!
//! These indicate a programming error in the menu built on top of the
//! navigator and are never recovered from.

/// Route error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RouteErrorKind {
    /// Path matched nothing and no error page is configured.
    #[display("Route '{}' is invalid and no error page is configured", _0)]
    Unresolvable(String),

    /// A route node can be terminated on but has no base page.
    #[display("Route node at '{}' has no base page", _0)]
    MissingBase(String),
}

/// Route error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Route Error: {} at line {} in {}", kind, line, file)]
pub struct RouteError {
    kind: RouteErrorKind,
    line: u32,
    file: &'static str,
}

impl RouteError {
    /// Create a new route error with caller location tracking.
    #[track_caller]
    pub fn new(kind: RouteErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RouteErrorKind {
        &self.kind
    }
}
