//! Reactive message misuse errors.

/// Reactive message error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ReactiveErrorKind {
    /// Payload has neither content nor embed and cannot create a message.
    #[display("Payload has no content and no embed")]
    InvalidPayload,

    /// The instance was removed or deleted and no longer renders.
    #[display("Reactive message has been terminated")]
    Terminated,
}

/// Reactive message error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Reactive Error: {} at line {} in {}", kind, line, file)]
pub struct ReactiveError {
    kind: ReactiveErrorKind,
    line: u32,
    file: &'static str,
}

impl ReactiveError {
    /// Create a new reactive error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ReactiveErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ReactiveErrorKind {
        &self.kind
    }
}
