//! Configuration error types.

use std::fmt;

/// A setting that could not be loaded, parsed or applied.
///
/// When the problem is tied to one setting, `key` holds its dotted path
/// (`reactive.hoist_interval`), which is also the `QUILL__REACTIVE__...`
/// variable to look at.
#[derive(Debug, Clone, derive_more::Error)]
pub struct ConfigError {
    /// What went wrong
    pub message: String,
    /// Dotted path of the offending setting
    pub key: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Error about the configuration as a whole, such as an unreadable file.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill_error::ConfigError;
    ///
    /// let err = ConfigError::new("Failed to read ./quill.toml");
    /// assert!(err.key.is_none());
    /// assert!(err.to_string().starts_with("Configuration Error: Failed to read ./quill.toml at line"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::located(None, message.into())
    }

    /// Error about a single setting.
    ///
    /// ```
    /// use quill_error::ConfigError;
    ///
    /// let err = ConfigError::for_key("logging.level", "not a filter directive");
    /// assert_eq!(err.key.as_deref(), Some("logging.level"));
    /// assert!(err.to_string().contains("logging.level: not a filter directive"));
    /// ```
    #[track_caller]
    pub fn for_key(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::located(Some(key.into()), message.into())
    }

    #[track_caller]
    fn located(key: Option<String>, message: String) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message,
            key,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration Error: ")?;
        if let Some(key) = &self.key {
            write!(f, "{}: ", key)?;
        }
        write!(f, "{} at line {} in {}", self.message, self.line, self.file)
    }
}
