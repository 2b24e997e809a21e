//! Reactive message configuration.

use derive_getters::Getters;
use quill_error::BuilderError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables shared by every reactive message of a router.
///
/// # Examples
///
/// ```
/// use quill_reactive::ReactiveConfig;
///
/// let config = ReactiveConfig::builder()
///     .permission_timeout(5u64)
///     .build()
///     .unwrap();
///
/// assert!(*config.enforce_reaction_positions());
/// assert_eq!(config.permission_wait().as_secs(), 5);
/// assert_eq!(*config.hoist_interval(), 10);
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into), build_fn(error = "BuilderError"))]
#[serde(default)]
pub struct ReactiveConfig {
    /// Require `manage_messages` whenever reactions change, so the row can
    /// always be put back in order.
    #[builder(default = "true")]
    enforce_reaction_positions: bool,

    /// Seconds to wait for a permission change before deleting the message.
    #[builder(default = "30")]
    permission_timeout: u64,

    /// Channel messages between re-sends of a hoisted message.
    #[builder(default = "10")]
    hoist_interval: u32,
}

impl Default for ReactiveConfig {
    fn default() -> Self {
        Self {
            enforce_reaction_positions: true,
            permission_timeout: 30,
            hoist_interval: 10,
        }
    }
}

impl ReactiveConfig {
    /// Creates a new config builder.
    pub fn builder() -> ReactiveConfigBuilder {
        ReactiveConfigBuilder::default()
    }

    /// Permission timeout as a duration.
    pub fn permission_wait(&self) -> Duration {
        Duration::from_secs(self.permission_timeout)
    }
}
