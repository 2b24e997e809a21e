//! Reaction identity types.

use serde::{Deserialize, Serialize};

/// A single reaction emoji, as the platform renders it.
///
/// Unicode emoji are stored verbatim; custom emoji use the platform's
/// `<:name:id>` mention form.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct ReactionToken(String);

impl ReactionToken {
    /// Create a token from its rendered form.
    pub fn new(emoji: impl Into<String>) -> Self {
        Self(emoji.into())
    }

    /// Rendered form of the emoji.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReactionToken {
    fn from(emoji: &str) -> Self {
        Self::new(emoji)
    }
}

/// A reaction as currently shown on a live message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveReaction {
    /// Which emoji
    pub token: ReactionToken,
    /// How many users reacted with it
    pub count: u64,
    /// Whether the bot itself is one of them
    pub me: bool,
}

impl LiveReaction {
    /// A reaction placed by the bot alone.
    pub fn mine(token: impl Into<ReactionToken>) -> Self {
        Self {
            token: token.into(),
            count: 1,
            me: true,
        }
    }

    /// A reaction placed by other users only.
    pub fn others(token: impl Into<ReactionToken>, count: u64) -> Self {
        Self {
            token: token.into(),
            count,
            me: false,
        }
    }
}
