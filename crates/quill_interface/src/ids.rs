//! Platform identifiers.

use serde::{Deserialize, Serialize};

/// Message snowflake.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub struct MessageId(pub u64);

/// User snowflake.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub struct UserId(pub u64);

/// Guild (server) snowflake.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub struct GuildId(pub u64);

/// A channel plus the guild it belongs to.
///
/// Direct-message channels have no guild; permission-change events in a guild
/// only concern messages whose channel carries that guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelRef {
    /// Channel snowflake
    pub id: u64,
    /// Owning guild, `None` for direct messages
    pub guild: Option<GuildId>,
}

impl ChannelRef {
    /// Channel inside a guild.
    pub fn guild(id: u64, guild: GuildId) -> Self {
        Self {
            id,
            guild: Some(guild),
        }
    }

    /// Direct-message channel.
    pub fn direct(id: u64) -> Self {
        Self { id, guild: None }
    }

    /// Whether this is a direct-message channel.
    pub fn is_direct(&self) -> bool {
        self.guild.is_none()
    }
}

impl std::fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.guild {
            Some(guild) => write!(f, "{}/{}", guild, self.id),
            None => write!(f, "dm/{}", self.id),
        }
    }
}
