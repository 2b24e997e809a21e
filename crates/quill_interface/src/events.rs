//! Events a platform delivers to the reactive layer.

use crate::{ChannelRef, GuildId, MessageId, UserId};
use quill_core::ReactionToken;
use serde::{Deserialize, Serialize};

/// A user message in some channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Message id
    pub id: MessageId,
    /// Where it was posted
    pub channel: ChannelRef,
    /// Who posted it
    pub author: UserId,
    /// Text body
    pub content: String,
}

/// A reaction added to some message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// Message the reaction was added to
    pub message: MessageId,
    /// Channel of that message
    pub channel: ChannelRef,
    /// Who reacted
    pub user: UserId,
    /// Which emoji
    pub emoji: ReactionToken,
}

/// Platform event relevant to reactive messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformEvent {
    /// New message posted
    MessageReceived(IncomingMessage),
    /// Reaction added to a message
    ReactionAdded(ReactionEvent),
    /// A message was deleted
    MessageDeleted {
        /// Deleted message
        message: MessageId,
        /// Its channel
        channel: ChannelRef,
    },
    /// Several messages were deleted at once
    MessagesBulkDeleted {
        /// Deleted messages
        messages: Vec<MessageId>,
        /// Their channel
        channel: ChannelRef,
    },
    /// Channel settings (including permission overwrites) changed
    ChannelUpdated(ChannelRef),
    /// A role in a guild changed
    RoleUpdated {
        /// Guild owning the role
        guild: GuildId,
    },
    /// A guild member's roles changed
    MemberUpdated {
        /// Guild of the member
        guild: GuildId,
        /// The member
        user: UserId,
    },
}

impl PlatformEvent {
    /// Whether this event can change the bot's permissions in `channel`.
    ///
    /// Channel updates qualify for the same channel, role updates for the
    /// channel's guild, and member updates only when the member is the bot.
    pub fn affects_permissions(&self, channel: &ChannelRef, bot: UserId) -> bool {
        match self {
            PlatformEvent::ChannelUpdated(updated) => updated.id == channel.id,
            PlatformEvent::RoleUpdated { guild } => channel.guild == Some(*guild),
            PlatformEvent::MemberUpdated { guild, user } => {
                *user == bot && channel.guild == Some(*guild)
            }
            _ => false,
        }
    }

    /// Whether this event is a permission-change event at all.
    pub fn is_permission_change(&self) -> bool {
        matches!(
            self,
            PlatformEvent::ChannelUpdated(_)
                | PlatformEvent::RoleUpdated { .. }
                | PlatformEvent::MemberUpdated { .. }
        )
    }

    /// Whether the message `id` was deleted by this event.
    pub fn deletes(&self, id: MessageId) -> bool {
        match self {
            PlatformEvent::MessageDeleted { message, .. } => *message == id,
            PlatformEvent::MessagesBulkDeleted { messages, .. } => messages.contains(&id),
            _ => false,
        }
    }

    /// Channel the event happened in, for message and reaction events.
    pub fn channel(&self) -> Option<&ChannelRef> {
        match self {
            PlatformEvent::MessageReceived(msg) => Some(&msg.channel),
            PlatformEvent::ReactionAdded(reaction) => Some(&reaction.channel),
            PlatformEvent::MessageDeleted { channel, .. }
            | PlatformEvent::MessagesBulkDeleted { channel, .. } => Some(channel),
            PlatformEvent::ChannelUpdated(_)
            | PlatformEvent::RoleUpdated { .. }
            | PlatformEvent::MemberUpdated { .. } => None,
        }
    }

    /// The acting user, for events that have one.
    pub fn actor(&self) -> Option<UserId> {
        match self {
            PlatformEvent::MessageReceived(msg) => Some(msg.author),
            PlatformEvent::ReactionAdded(reaction) => Some(reaction.user),
            _ => None,
        }
    }
}
