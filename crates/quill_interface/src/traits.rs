//! The chat platform trait.

use crate::{ChannelRef, MessageId, UserId};
use async_trait::async_trait;
use quill_core::{EmbedDescriptor, LiveReaction, MessageEdit, PermissionSet, ReactionToken};
use quill_error::PlatformResult;

/// Outbound calls a reactive message makes against a chat backend.
///
/// Implementations report a refusal for missing rights as
/// [`PlatformErrorKind::Forbidden`](quill_error::PlatformErrorKind::Forbidden)
/// and a vanished target as
/// [`PlatformErrorKind::NotFound`](quill_error::PlatformErrorKind::NotFound);
/// the reactive layer recovers from both.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// The bot's own user id.
    fn bot_user(&self) -> UserId;

    /// Permissions the bot currently holds in `channel`.
    ///
    /// Only the flags the reactive layer cares about are reported. Direct
    /// messages grant everything except managing other users' messages.
    async fn effective_permissions(&self, channel: &ChannelRef) -> PlatformResult<PermissionSet>;

    /// Post a new message.
    async fn create_message(
        &self,
        channel: &ChannelRef,
        content: Option<&str>,
        embed: Option<&EmbedDescriptor>,
    ) -> PlatformResult<MessageId>;

    /// Apply body edits to an existing message.
    async fn edit_message(
        &self,
        channel: &ChannelRef,
        message: MessageId,
        edit: &MessageEdit,
    ) -> PlatformResult<()>;

    /// Delete a message.
    async fn delete_message(&self, channel: &ChannelRef, message: MessageId) -> PlatformResult<()>;

    /// Add the bot's reaction.
    async fn add_reaction(
        &self,
        channel: &ChannelRef,
        message: MessageId,
        emoji: &ReactionToken,
    ) -> PlatformResult<()>;

    /// Remove every reaction with this emoji.
    async fn clear_reaction(
        &self,
        channel: &ChannelRef,
        message: MessageId,
        emoji: &ReactionToken,
    ) -> PlatformResult<()>;

    /// Remove all reactions.
    async fn clear_reactions(&self, channel: &ChannelRef, message: MessageId) -> PlatformResult<()>;

    /// Reactions currently shown on the message, in display order.
    async fn fetch_reactions(
        &self,
        channel: &ChannelRef,
        message: MessageId,
    ) -> PlatformResult<Vec<LiveReaction>>;
}
