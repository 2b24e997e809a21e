//! Serenity-backed chat platform.

use async_trait::async_trait;
use quill_core::{
    Change, EmbedDescriptor, LiveReaction, MessageEdit, PermissionFlag, PermissionSet,
    ReactionToken,
};
use quill_error::{PlatformError, PlatformErrorKind, PlatformResult};
use quill_interface::{
    ChannelRef, ChatPlatform, GuildId, IncomingMessage, MessageId, ReactionEvent, UserId,
};
use serenity::all::{
    Cache, ChannelId, Colour, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage, Http,
    Message, Permissions, Reaction, ReactionType,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// [`ChatPlatform`] over serenity's HTTP client and gateway cache.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
    bot: UserId,
}

impl std::fmt::Debug for SerenityPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerenityPlatform")
            .field("bot", &self.bot)
            .finish()
    }
}

impl SerenityPlatform {
    /// Wrap a connected client's HTTP handle and cache.
    pub fn new(http: Arc<Http>, cache: Arc<Cache>, bot: UserId) -> Self {
        Self { http, cache, bot }
    }

    fn cached_permissions(&self, channel: &ChannelRef) -> PlatformResult<Permissions> {
        let Some(guild_id) = channel.guild else {
            return Ok(Permissions::all() - Permissions::MANAGE_MESSAGES);
        };

        let guild = serenity::all::GuildId::new(guild_id.0)
            .to_guild_cached(&self.cache)
            .ok_or_else(|| transport(format!("guild {} not cached", guild_id)))?;
        let channel_id = ChannelId::new(channel.id);
        let guild_channel = guild
            .channels
            .get(&channel_id)
            .or_else(|| guild.threads.iter().find(|t| t.id == channel_id))
            .ok_or_else(|| transport(format!("channel {} not cached", channel.id)))?;
        let member = guild
            .members
            .get(&serenity::all::UserId::new(self.bot.0))
            .ok_or_else(|| transport("bot member not cached".to_string()))?;

        Ok(guild.user_permissions_in(guild_channel, member))
    }
}

fn transport(message: String) -> PlatformError {
    PlatformError::new(PlatformErrorKind::Transport(message))
}

/// Map a serenity failure onto the platform error kinds.
#[track_caller]
fn platform_error(err: serenity::Error) -> PlatformError {
    let kind = match &err {
        serenity::Error::Http(http) => match http.status_code().map(|s| s.as_u16()) {
            Some(403) => PlatformErrorKind::Forbidden(err.to_string()),
            Some(404) => PlatformErrorKind::NotFound(err.to_string()),
            Some(400) => PlatformErrorKind::InvalidRequest(err.to_string()),
            _ => PlatformErrorKind::Transport(err.to_string()),
        },
        serenity::Error::Model(serenity::all::ModelError::InvalidPermissions { .. }) => {
            PlatformErrorKind::Forbidden(err.to_string())
        }
        _ => PlatformErrorKind::Transport(err.to_string()),
    };
    PlatformError::new(kind)
}

fn reaction_type(emoji: &ReactionToken) -> PlatformResult<ReactionType> {
    ReactionType::try_from(emoji.as_str()).map_err(|e| {
        PlatformError::new(PlatformErrorKind::InvalidRequest(format!(
            "invalid emoji '{}': {}",
            emoji, e
        )))
    })
}

fn create_embed(embed: &EmbedDescriptor) -> CreateEmbed {
    let mut out = CreateEmbed::new();
    if let Some(title) = &embed.title {
        out = out.title(title);
    }
    if let Some(description) = &embed.description {
        out = out.description(description);
    }
    if let Some(url) = &embed.url {
        out = out.url(url);
    }
    if let Some(color) = embed.color {
        out = out.colour(Colour::new(color));
    }
    if let Some(footer) = &embed.footer {
        out = out.footer(CreateEmbedFooter::new(footer));
    }
    out.fields(
        embed
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone(), f.inline)),
    )
}

/// Channel reference of a serenity channel id.
pub fn channel_ref(channel: ChannelId, guild: Option<serenity::all::GuildId>) -> ChannelRef {
    ChannelRef {
        id: channel.get(),
        guild: guild.map(|g| GuildId(g.get())),
    }
}

/// Incoming message of a gateway message.
pub fn incoming_message(message: &Message) -> IncomingMessage {
    IncomingMessage {
        id: MessageId(message.id.get()),
        channel: channel_ref(message.channel_id, message.guild_id),
        author: UserId(message.author.id.get()),
        content: message.content.clone(),
    }
}

/// Reaction event of a gateway reaction; `None` when the user is unknown.
pub fn reaction_event(reaction: &Reaction) -> Option<ReactionEvent> {
    Some(ReactionEvent {
        message: MessageId(reaction.message_id.get()),
        channel: channel_ref(reaction.channel_id, reaction.guild_id),
        user: UserId(reaction.user_id?.get()),
        emoji: ReactionToken::new(reaction.emoji.to_string()),
    })
}

#[async_trait]
impl ChatPlatform for SerenityPlatform {
    fn bot_user(&self) -> UserId {
        self.bot
    }

    async fn effective_permissions(&self, channel: &ChannelRef) -> PlatformResult<PermissionSet> {
        let perms = self.cached_permissions(channel)?;
        let mut set = PermissionSet::new();
        if perms.add_reactions() {
            set.insert(PermissionFlag::AddReactions);
        }
        if perms.manage_messages() {
            set.insert(PermissionFlag::ManageMessages);
        }
        if perms.embed_links() {
            set.insert(PermissionFlag::EmbedLinks);
        }
        Ok(set)
    }

    #[instrument(skip(self, content, embed), fields(channel = %channel))]
    async fn create_message(
        &self,
        channel: &ChannelRef,
        content: Option<&str>,
        embed: Option<&EmbedDescriptor>,
    ) -> PlatformResult<MessageId> {
        let mut builder = CreateMessage::new();
        if let Some(content) = content {
            builder = builder.content(content);
        }
        if let Some(embed) = embed {
            builder = builder.embed(create_embed(embed));
        }
        let message = ChannelId::new(channel.id)
            .send_message(&*self.http, builder)
            .await
            .map_err(platform_error)?;
        debug!(message = %message.id, "Message created");
        Ok(MessageId(message.id.get()))
    }

    #[instrument(skip(self, edit), fields(channel = %channel))]
    async fn edit_message(
        &self,
        channel: &ChannelRef,
        message: MessageId,
        edit: &MessageEdit,
    ) -> PlatformResult<()> {
        let mut builder = EditMessage::new();
        match &edit.content {
            Some(Change::Set(content)) => builder = builder.content(content),
            Some(Change::Cleared) => builder = builder.content(""),
            None => {}
        }
        match &edit.embed {
            Some(Change::Set(embed)) => builder = builder.embed(create_embed(embed)),
            Some(Change::Cleared) => builder = builder.embeds(Vec::new()),
            None => {}
        }
        ChannelId::new(channel.id)
            .edit_message(&*self.http, serenity::all::MessageId::new(message.0), builder)
            .await
            .map_err(platform_error)?;
        Ok(())
    }

    async fn delete_message(&self, channel: &ChannelRef, message: MessageId) -> PlatformResult<()> {
        ChannelId::new(channel.id)
            .delete_message(&self.http, serenity::all::MessageId::new(message.0))
            .await
            .map_err(platform_error)
    }

    async fn add_reaction(
        &self,
        channel: &ChannelRef,
        message: MessageId,
        emoji: &ReactionToken,
    ) -> PlatformResult<()> {
        ChannelId::new(channel.id)
            .create_reaction(
                &self.http,
                serenity::all::MessageId::new(message.0),
                reaction_type(emoji)?,
            )
            .await
            .map_err(platform_error)
    }

    async fn clear_reaction(
        &self,
        channel: &ChannelRef,
        message: MessageId,
        emoji: &ReactionToken,
    ) -> PlatformResult<()> {
        ChannelId::new(channel.id)
            .delete_reaction_emoji(
                &self.http,
                serenity::all::MessageId::new(message.0),
                reaction_type(emoji)?,
            )
            .await
            .map_err(platform_error)
    }

    async fn clear_reactions(&self, channel: &ChannelRef, message: MessageId) -> PlatformResult<()> {
        ChannelId::new(channel.id)
            .delete_reactions(&self.http, serenity::all::MessageId::new(message.0))
            .await
            .map_err(platform_error)
    }

    async fn fetch_reactions(
        &self,
        channel: &ChannelRef,
        message: MessageId,
    ) -> PlatformResult<Vec<LiveReaction>> {
        let message = ChannelId::new(channel.id)
            .message(&*self.http, serenity::all::MessageId::new(message.0))
            .await
            .map_err(platform_error)?;
        Ok(message
            .reactions
            .iter()
            .map(|r| LiveReaction {
                token: ReactionToken::new(r.reaction_type.to_string()),
                count: r.count,
                me: r.me,
            })
            .collect())
    }
}
