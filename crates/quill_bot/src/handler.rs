//! Serenity event handler for the quill bot.
//!
//! Translates gateway events into [`PlatformEvent`]s for the
//! [`EventRouter`] and answers the menu text commands.

use crate::{BotConfig, MenuCommand};
use quill_interface::PlatformEvent;
use quill_reactive::{
    EventRouter, ReactiveConfig, SerenityPlatform, channel_ref, incoming_message, reaction_event,
};
use serenity::all::{
    ChannelId, GuildChannel, GuildId, GuildMemberUpdateEvent, Member, Message, MessageId,
    Reaction, Ready, Role, RoleId,
};
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::gateway::GatewayIntents;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, trace};

/// Event handler owning the bot's reactive message router.
///
/// The router is created on the first `ready` event, once the bot's own user
/// id and the gateway cache are known.
pub struct QuillHandler {
    prefix: String,
    config: ReactiveConfig,
    router: OnceLock<Arc<EventRouter>>,
}

impl std::fmt::Debug for QuillHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuillHandler")
            .field("prefix", &self.prefix)
            .field("ready", &self.router.get().is_some())
            .finish()
    }
}

impl QuillHandler {
    /// Create a handler from the bot configuration.
    pub fn new(config: &BotConfig) -> Self {
        Self {
            prefix: config.bot().prefix().clone(),
            config: config.reactive().clone(),
            router: OnceLock::new(),
        }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::DIRECT_MESSAGE_REACTIONS
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// The router, once connected.
    pub fn router(&self) -> Option<&Arc<EventRouter>> {
        self.router.get()
    }

    async fn run_command(&self, msg: &Message) {
        if msg.author.bot {
            return;
        }
        let Some(command) = MenuCommand::parse(&self.prefix, &msg.content) else {
            return;
        };
        let Some(router) = self.router.get() else {
            return;
        };

        let channel = channel_ref(msg.channel_id, msg.guild_id);
        debug!(command = %command, channel = %channel, author = %msg.author.id, "Menu command");
        if let Err(e) = command.open(router, channel).await {
            error!(command = %command, error = %e, "Failed to open menu");
        }
    }

    async fn dispatch(&self, event: PlatformEvent) {
        match self.router.get() {
            Some(router) => router.dispatch(event).await,
            None => trace!("Event before ready, dropping"),
        }
    }
}

#[async_trait]
impl EventHandler for QuillHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord"
        );

        let platform = SerenityPlatform::new(
            Arc::clone(&ctx.http),
            Arc::clone(&ctx.cache),
            quill_interface::UserId(ready.user.id.get()),
        );
        let router = EventRouter::new(Arc::new(platform), self.config.clone());
        if self.router.set(router).is_err() {
            debug!("Resumed session, keeping existing router");
        }
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        // a menu waiting on permissions must not delay opening another one
        tokio::join!(
            self.dispatch(PlatformEvent::MessageReceived(incoming_message(&msg))),
            self.run_command(&msg),
        );
    }

    async fn reaction_add(&self, _ctx: Context, reaction: Reaction) {
        match reaction_event(&reaction) {
            Some(event) => self.dispatch(PlatformEvent::ReactionAdded(event)).await,
            None => trace!(message = %reaction.message_id, "Reaction without a user"),
        }
    }

    async fn message_delete(
        &self,
        _ctx: Context,
        channel_id: ChannelId,
        deleted_message_id: MessageId,
        guild_id: Option<GuildId>,
    ) {
        self.dispatch(PlatformEvent::MessageDeleted {
            message: quill_interface::MessageId(deleted_message_id.get()),
            channel: channel_ref(channel_id, guild_id),
        })
        .await;
    }

    async fn message_delete_bulk(
        &self,
        _ctx: Context,
        channel_id: ChannelId,
        multiple_deleted_messages_ids: Vec<MessageId>,
        guild_id: Option<GuildId>,
    ) {
        self.dispatch(PlatformEvent::MessagesBulkDeleted {
            messages: multiple_deleted_messages_ids
                .into_iter()
                .map(|id| quill_interface::MessageId(id.get()))
                .collect(),
            channel: channel_ref(channel_id, guild_id),
        })
        .await;
    }

    async fn channel_update(&self, _ctx: Context, _old: Option<GuildChannel>, new: GuildChannel) {
        self.dispatch(PlatformEvent::ChannelUpdated(channel_ref(
            new.id,
            Some(new.guild_id),
        )))
        .await;
    }

    async fn guild_role_update(&self, _ctx: Context, _old: Option<Role>, new: Role) {
        self.dispatch(PlatformEvent::RoleUpdated {
            guild: quill_interface::GuildId(new.guild_id.get()),
        })
        .await;
    }

    async fn guild_role_delete(
        &self,
        _ctx: Context,
        guild_id: GuildId,
        _removed_role_id: RoleId,
        _removed_role: Option<Role>,
    ) {
        self.dispatch(PlatformEvent::RoleUpdated {
            guild: quill_interface::GuildId(guild_id.get()),
        })
        .await;
    }

    async fn guild_member_update(
        &self,
        _ctx: Context,
        _old: Option<Member>,
        _new: Option<Member>,
        event: GuildMemberUpdateEvent,
    ) {
        self.dispatch(PlatformEvent::MemberUpdated {
            guild: quill_interface::GuildId(event.guild_id.get()),
            user: quill_interface::UserId(event.user.id.get()),
        })
        .await;
    }
}
