//! In-memory chat platform granting every permission.

use async_trait::async_trait;
use parking_lot::Mutex;
use quill_core::{
    Change, EmbedDescriptor, LiveReaction, MessageEdit, PermissionSet, ReactionToken,
};
use quill_error::{PlatformError, PlatformErrorKind, PlatformResult};
use quill_interface::{ChannelRef, ChatPlatform, MessageId, UserId};
use std::collections::BTreeMap;

/// The mock bot's own user id.
pub const BOT: UserId = UserId(1);

/// A message as the mock stores it.
#[derive(Debug, Clone, Default)]
pub struct StoredMessage {
    pub content: Option<String>,
    pub embed: Option<EmbedDescriptor>,
    pub reactions: Vec<ReactionToken>,
}

#[derive(Debug, Default)]
struct MockState {
    next_id: u64,
    messages: BTreeMap<MessageId, StoredMessage>,
    created: Vec<MessageId>,
    deleted: Vec<MessageId>,
}

/// Mock platform keeping only the live state of each message.
#[derive(Debug, Default)]
pub struct MockPlatform {
    state: Mutex<MockState>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self, id: MessageId) -> Option<StoredMessage> {
        self.state.lock().messages.get(&id).cloned()
    }

    /// Every message created so far, oldest first.
    pub fn created(&self) -> Vec<MessageId> {
        self.state.lock().created.clone()
    }

    pub fn deleted(&self) -> Vec<MessageId> {
        self.state.lock().deleted.clone()
    }
}

fn not_found(id: MessageId) -> PlatformError {
    PlatformError::new(PlatformErrorKind::NotFound(format!("message {}", id)))
}

#[async_trait]
impl ChatPlatform for MockPlatform {
    fn bot_user(&self) -> UserId {
        BOT
    }

    async fn effective_permissions(&self, _channel: &ChannelRef) -> PlatformResult<PermissionSet> {
        Ok(PermissionSet::all())
    }

    async fn create_message(
        &self,
        _channel: &ChannelRef,
        content: Option<&str>,
        embed: Option<&EmbedDescriptor>,
    ) -> PlatformResult<MessageId> {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = MessageId(2000 + state.next_id);
        state.messages.insert(
            id,
            StoredMessage {
                content: content.map(str::to_string),
                embed: embed.cloned(),
                reactions: Vec::new(),
            },
        );
        state.created.push(id);
        Ok(id)
    }

    async fn edit_message(
        &self,
        _channel: &ChannelRef,
        message: MessageId,
        edit: &MessageEdit,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        let stored = state.messages.get_mut(&message).ok_or_else(|| not_found(message))?;
        match &edit.content {
            Some(Change::Set(content)) => stored.content = Some(content.clone()),
            Some(Change::Cleared) => stored.content = None,
            None => {}
        }
        match &edit.embed {
            Some(Change::Set(embed)) => stored.embed = Some(embed.clone()),
            Some(Change::Cleared) => stored.embed = None,
            None => {}
        }
        Ok(())
    }

    async fn delete_message(&self, _channel: &ChannelRef, message: MessageId) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.messages.remove(&message).ok_or_else(|| not_found(message))?;
        state.deleted.push(message);
        Ok(())
    }

    async fn add_reaction(
        &self,
        _channel: &ChannelRef,
        message: MessageId,
        emoji: &ReactionToken,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        let stored = state.messages.get_mut(&message).ok_or_else(|| not_found(message))?;
        if !stored.reactions.contains(emoji) {
            stored.reactions.push(emoji.clone());
        }
        Ok(())
    }

    async fn clear_reaction(
        &self,
        _channel: &ChannelRef,
        message: MessageId,
        emoji: &ReactionToken,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        let stored = state.messages.get_mut(&message).ok_or_else(|| not_found(message))?;
        stored.reactions.retain(|r| r != emoji);
        Ok(())
    }

    async fn clear_reactions(&self, _channel: &ChannelRef, message: MessageId) -> PlatformResult<()> {
        let mut state = self.state.lock();
        let stored = state.messages.get_mut(&message).ok_or_else(|| not_found(message))?;
        stored.reactions.clear();
        Ok(())
    }

    async fn fetch_reactions(
        &self,
        _channel: &ChannelRef,
        message: MessageId,
    ) -> PlatformResult<Vec<LiveReaction>> {
        let state = self.state.lock();
        let stored = state.messages.get(&message).ok_or_else(|| not_found(message))?;
        Ok(stored.reactions.iter().cloned().map(LiveReaction::mine).collect())
    }
}
