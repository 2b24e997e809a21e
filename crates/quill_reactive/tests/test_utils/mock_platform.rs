//! In-memory chat platform for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use quill_core::{
    Change, EmbedDescriptor, LiveReaction, MessageEdit, PermissionFlag, PermissionSet,
    ReactionToken,
};
use quill_error::{PlatformError, PlatformErrorKind, PlatformResult};
use quill_interface::{ChannelRef, ChatPlatform, MessageId, UserId};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::Notify;

/// The mock bot's own user id.
pub const BOT: UserId = UserId(1);

/// An outbound call recorded by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create {
        message: MessageId,
        content: Option<String>,
        embed: Option<EmbedDescriptor>,
    },
    Edit {
        message: MessageId,
        edit: MessageEdit,
    },
    Delete(MessageId),
    AddReaction(MessageId, ReactionToken),
    ClearReaction(MessageId, ReactionToken),
    ClearReactions(MessageId),
}

/// A message as the mock stores it.
#[derive(Debug, Clone, Default)]
pub struct StoredMessage {
    pub content: Option<String>,
    pub embed: Option<EmbedDescriptor>,
    pub reactions: Vec<LiveReaction>,
}

#[derive(Debug, Default)]
struct MockState {
    permissions: PermissionSet,
    next_id: u64,
    messages: BTreeMap<MessageId, StoredMessage>,
    calls: Vec<Call>,
    /// Remaining successful add-reaction calls before they turn forbidden
    reaction_budget: Option<usize>,
}

/// Mock platform recording every outbound call.
#[derive(Debug)]
pub struct MockPlatform {
    state: Mutex<MockState>,
    changed: Notify,
}

impl MockPlatform {
    /// Platform granting the given permissions.
    pub fn new(permissions: impl IntoIterator<Item = PermissionFlag>) -> Self {
        Self {
            state: Mutex::new(MockState {
                permissions: permissions.into_iter().collect(),
                next_id: 1000,
                ..MockState::default()
            }),
            changed: Notify::new(),
        }
    }

    /// Platform granting everything.
    pub fn permissive() -> Self {
        Self::new([
            PermissionFlag::AddReactions,
            PermissionFlag::ManageMessages,
            PermissionFlag::EmbedLinks,
        ])
    }

    pub fn set_permissions(&self, permissions: impl IntoIterator<Item = PermissionFlag>) {
        self.state.lock().permissions = permissions.into_iter().collect();
    }

    /// Let `count` more add-reaction calls succeed, then answer forbidden.
    pub fn forbid_reactions_after(&self, count: usize) {
        self.state.lock().reaction_budget = Some(count);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn message(&self, id: MessageId) -> Option<StoredMessage> {
        self.state.lock().messages.get(&id).cloned()
    }

    pub fn reactions(&self, id: MessageId) -> Vec<ReactionToken> {
        self.message(id)
            .map(|m| m.reactions.into_iter().map(|r| r.token).collect())
            .unwrap_or_default()
    }

    /// Another user reacts to a message.
    pub fn user_reacts(&self, id: MessageId, emoji: &str) {
        let mut state = self.state.lock();
        if let Some(message) = state.messages.get_mut(&id) {
            match message.reactions.iter_mut().find(|r| r.token.as_str() == emoji) {
                Some(existing) => existing.count += 1,
                None => message.reactions.push(LiveReaction::others(emoji, 1)),
            }
        }
    }

    /// Delete a message behind the bot's back.
    pub fn vanish(&self, id: MessageId) {
        self.state.lock().messages.remove(&id);
    }

    /// Wait until the recorded calls satisfy `pred`.
    pub async fn wait_until(&self, pred: impl Fn(&[Call]) -> bool) {
        let wait = async {
            loop {
                let notified = self.changed.notified();
                if pred(&self.state.lock().calls) {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("platform never reached the expected state");
    }

    fn record(&self, state: &mut MockState, call: Call) {
        state.calls.push(call);
        self.changed.notify_waiters();
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
        Ok(self.state.lock().permissions.clone())
    }

    async fn create_message(
        &self,
        _channel: &ChannelRef,
        content: Option<&str>,
        embed: Option<&EmbedDescriptor>,
    ) -> PlatformResult<MessageId> {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = MessageId(state.next_id);
        state.messages.insert(
            id,
            StoredMessage {
                content: content.map(str::to_string),
                embed: embed.cloned(),
                reactions: Vec::new(),
            },
        );
        self.record(
            &mut state,
            Call::Create {
                message: id,
                content: content.map(str::to_string),
                embed: embed.cloned(),
            },
        );
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
        self.record(
            &mut state,
            Call::Edit {
                message,
                edit: edit.clone(),
            },
        );
        Ok(())
    }

    async fn delete_message(&self, _channel: &ChannelRef, message: MessageId) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.messages.remove(&message).ok_or_else(|| not_found(message))?;
        self.record(&mut state, Call::Delete(message));
        Ok(())
    }

    async fn add_reaction(
        &self,
        _channel: &ChannelRef,
        message: MessageId,
        emoji: &ReactionToken,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        if let Some(budget) = state.reaction_budget.as_mut() {
            if *budget == 0 {
                return Err(PlatformError::new(PlatformErrorKind::Forbidden(
                    "add reaction".to_string(),
                )));
            }
            *budget -= 1;
        }
        let stored = state.messages.get_mut(&message).ok_or_else(|| not_found(message))?;
        match stored.reactions.iter_mut().find(|r| &r.token == emoji) {
            Some(existing) if !existing.me => {
                existing.me = true;
                existing.count += 1;
            }
            Some(_) => {}
            None => stored.reactions.push(LiveReaction::mine(emoji.clone())),
        }
        self.record(&mut state, Call::AddReaction(message, emoji.clone()));
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
        stored.reactions.retain(|r| &r.token != emoji);
        self.record(&mut state, Call::ClearReaction(message, emoji.clone()));
        Ok(())
    }

    async fn clear_reactions(&self, _channel: &ChannelRef, message: MessageId) -> PlatformResult<()> {
        let mut state = self.state.lock();
        let stored = state.messages.get_mut(&message).ok_or_else(|| not_found(message))?;
        stored.reactions.clear();
        self.record(&mut state, Call::ClearReactions(message));
        Ok(())
    }

    async fn fetch_reactions(
        &self,
        _channel: &ChannelRef,
        message: MessageId,
    ) -> PlatformResult<Vec<LiveReaction>> {
        let state = self.state.lock();
        let stored = state.messages.get(&message).ok_or_else(|| not_found(message))?;
        Ok(stored.reactions.clone())
    }
}
