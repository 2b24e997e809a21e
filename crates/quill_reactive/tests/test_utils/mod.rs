//! Test utilities for reactive message tests.
//!
//! This module provides an in-memory chat platform and sample views.

#![allow(dead_code)]

pub mod mock_platform;
pub mod views;

#[allow(unused_imports)]
pub use mock_platform::{BOT, Call, MockPlatform};
#[allow(unused_imports)]
pub use views::Menu;

use quill_core::ReactionToken;
use quill_interface::{
    ChannelRef, GuildId, IncomingMessage, MessageId, PlatformEvent, ReactionEvent, UserId,
};

/// Guild the test channel belongs to.
pub const GUILD: GuildId = GuildId(100);

/// A human user.
pub const USER: UserId = UserId(7);

/// The channel every test message lives in.
pub fn channel() -> ChannelRef {
    ChannelRef::guild(10, GUILD)
}

/// A user posting `content` in the test channel.
pub fn user_message(content: &str) -> PlatformEvent {
    PlatformEvent::MessageReceived(IncomingMessage {
        id: MessageId(1),
        channel: channel(),
        author: USER,
        content: content.to_string(),
    })
}

/// `user` reacting to `message` with `emoji`.
pub fn reaction(message: MessageId, user: UserId, emoji: &str) -> PlatformEvent {
    PlatformEvent::ReactionAdded(ReactionEvent {
        message,
        channel: channel(),
        user,
        emoji: ReactionToken::from(emoji),
    })
}
