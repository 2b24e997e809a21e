//! Test utilities for the demonstration menus.

#![allow(dead_code)]

pub mod mock_platform;

#[allow(unused_imports)]
pub use mock_platform::{BOT, MockPlatform};

use quill_core::ReactionToken;
use quill_interface::{
    ChannelRef, GuildId, IncomingMessage, MessageId, PlatformEvent, ReactionEvent, UserId,
};

/// A human user.
pub const USER: UserId = UserId(7);

/// The channel menus are opened in.
pub fn channel() -> ChannelRef {
    ChannelRef::guild(10, GuildId(100))
}

/// A user typing `content` in the test channel.
pub fn user_message(content: &str) -> PlatformEvent {
    PlatformEvent::MessageReceived(IncomingMessage {
        id: MessageId(1),
        channel: channel(),
        author: USER,
        content: content.to_string(),
    })
}

/// A user pressing `emoji` under `message`.
pub fn press(message: MessageId, emoji: &str) -> PlatformEvent {
    PlatformEvent::ReactionAdded(ReactionEvent {
        message,
        channel: channel(),
        user: USER,
        emoji: ReactionToken::from(emoji),
    })
}
