//! Platform seam for Quill reactive messages.
//!
//! This crate defines the [`ChatPlatform`] trait every chat backend
//! implements, the identifiers it speaks in, and the [`PlatformEvent`]s it
//! delivers to the reactive layer.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod events;
mod ids;
mod traits;

pub use events::{IncomingMessage, PlatformEvent, ReactionEvent};
pub use ids::{ChannelRef, GuildId, MessageId, UserId};
pub use traits::ChatPlatform;
