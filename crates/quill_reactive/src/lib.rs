//! Reactive, permission-aware interactive messages.
//!
//! A [`ReactiveMessage`] owns one live chat message. Its [`ReactiveView`]
//! says what the message should look like; the message diffs every new render
//! against what the platform is showing and applies the minimal edit, waits for
//! missing permissions behind a degraded explanation, and keeps the reaction
//! row in sync.
//!
//! # Architecture
//!
//! ```text
//! EventRouter ──dispatch──▶ ReactiveMessage<V> ──render──▶ V: ReactiveView
//!      │                          │
//!      └─permission events──▶ permission gate ──▶ ChatPlatform
//! ```
//!
//! - [`EventRouter`] - registry of live instances and event fan-out
//! - [`ReactiveMessage`] - per-instance state machine behind one lock
//! - [`Hoisted`] - re-sends the message after enough channel traffic
//! - [`RoutedView`] - multi-page navigation over a [`RouteTable`](quill_core::RouteTable)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod control;
mod hoisted;
mod message;
mod routed;
mod router;
mod view;

#[cfg(feature = "discord")]
mod discord;

pub use config::{ReactiveConfig, ReactiveConfigBuilder};
pub use control::{Termination, ViewControl};
pub use hoisted::Hoisted;
pub use message::ReactiveMessage;
pub use routed::{Page, PageContext, PageFactory, RoutedView};
pub use router::{EventRouter, ListenerId, ReactiveListener};
pub use view::ReactiveView;

#[cfg(feature = "discord")]
pub use discord::{SerenityPlatform, channel_ref, incoming_message, reaction_event};
