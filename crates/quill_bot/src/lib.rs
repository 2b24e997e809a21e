//! Discord bot runner for quill reactive messages.
//!
//! Wires a serenity client to an [`EventRouter`](quill_reactive::EventRouter)
//! and ships a few demonstration menus behind text commands.
//!
//! - [`BotConfig`] - layered TOML and environment configuration
//! - [`init_tracing`] - tracing subscriber setup
//! - [`QuillHandler`] - gateway events in, platform events out
//! - [`MenuCommand`] - `reactive-menu`, `reactive-menu-hoist`, `reactive-menu-route`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod handler;
mod menus;
mod telemetry;

pub use config::{BotConfig, BotSection, LoggingConfig};
pub use handler::QuillHandler;
pub use menus::{KEYCAPS, MenuCommand, NamedPage, PageA, PageB, RootPage, ToggleMenu, route_demo};
pub use telemetry::init_tracing;
