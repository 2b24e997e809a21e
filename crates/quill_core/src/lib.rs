//! Core data types for Quill reactive messages.
//!
//! Everything in this crate is pure and synchronous: it describes what a
//! reactive message wants to show and computes what has to change, without
//! talking to a chat platform.
//!
//! - [`RenderPayload`] - declarative render output (content, embed, reactions)
//! - [`diff`] - minimal [`ChangeSet`] between two payloads
//! - [`required_permissions`] - what a change set needs from the platform
//! - [`plan_reaction_sync`] - reaction operations converging live onto desired
//! - [`RouteTable`] - dot-separated path resolution for multi-page menus

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod diff;
mod embed;
mod payload;
mod permission;
mod reaction;
mod route;
mod sync;

pub use diff::{Change, ChangeSet, MessageEdit, diff};
pub use embed::{EmbedDescriptor, EmbedField};
pub use payload::{RenderPayload, RenderPayloadBuilder};
pub use permission::{
    PermissionFlag, PermissionSet, degraded_payload, describe_missing, human_join_list,
    required_permissions,
};
pub use reaction::{LiveReaction, ReactionToken};
pub use route::{Resolved, Route, RouteArgs, RouteTable};
pub use sync::{
    ReactionOp, ReactionPlan, plan_additive, plan_reaction_patch, plan_reaction_sync,
};
