//! Permission model and the degraded "insufficient permissions" payload.

use crate::{ChangeSet, RenderPayload};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::IntoEnumIterator;

/// A platform permission a render may depend on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum PermissionFlag {
    /// Add new reactions to a message
    #[display("Add Reactions")]
    AddReactions,
    /// Remove other users' reactions and clear reaction rows
    #[display("Manage Messages")]
    ManageMessages,
    /// Attach rich embeds
    #[display("Embed Links")]
    EmbedLinks,
}

/// An ordered set of permission flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet(BTreeSet<PermissionFlag>);

impl PermissionSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every known flag.
    pub fn all() -> Self {
        PermissionFlag::iter().collect()
    }

    /// Add a flag.
    pub fn insert(&mut self, flag: PermissionFlag) {
        self.0.insert(flag);
    }

    /// Remove a flag.
    pub fn remove(&mut self, flag: PermissionFlag) {
        self.0.remove(&flag);
    }

    /// Whether the flag is present.
    pub fn contains(&self, flag: PermissionFlag) -> bool {
        self.0.contains(&flag)
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flags in this set that `available` lacks, in flag order.
    pub fn missing_from(&self, available: &PermissionSet) -> Vec<PermissionFlag> {
        self.0.difference(&available.0).copied().collect()
    }

    /// Iterate flags in order.
    pub fn iter(&self) -> impl Iterator<Item = PermissionFlag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<PermissionFlag> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionFlag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Permissions needed to apply a change set.
///
/// Reaction changes need `AddReactions`, plus `ManageMessages` when reaction
/// positions are enforced. Setting an embed needs `EmbedLinks`. Nothing else
/// imposes a requirement.
///
/// # Examples
///
/// ```
/// use quill_core::{PermissionFlag, RenderPayload, diff, required_permissions};
///
/// let payload = RenderPayload::builder().content("hi").reaction("A").build().unwrap();
/// let required = required_permissions(&diff(None, &payload), false);
/// assert!(required.contains(PermissionFlag::AddReactions));
/// assert!(!required.contains(PermissionFlag::ManageMessages));
/// ```
pub fn required_permissions(changes: &ChangeSet, enforce_positions: bool) -> PermissionSet {
    let mut required = PermissionSet::new();

    if changes.reactions().is_some() {
        required.insert(PermissionFlag::AddReactions);
        if enforce_positions {
            required.insert(PermissionFlag::ManageMessages);
        }
    }

    if changes.sets_embed() {
        required.insert(PermissionFlag::EmbedLinks);
    }

    required
}

/// Join words the way a sentence would: `a`, `a and b`, `a, b and c`.
pub fn human_join_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => AsRef::<str>::as_ref(only).to_string(),
        [init @ .., last] => {
            let head = init
                .iter()
                .map(|item| AsRef::<str>::as_ref(item))
                .collect::<Vec<&str>>()
                .join(", ");
            format!("{} and {}", head, AsRef::<str>::as_ref(last))
        }
    }
}

/// User-facing explanation of which permissions are missing.
pub fn describe_missing(missing: &[PermissionFlag]) -> String {
    let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
    format!(
        "this message requires {} permission(s) in order to be rendered properly\n\
         Normal execution should resume if permissions are satisfied",
        human_join_list(&names)
    )
}

/// Content-only payload shown while permissions are missing.
pub fn degraded_payload(missing: &[PermissionFlag]) -> RenderPayload {
    RenderPayload::text(describe_missing(missing))
}
