//! Diff engine between two render payloads.

use crate::{EmbedDescriptor, ReactionToken, RenderPayload};

/// A single field change.
///
/// A key absent from a [`ChangeSet`] was not touched; `Cleared` means it was
/// set before and is now explicitly gone.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    /// New value
    Set(T),
    /// Previously present, now absent
    Cleared,
}

impl<T> Change<T> {
    /// The new value, or `None` when cleared.
    pub fn value(&self) -> Option<&T> {
        match self {
            Change::Set(value) => Some(value),
            Change::Cleared => None,
        }
    }
}

/// Message body edits, the part of a change set that an edit call carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageEdit {
    /// Content change, if any
    pub content: Option<Change<String>>,
    /// Embed change, if any
    pub embed: Option<Change<EmbedDescriptor>>,
}

/// Keys whose values differ between two payloads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    content: Option<Change<String>>,
    embed: Option<Change<EmbedDescriptor>>,
    reactions: Option<Vec<ReactionToken>>,
    reaction_group_changed: bool,
}

impl ChangeSet {
    /// True when nothing differs.
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.embed.is_none() && self.reactions.is_none()
    }

    /// Content change.
    pub fn content(&self) -> Option<&Change<String>> {
        self.content.as_ref()
    }

    /// Embed change.
    pub fn embed(&self) -> Option<&Change<EmbedDescriptor>> {
        self.embed.as_ref()
    }

    /// New reaction row, present when the row or its group changed.
    pub fn reactions(&self) -> Option<&[ReactionToken]> {
        self.reactions.as_deref()
    }

    /// Whether the reaction row must be rebuilt rather than diffed.
    pub fn reaction_group_changed(&self) -> bool {
        self.reaction_group_changed
    }

    /// Whether an embed is being set (as opposed to cleared or untouched).
    pub fn sets_embed(&self) -> bool {
        matches!(self.embed, Some(Change::Set(_)))
    }

    /// Body edits for an edit-message call, if the body changed at all.
    pub fn message_edit(&self) -> Option<MessageEdit> {
        if self.content.is_none() && self.embed.is_none() {
            return None;
        }
        Some(MessageEdit {
            content: self.content.clone(),
            embed: self.embed.clone(),
        })
    }
}

fn field_change<T: Clone>(
    old: Option<&T>,
    new: Option<&T>,
    same: impl Fn(&T, &T) -> bool,
) -> Option<Change<T>> {
    match (old, new) {
        (None, None) => None,
        (Some(a), Some(b)) if same(a, b) => None,
        (_, Some(b)) => Some(Change::Set(b.clone())),
        (Some(_), None) => Some(Change::Cleared),
    }
}

/// Compute the minimal change set turning `old` into `new`.
///
/// `old == None` means nothing has been displayed yet, so every field present
/// in `new` is reported. Pure and deterministic: `diff(Some(&a), &a)` is empty.
///
/// # Examples
///
/// ```
/// use quill_core::{RenderPayload, diff};
///
/// let old = RenderPayload::text("one");
/// let new = RenderPayload::text("two");
/// assert!(diff(Some(&old), &old).is_empty());
/// assert!(diff(Some(&old), &new).content().is_some());
/// ```
pub fn diff(old: Option<&RenderPayload>, new: &RenderPayload) -> ChangeSet {
    let old_content = old.and_then(|o| o.content());
    let content = match (old_content, new.content()) {
        (None, None) => None,
        (Some(a), Some(b)) if a == b => None,
        (_, Some(b)) => Some(Change::Set(b.to_string())),
        (Some(_), None) => Some(Change::Cleared),
    };

    let embed = field_change(
        old.and_then(|o| o.embed()),
        new.embed(),
        EmbedDescriptor::renders_same_as,
    );

    let old_group = old.and_then(|o| o.reaction_group());
    let reaction_group_changed = old_group != new.reaction_group();
    let old_reactions: &[ReactionToken] = old.map(|o| o.reactions()).unwrap_or(&[]);
    let reactions = (reaction_group_changed || old_reactions != new.reactions())
        .then(|| new.reactions().to_vec());

    ChangeSet {
        content,
        embed,
        reactions,
        reaction_group_changed,
    }
}
