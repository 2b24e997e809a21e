//! Declarative render output.

use crate::{EmbedDescriptor, ReactionToken};
use quill_error::BuilderError;
use serde::{Deserialize, Serialize};

/// What a reactive message wants the platform to show.
///
/// Produced by a view's render call. A payload without content and without an
/// embed cannot create a message, but is a valid update when only the
/// reactions change.
///
/// # Examples
///
/// ```
/// use quill_core::RenderPayload;
///
/// let payload = RenderPayload::builder()
///     .content("Page A")
///     .reaction("1\u{fe0f}\u{20e3}")
///     .reaction("2\u{fe0f}\u{20e3}")
///     .build()
///     .unwrap();
///
/// assert_eq!(payload.content(), Some("Page A"));
/// assert_eq!(payload.reactions().len(), 2);
/// assert!(payload.is_creatable());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into), default, build_fn(error = "BuilderError"))]
pub struct RenderPayload {
    /// Plain text body
    #[serde(default)]
    #[builder(setter(strip_option))]
    content: Option<String>,

    /// Rich embed block
    #[serde(default)]
    #[builder(setter(strip_option))]
    embed: Option<EmbedDescriptor>,

    /// Desired reactions, order-significant
    #[serde(default)]
    #[builder(setter(each(name = "reaction", into)))]
    reactions: Vec<ReactionToken>,

    /// Opaque tag; a different tag means the reaction row is unrelated
    #[serde(default)]
    #[builder(setter(strip_option))]
    reaction_group: Option<String>,
}

impl RenderPayload {
    /// Creates a new payload builder.
    pub fn builder() -> RenderPayloadBuilder {
        RenderPayloadBuilder::default()
    }

    /// Content-only payload.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Plain text body.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Rich embed block.
    pub fn embed(&self) -> Option<&EmbedDescriptor> {
        self.embed.as_ref()
    }

    /// Desired reactions in order.
    pub fn reactions(&self) -> &[ReactionToken] {
        &self.reactions
    }

    /// Reaction grouping tag.
    pub fn reaction_group(&self) -> Option<&str> {
        self.reaction_group.as_deref()
    }

    /// Whether this payload can create a new message.
    pub fn is_creatable(&self) -> bool {
        self.content.is_some() || self.embed.is_some()
    }

    /// Replace the reaction row, keeping everything else.
    pub fn with_reactions(mut self, reactions: Vec<ReactionToken>) -> Self {
        self.reactions = reactions;
        self
    }

    /// Overwrite the reaction row in place.
    pub fn set_reactions(&mut self, reactions: Vec<ReactionToken>) {
        self.reactions = reactions;
    }
}
