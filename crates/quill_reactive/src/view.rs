//! The trait features implement to drive a reactive message.

use crate::ViewControl;
use async_trait::async_trait;
use quill_core::RenderPayload;
use quill_error::QuillResult;
use quill_interface::{IncomingMessage, ReactionEvent};

/// What a reactive message shows and how it reacts to users.
///
/// Hooks only see events that concern the message: messages posted in its
/// channel and reactions added to it, never the bot's own, and only while the
/// message is rendered properly.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use quill_core::RenderPayload;
/// use quill_error::QuillResult;
/// use quill_interface::ReactionEvent;
/// use quill_reactive::{ReactiveView, ViewControl};
///
/// struct Counter(u32);
///
/// #[async_trait]
/// impl ReactiveView for Counter {
///     async fn render(&mut self) -> QuillResult<RenderPayload> {
///         Ok(RenderPayload::builder()
///             .content(format!("clicked {} times", self.0))
///             .reaction("\u{2795}")
///             .build()?)
///     }
///
///     async fn on_reaction_add(
///         &mut self,
///         _reaction: &ReactionEvent,
///         ctl: &mut ViewControl,
///     ) -> QuillResult<()> {
///         let next = self.0 + 1;
///         ctl.update(&mut self.0, next);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ReactiveView: Send + 'static {
    /// Produce the payload the message should currently show.
    async fn render(&mut self) -> QuillResult<RenderPayload>;

    /// A user posted in the message's channel.
    async fn on_message(
        &mut self,
        _message: &IncomingMessage,
        _ctl: &mut ViewControl,
    ) -> QuillResult<()> {
        Ok(())
    }

    /// A user reacted to the message.
    async fn on_reaction_add(
        &mut self,
        _reaction: &ReactionEvent,
        _ctl: &mut ViewControl,
    ) -> QuillResult<()> {
        Ok(())
    }
}
