//! Messages that keep themselves near the bottom of a busy channel.

use crate::{ReactiveView, ViewControl};
use async_trait::async_trait;
use quill_core::RenderPayload;
use quill_error::QuillResult;
use quill_interface::{IncomingMessage, ReactionEvent};
use tracing::debug;

/// Wraps a view and re-sends it as a new message every `interval` channel
/// messages.
///
/// The replacement goes through the normal send path, so the old message is
/// deleted only once the new one is live.
#[derive(Debug, Clone)]
pub struct Hoisted<V> {
    inner: V,
    interval: u32,
    remaining: u32,
}

impl<V: ReactiveView> Hoisted<V> {
    /// Hoist `inner` every `interval` messages (at least one).
    pub fn new(inner: V, interval: u32) -> Self {
        let interval = interval.max(1);
        Self {
            inner,
            interval,
            remaining: interval,
        }
    }

    /// The wrapped view.
    pub fn inner(&self) -> &V {
        &self.inner
    }

    /// The wrapped view, mutably.
    pub fn inner_mut(&mut self) -> &mut V {
        &mut self.inner
    }

    /// Messages left before the next re-send.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

#[async_trait]
impl<V: ReactiveView> ReactiveView for Hoisted<V> {
    async fn render(&mut self) -> QuillResult<RenderPayload> {
        self.inner.render().await
    }

    async fn on_message(
        &mut self,
        message: &IncomingMessage,
        ctl: &mut ViewControl,
    ) -> QuillResult<()> {
        self.inner.on_message(message, ctl).await?;

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            debug!(interval = self.interval, "Hoisting message");
            self.remaining = self.interval;
            ctl.request_resend();
        }
        Ok(())
    }

    async fn on_reaction_add(
        &mut self,
        reaction: &ReactionEvent,
        ctl: &mut ViewControl,
    ) -> QuillResult<()> {
        self.inner.on_reaction_add(reaction, ctl).await
    }
}
