//! Sample views for testing.

use async_trait::async_trait;
use quill_core::{EmbedDescriptor, ReactionToken, RenderPayload};
use quill_error::QuillResult;
use quill_interface::{IncomingMessage, ReactionEvent};
use quill_reactive::{ReactiveView, ViewControl};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A menu whose every render input is a public field.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    pub content: Option<String>,
    pub embed: Option<EmbedDescriptor>,
    pub reactions: Vec<&'static str>,
    pub group: Option<&'static str>,
    pub seen_reactions: Vec<ReactionToken>,
    pub seen_messages: Vec<String>,
    pub renders: Arc<AtomicUsize>,
}

impl Menu {
    pub fn text(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            ..Self::default()
        }
    }

    pub fn with_reactions(mut self, reactions: &[&'static str]) -> Self {
        self.reactions = reactions.to_vec();
        self
    }

    pub fn with_embed(mut self, title: &str) -> Self {
        self.embed = Some(EmbedDescriptor::default().title(title));
        self
    }

    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReactiveView for Menu {
    async fn render(&mut self) -> QuillResult<RenderPayload> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        let mut builder = RenderPayload::builder();
        if let Some(content) = &self.content {
            builder.content(content.clone());
        }
        if let Some(embed) = &self.embed {
            builder.embed(embed.clone());
        }
        for reaction in &self.reactions {
            builder.reaction(*reaction);
        }
        if let Some(group) = self.group {
            builder.reaction_group(group);
        }
        Ok(builder.build()?)
    }

    async fn on_message(
        &mut self,
        message: &IncomingMessage,
        _ctl: &mut ViewControl,
    ) -> QuillResult<()> {
        self.seen_messages.push(message.content.clone());
        Ok(())
    }

    async fn on_reaction_add(
        &mut self,
        reaction: &ReactionEvent,
        ctl: &mut ViewControl,
    ) -> QuillResult<()> {
        self.seen_reactions.push(reaction.emoji.clone());
        ctl.update(
            &mut self.content,
            Some(format!("reacted with {}", reaction.emoji)),
        );
        Ok(())
    }
}
