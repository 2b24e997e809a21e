//! Demonstration menus exercising the reactive message framework.
//!
//! - [`ToggleMenu`] flips parts of its own payload from reactions
//! - [`Hoisted`]`<ToggleMenu>` does the same and follows channel traffic
//! - [`route_demo`] navigates a small page tree from typed messages

use async_trait::async_trait;
use derive_getters::Getters;
use quill_core::{EmbedDescriptor, RenderPayload, Route, RouteArgs, RouteTable};
use quill_error::QuillResult;
use quill_interface::{ChannelRef, IncomingMessage, ReactionEvent};
use quill_reactive::{
    EventRouter, Hoisted, Page, PageContext, PageFactory, ReactiveView, RoutedView, ViewControl,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Keycap emoji one to five.
pub const KEYCAPS: [&str; 5] = [
    "1\u{fe0f}\u{20e3}",
    "2\u{fe0f}\u{20e3}",
    "3\u{fe0f}\u{20e3}",
    "4\u{fe0f}\u{20e3}",
    "5\u{fe0f}\u{20e3}",
];

const ONE: &str = KEYCAPS[0];
const TWO: &str = KEYCAPS[1];
const THREE: &str = KEYCAPS[2];
const FIVE: &str = KEYCAPS[4];

/// Text commands that open a menu in the invoking channel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum MenuCommand {
    /// `reactive-menu`
    ReactiveMenu,
    /// `reactive-menu-hoist`
    ReactiveMenuHoist,
    /// `reactive-menu-route`
    ReactiveMenuRoute,
}

impl MenuCommand {
    /// Parse `<prefix><command>` from a message body.
    ///
    /// ```
    /// use quill_bot::MenuCommand;
    ///
    /// assert_eq!(
    ///     MenuCommand::parse("!", "!reactive-menu-hoist"),
    ///     Some(MenuCommand::ReactiveMenuHoist)
    /// );
    /// assert_eq!(MenuCommand::parse("!", "reactive-menu"), None);
    /// ```
    pub fn parse(prefix: &str, content: &str) -> Option<Self> {
        let name = content.trim().strip_prefix(prefix)?;
        let name = name.split_whitespace().next()?;
        name.parse().ok()
    }

    /// Instantiate the menu in `channel`.
    ///
    /// # Errors
    ///
    /// Returns the first send's error.
    #[instrument(skip(router), fields(channel = %channel))]
    pub async fn open(self, router: &Arc<EventRouter>, channel: ChannelRef) -> QuillResult<()> {
        match self {
            MenuCommand::ReactiveMenu => {
                router.instantiate(ToggleMenu::new(), channel).await?;
            }
            MenuCommand::ReactiveMenuHoist => {
                let interval = *router.config().hoist_interval();
                router
                    .instantiate(Hoisted::new(ToggleMenu::hoisting(), interval), channel)
                    .await?;
            }
            MenuCommand::ReactiveMenuRoute => {
                router.instantiate(route_demo()?, channel).await?;
            }
        }
        info!(command = %self, "Menu opened");
        Ok(())
    }
}

/// Five keycaps; 1 toggles the reaction row, 2 the embed, 3 the text.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ToggleMenu {
    /// Reaction row shown
    show_reactions: bool,
    /// Embed shown
    show_embed: bool,
    /// Alternate text shown
    alternate_text: bool,
    #[getter(skip)]
    title: &'static str,
}

impl Default for ToggleMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl ToggleMenu {
    /// Menu with its reaction row shown.
    pub fn new() -> Self {
        Self {
            show_reactions: true,
            show_embed: false,
            alternate_text: false,
            title: "Reactive message test: every toggle is an in-place edit",
        }
    }

    /// Variant whose embed mentions hoisting.
    pub fn hoisting() -> Self {
        Self {
            title: "Reactive message test: every toggle is an in-place edit\n\
                    The menu re-posts itself as the channel fills up",
            ..Self::new()
        }
    }

    fn embed(&self) -> EmbedDescriptor {
        EmbedDescriptor::default()
            .title(self.title)
            .description("Rendered from plain state; the framework works out the edits")
    }
}

#[async_trait]
impl ReactiveView for ToggleMenu {
    async fn render(&mut self) -> QuillResult<RenderPayload> {
        let mut payload = RenderPayload::builder();
        payload.content(if self.alternate_text {
            "hey"
        } else {
            "reactions :p"
        });
        if self.show_embed {
            payload.embed(self.embed());
        }
        if self.show_reactions {
            for keycap in KEYCAPS {
                payload.reaction(keycap);
            }
        }
        Ok(payload.build()?)
    }

    async fn on_reaction_add(
        &mut self,
        reaction: &ReactionEvent,
        ctl: &mut ViewControl,
    ) -> QuillResult<()> {
        match reaction.emoji.as_str() {
            e if e == ONE => {
                let next = !self.show_reactions;
                ctl.update(&mut self.show_reactions, next);
            }
            e if e == TWO => {
                let next = !self.show_embed;
                ctl.update(&mut self.show_embed, next);
            }
            e if e == THREE => {
                let next = !self.alternate_text;
                ctl.update(&mut self.alternate_text, next);
            }
            _ => {}
        }
        Ok(())
    }
}

/// Routed demonstration menu.
///
/// ```text
/// (root)        RootPage
/// ├ a           PageA
/// ├ b           PageB
/// │ └ <n>       NamedPage
/// └ <n>         NamedPage
/// ```
///
/// # Errors
///
/// Never fails for this tree; the result comes from table validation.
pub fn route_demo() -> QuillResult<RoutedView<()>> {
    let table = RouteTable::new(
        Route::new()
            .base(PageFactory::of::<RootPage>())
            .page("a", PageFactory::of::<PageA>())
            .route(
                "b",
                Route::new()
                    .base(PageFactory::of::<PageB>())
                    .fallback("n", PageFactory::of::<NamedPage>()),
            )
            .fallback("n", PageFactory::of::<NamedPage>()),
    )
    .with_error_page(PageFactory::of::<RootPage>());

    RoutedView::new(table, ())
}

const ROUTE_MAP: &str = "Root\n├ Page 'a'\n├ Page 'b'\n│ ├ (base page)\n│ └ (fallback page)\n└ (fallback page)";

/// Back to the root on `back`; returns whether it matched.
fn go_back(message: &IncomingMessage, ctx: &mut PageContext<'_, ()>) -> bool {
    if message.content.trim() == "back" {
        ctx.navigate("");
        true
    } else {
        false
    }
}

/// Route segments may not contain the separator.
fn segment(text: &str, limit: usize) -> String {
    text.trim().chars().filter(|c| *c != '.').take(limit).collect()
}

/// Root page; typing one character opens the page of that name.
#[derive(Debug, Default)]
pub struct RootPage;

#[async_trait]
impl Page<()> for RootPage {
    async fn render(&mut self, _: &(), _: &RouteArgs) -> QuillResult<RenderPayload> {
        Ok(RenderPayload::builder()
            .content("Route page")
            .embed(
                EmbedDescriptor::default()
                    .description("Type a single character to open a page")
                    .field("Map", ROUTE_MAP, false),
            )
            .build()?)
    }

    async fn on_message(
        &mut self,
        message: &IncomingMessage,
        ctx: &mut PageContext<'_, ()>,
    ) -> QuillResult<()> {
        let target = segment(&message.content, 2);
        if target.chars().count() == 1 {
            ctx.navigate(target);
        }
        Ok(())
    }
}

/// Literal page `a`.
#[derive(Debug, Default)]
pub struct PageA;

#[async_trait]
impl Page<()> for PageA {
    async fn render(&mut self, _: &(), _: &RouteArgs) -> QuillResult<RenderPayload> {
        Ok(RenderPayload::builder()
            .content("Page A! (type back to go back to root)")
            .reaction(ONE)
            .reaction(TWO)
            .reaction(FIVE)
            .build()?)
    }

    async fn on_message(
        &mut self,
        message: &IncomingMessage,
        ctx: &mut PageContext<'_, ()>,
    ) -> QuillResult<()> {
        go_back(message, ctx);
        Ok(())
    }
}

/// Base page of route `b`; other text opens `b.<text>`.
#[derive(Debug, Default)]
pub struct PageB;

#[async_trait]
impl Page<()> for PageB {
    async fn render(&mut self, _: &(), _: &RouteArgs) -> QuillResult<RenderPayload> {
        Ok(RenderPayload::builder()
            .content("Page B! (type back to go back to root, or anything else to go deeper)")
            .reaction(ONE)
            .reaction(TWO)
            .reaction(FIVE)
            .build()?)
    }

    async fn on_message(
        &mut self,
        message: &IncomingMessage,
        ctx: &mut PageContext<'_, ()>,
    ) -> QuillResult<()> {
        if go_back(message, ctx) {
            return Ok(());
        }
        let name = segment(&message.content, 10);
        if !name.is_empty() {
            ctx.navigate(format!("b.{}", name));
        }
        Ok(())
    }
}

/// Fallback page showing the captured segment.
#[derive(Debug, Default)]
pub struct NamedPage;

#[async_trait]
impl Page<()> for NamedPage {
    async fn render(&mut self, _: &(), args: &RouteArgs) -> QuillResult<RenderPayload> {
        let name = args.get("n").map(String::as_str).unwrap_or_default();
        Ok(RenderPayload::builder()
            .content(format!("Page named {}", name))
            .reaction(ONE)
            .reaction(FIVE)
            .reaction(TWO)
            .build()?)
    }

    async fn on_message(
        &mut self,
        message: &IncomingMessage,
        ctx: &mut PageContext<'_, ()>,
    ) -> QuillResult<()> {
        go_back(message, ctx);
        Ok(())
    }
}
