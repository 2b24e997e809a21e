//! Multi-page reactive messages driven by a route table.
//!
//! A [`RoutedView`] keeps a dot-separated route string and resolves it
//! lazily at render time. Moving to a different page type runs the old page's
//! [`Page::on_leave`] and a fresh page's [`Page::on_enter`]; moving between
//! routes that land on the same page type only swaps the captured arguments.

use crate::{ReactiveView, ViewControl};
use async_trait::async_trait;
use quill_core::{RenderPayload, RouteArgs, RouteTable};
use quill_error::{QuillResult, RenderError};
use quill_interface::{IncomingMessage, ReactionEvent};
use std::any::TypeId;
use std::sync::Arc;
use tracing::debug;

/// One page of a routed message.
///
/// `S` is the state shared by all pages of the message.
#[async_trait]
pub trait Page<S: Send + Sync>: Send {
    /// Render the page.
    async fn render(&mut self, state: &S, args: &RouteArgs) -> QuillResult<RenderPayload>;

    /// The page became current.
    async fn on_enter(&mut self, _state: &mut S, _args: &RouteArgs) -> QuillResult<()> {
        Ok(())
    }

    /// The page stops being current; the instance is dropped afterwards.
    async fn on_leave(&mut self, _state: &mut S, _args: &RouteArgs) -> QuillResult<()> {
        Ok(())
    }

    /// A user posted in the channel while this page is current.
    async fn on_message(
        &mut self,
        _message: &IncomingMessage,
        _ctx: &mut PageContext<'_, S>,
    ) -> QuillResult<()> {
        Ok(())
    }

    /// A user reacted while this page is current.
    async fn on_reaction_add(
        &mut self,
        _reaction: &ReactionEvent,
        _ctx: &mut PageContext<'_, S>,
    ) -> QuillResult<()> {
        Ok(())
    }
}

/// What a page sees while handling an event.
pub struct PageContext<'a, S> {
    /// Shared state of the routed message
    pub state: &'a mut S,
    /// Arguments captured by the current route
    pub args: &'a RouteArgs,
    route: &'a mut String,
    ctl: &'a mut ViewControl,
}

impl<S> PageContext<'_, S> {
    /// Current route string.
    pub fn route(&self) -> &str {
        self.route.as_str()
    }

    /// Navigate; the new route is resolved at the next render.
    pub fn navigate(&mut self, path: impl Into<String>) {
        let path = path.into();
        if self.ctl.update(&mut *self.route, path) {
            debug!(route = %self.route, "Navigating");
        }
    }

    /// Control handle of the owning message.
    pub fn control(&mut self) -> &mut ViewControl {
        &mut *self.ctl
    }
}

/// Builds fresh instances of one page type.
///
/// Two factories producing the same page type count as the same page for
/// lifecycle purposes.
pub struct PageFactory<S: Send + Sync> {
    type_id: TypeId,
    name: &'static str,
    build: Arc<dyn Fn() -> Box<dyn Page<S>> + Send + Sync>,
}

impl<S: Send + Sync> Clone for PageFactory<S> {
    fn clone(&self) -> Self {
        Self {
            type_id: self.type_id,
            name: self.name,
            build: Arc::clone(&self.build),
        }
    }
}

impl<S: Send + Sync> std::fmt::Debug for PageFactory<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PageFactory").field(&self.name).finish()
    }
}

impl<S: Send + Sync + 'static> PageFactory<S> {
    /// Factory for a default-constructible page.
    pub fn of<P>() -> Self
    where
        P: Page<S> + Default + 'static,
    {
        Self::new(P::default)
    }

    /// Factory from a constructor.
    pub fn new<P, F>(build: F) -> Self
    where
        P: Page<S> + 'static,
        F: Fn() -> P + Send + Sync + 'static,
    {
        Self {
            type_id: TypeId::of::<P>(),
            name: std::any::type_name::<P>(),
            build: Arc::new(move || Box::new(build()) as Box<dyn Page<S>>),
        }
    }

    /// Type name of the page, for logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn build(&self) -> Box<dyn Page<S>> {
        (self.build)()
    }
}

struct CurrentPage<S: Send + Sync> {
    type_id: TypeId,
    name: &'static str,
    page: Box<dyn Page<S>>,
    args: RouteArgs,
}

/// A reactive view navigating between pages.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use quill_core::{RenderPayload, Route, RouteArgs, RouteTable};
/// use quill_error::QuillResult;
/// use quill_reactive::{Page, PageFactory, RoutedView};
///
/// #[derive(Default)]
/// struct Home;
///
/// #[async_trait]
/// impl Page<()> for Home {
///     async fn render(&mut self, _: &(), _: &RouteArgs) -> QuillResult<RenderPayload> {
///         Ok(RenderPayload::text("home"))
///     }
/// }
///
/// let table = RouteTable::new(Route::new().base(PageFactory::of::<Home>()));
/// let view = RoutedView::new(table, ()).unwrap();
/// assert_eq!(view.route(), "");
/// ```
pub struct RoutedView<S: Send + Sync> {
    table: Arc<RouteTable<PageFactory<S>>>,
    state: S,
    route: String,
    current: Option<CurrentPage<S>>,
}

impl<S: Send + Sync + 'static> RoutedView<S> {
    /// Create a view starting at the empty route.
    ///
    /// # Errors
    ///
    /// Rejects a table with a route node that cannot be terminated on.
    pub fn new(table: impl Into<Arc<RouteTable<PageFactory<S>>>>, state: S) -> QuillResult<Self> {
        let table = table.into();
        table.validate()?;
        Ok(Self {
            table,
            state,
            route: String::new(),
            current: None,
        })
    }

    /// Current route string.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Shared page state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Shared page state, mutably.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Type name of the current page, once one has been rendered.
    pub fn current_page(&self) -> Option<&'static str> {
        self.current.as_ref().map(|c| c.name)
    }

    /// Navigate from outside a page; resolved at the next render.
    pub fn set_route(&mut self, path: impl Into<String>, ctl: &mut ViewControl) {
        ctl.update(&mut self.route, path.into());
    }

    async fn resolve_current(&mut self) -> QuillResult<()> {
        let resolved = self.table.resolve(&self.route)?;

        if let Some(current) = self.current.as_mut()
            && current.type_id == resolved.page.type_id
        {
            current.args = resolved.args;
            return Ok(());
        }

        if let Some(mut old) = self.current.take() {
            debug!(page = old.name, "Leaving page");
            old.page.on_leave(&mut self.state, &old.args).await?;
        }

        let mut page = resolved.page.build();
        debug!(page = resolved.page.name(), route = %self.route, "Entering page");
        page.on_enter(&mut self.state, &resolved.args).await?;
        self.current = Some(CurrentPage {
            type_id: resolved.page.type_id,
            name: resolved.page.name(),
            page,
            args: resolved.args,
        });
        Ok(())
    }
}

#[async_trait]
impl<S: Send + Sync + 'static> ReactiveView for RoutedView<S> {
    async fn render(&mut self) -> QuillResult<RenderPayload> {
        self.resolve_current().await?;
        match self.current.as_mut() {
            Some(current) => current.page.render(&self.state, &current.args).await,
            None => Err(RenderError::new("no page resolved").into()),
        }
    }

    async fn on_message(
        &mut self,
        message: &IncomingMessage,
        ctl: &mut ViewControl,
    ) -> QuillResult<()> {
        let Some(current) = self.current.as_mut() else {
            return Ok(());
        };
        let mut ctx = PageContext {
            state: &mut self.state,
            args: &current.args,
            route: &mut self.route,
            ctl,
        };
        current.page.on_message(message, &mut ctx).await
    }

    async fn on_reaction_add(
        &mut self,
        reaction: &ReactionEvent,
        ctl: &mut ViewControl,
    ) -> QuillResult<()> {
        let Some(current) = self.current.as_mut() else {
            return Ok(());
        };
        let mut ctx = PageContext {
            state: &mut self.state,
            args: &current.args,
            route: &mut self.route,
            ctl,
        };
        current.page.on_reaction_add(reaction, &mut ctx).await
    }
}
