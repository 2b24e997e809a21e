//! Route tree for multi-page reactive messages.
//!
//! A route string is a dot-separated path (`"b.hello"`). Each [`Route`] node
//! maps literal segments to children, may capture one segment into a named
//! variable (fallback), may capture everything that is left (vararg), and may
//! carry a base page used when the path ends on the node itself.
//!
//! The tree is generic over the leaf type `P` so resolution stays pure; the
//! reactive crate instantiates it with page factories.

use quill_error::{RouteError, RouteErrorKind};
use std::collections::BTreeMap;
use tracing::trace;

/// Variables captured while resolving a path.
pub type RouteArgs = BTreeMap<String, String>;

#[derive(Debug, Clone)]
enum Node<P> {
    Route(Route<P>),
    Page(P),
}

/// An internal node of the route tree.
///
/// # Examples
///
/// ```
/// use quill_core::{Route, RouteTable};
///
/// let table = RouteTable::new(
///     Route::new()
///         .base("root")
///         .page("a", "page-a")
///         .route("b", Route::new().base("page-b").fallback("n", "named")),
/// );
///
/// let resolved = table.resolve("b.hello").unwrap();
/// assert_eq!(resolved.page, "named");
/// assert_eq!(resolved.args["n"], "hello");
/// ```
#[derive(Debug, Clone)]
pub struct Route<P> {
    children: BTreeMap<String, Node<P>>,
    fallback: Option<(String, Box<Node<P>>)>,
    vararg: Option<(String, P)>,
    base: Option<P>,
}

impl<P> Default for Route<P> {
    fn default() -> Self {
        Self {
            children: BTreeMap::new(),
            fallback: None,
            vararg: None,
            base: None,
        }
    }
}

impl<P> Route<P> {
    /// Empty route node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Literal segment leading to a page.
    pub fn page(mut self, segment: impl Into<String>, page: P) -> Self {
        self.children.insert(segment.into(), Node::Page(page));
        self
    }

    /// Literal segment leading to a sub-route.
    pub fn route(mut self, segment: impl Into<String>, route: Route<P>) -> Self {
        self.children.insert(segment.into(), Node::Route(route));
        self
    }

    /// Capture any one unmatched segment as `var` and continue at a page.
    pub fn fallback(mut self, var: impl Into<String>, page: P) -> Self {
        self.fallback = Some((var.into(), Box::new(Node::Page(page))));
        self
    }

    /// Capture any one unmatched segment as `var` and continue at a sub-route.
    pub fn fallback_route(mut self, var: impl Into<String>, route: Route<P>) -> Self {
        self.fallback = Some((var.into(), Box::new(Node::Route(route))));
        self
    }

    /// Capture all remaining segments, joined by `.`, as `var`.
    pub fn vararg(mut self, var: impl Into<String>, page: P) -> Self {
        self.vararg = Some((var.into(), page));
        self
    }

    /// Page shown when the path ends on this node.
    pub fn base(mut self, page: P) -> Self {
        self.base = Some(page);
        self
    }

    fn check_bases(&self, at: &str) -> Result<(), RouteError> {
        if self.base.is_none() {
            return Err(RouteError::new(RouteErrorKind::MissingBase(at.to_string())));
        }
        let join = |segment: &str| {
            if at.is_empty() {
                segment.to_string()
            } else {
                format!("{}.{}", at, segment)
            }
        };
        for (segment, child) in &self.children {
            if let Node::Route(route) = child {
                route.check_bases(&join(segment))?;
            }
        }
        if let Some((var, child)) = &self.fallback
            && let Node::Route(route) = child.as_ref()
        {
            route.check_bases(&join(&format!("<{}>", var)))?;
        }
        Ok(())
    }
}

/// A resolved path: the leaf and the captured variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<P> {
    /// Page the path leads to
    pub page: P,
    /// Captured variables
    pub args: RouteArgs,
}

/// Route tree root with an optional error page.
#[derive(Debug, Clone)]
pub struct RouteTable<P> {
    root: Route<P>,
    error_page: Option<P>,
}

impl<P: Clone> RouteTable<P> {
    /// Table without an error page; unresolvable paths are configuration errors.
    pub fn new(root: Route<P>) -> Self {
        Self {
            root,
            error_page: None,
        }
    }

    /// Page shown for paths that match nothing.
    pub fn with_error_page(mut self, page: P) -> Self {
        self.error_page = Some(page);
        self
    }

    /// Resolve a dot-separated path.
    ///
    /// Empty segments are skipped, so `""` resolves to the root's base page.
    /// At each node a literal child wins over the fallback, which wins over
    /// the vararg capture. A path that matches nothing, or that ends on a
    /// route without a base page, resolves to the error page when configured.
    ///
    /// # Errors
    ///
    /// Returns [`RouteErrorKind::Unresolvable`] when the path matches nothing
    /// and no error page is configured.
    pub fn resolve(&self, path: &str) -> Result<Resolved<P>, RouteError> {
        let segments: Vec<&str> = path.split('.').collect();
        let mut args = RouteArgs::new();
        let mut at_route = &self.root;
        let mut at_page: Option<&P> = None;

        for (idx, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                continue;
            }
            if at_page.is_some() {
                trace!(path, segment, "Segment past a leaf page");
                return self.unmatched(path);
            }

            let next = if let Some(child) = at_route.children.get(*segment) {
                child
            } else if let Some((var, child)) = &at_route.fallback {
                args.insert(var.clone(), segment.to_string());
                child.as_ref()
            } else if let Some((var, page)) = &at_route.vararg {
                args.insert(var.clone(), segments[idx..].join("."));
                return Ok(Resolved {
                    page: page.clone(),
                    args,
                });
            } else {
                trace!(path, segment, "Segment matched nothing");
                return self.unmatched(path);
            };

            match next {
                Node::Route(route) => at_route = route,
                Node::Page(page) => at_page = Some(page),
            }
        }

        if let Some(page) = at_page {
            return Ok(Resolved {
                page: page.clone(),
                args,
            });
        }

        match &at_route.base {
            Some(page) => Ok(Resolved {
                page: page.clone(),
                args,
            }),
            None => self.unmatched(path),
        }
    }

    /// Check that every route node can be terminated on.
    ///
    /// With an error page configured every tree is valid; without one, each
    /// route node needs a base page.
    ///
    /// # Errors
    ///
    /// Returns [`RouteErrorKind::MissingBase`] naming the first offending node.
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.error_page.is_some() {
            return Ok(());
        }
        self.root.check_bases("")
    }

    fn unmatched(&self, path: &str) -> Result<Resolved<P>, RouteError> {
        match &self.error_page {
            Some(page) => Ok(Resolved {
                page: page.clone(),
                args: RouteArgs::new(),
            }),
            None => Err(RouteError::new(RouteErrorKind::Unresolvable(
                path.to_string(),
            ))),
        }
    }
}
