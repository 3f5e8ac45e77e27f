//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured tracing, metrics, request-id injection,
//! and authentication-header inspection. This crate ships none of those; it
//! only composes them.
//!
//! A middleware is a [`Constructor`]: given the [`Next`] handler it receives a
//! [`BoxedHandler`] that wraps it. A [`Chain`] is an ordered, immutable list of
//! constructors that collapses into one handler with [`Chain::then`]:
//!
//! ```text
//! Chain::new([a, b, c]).then(app)   ==   a(b(c(app)))
//!
//! request ──▶ a ──▶ b ──▶ c ──▶ app
//! ```
//!
//! The first constructor you list is the first to see the request.
//!
//! ```rust
//! use ravel::middleware::{self, Chain, Next};
//! use ravel::{Request, Response};
//!
//! async fn timing(req: Request, next: Next) -> Response {
//!     let started = std::time::Instant::now();
//!     let res = next.run(req).await;
//!     tracing::info!(elapsed = ?started.elapsed(), "request done");
//!     res
//! }
//!
//! async fn app(_req: Request) -> &'static str { "hello" }
//!
//! let handler = Chain::new([middleware::from_fn(timing)]).then(app);
//! ```

mod chain;

pub use chain::Chain;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::fallback;
use crate::handler::{BoxedHandler, Handler, ResponseFuture};
use crate::request::Request;
use crate::response::IntoResponse;

// ── Next ──────────────────────────────────────────────────────────────────────

/// The handler a constructor wraps.
///
/// Normally this is the next middleware's handler, or the terminal handler for
/// the innermost constructor. When a chain is finalized with no terminal
/// handler the innermost constructor receives an *absent* `Next`; whether to
/// tolerate that is the constructor's call, see [`Next::handler`].
#[derive(Clone)]
pub struct Next {
    inner: Option<BoxedHandler>,
}

impl Next {
    pub(crate) fn new(inner: Option<BoxedHandler>) -> Self {
        Self { inner }
    }

    /// The wrapped handler, or `None` when the chain was finalized without a
    /// terminal handler.
    pub fn handler(&self) -> Option<&BoxedHandler> {
        self.inner.as_ref()
    }

    pub fn into_handler(self) -> Option<BoxedHandler> {
        self.inner
    }

    /// Passes the request inward.
    ///
    /// An absent inner handler answers with the default not-found response.
    pub fn run(&self, req: Request) -> ResponseFuture {
        match &self.inner {
            Some(handler) => handler.call(req),
            None => Box::pin(fallback::not_found(req)),
        }
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").field("inner", &self.inner).finish()
    }
}

// ── Constructor ───────────────────────────────────────────────────────────────

type ConstructorFn = dyn Fn(Next) -> BoxedHandler + Send + Sync + 'static;

/// One middleware layer: a function from the inner handler to the handler
/// that wraps it.
///
/// Cloning is cheap (`Arc`). The chain never inspects what a constructor does;
/// it only calls it once per [`Chain::then`].
#[derive(Clone)]
pub struct Constructor(Arc<ConstructorFn>);

impl Constructor {
    /// Wraps a raw `Next -> BoxedHandler` function.
    ///
    /// ```rust
    /// use ravel::middleware::{Constructor, Next};
    /// use ravel::{Handler, Request};
    ///
    /// // Ignores `next` entirely and always answers "maintenance".
    /// let maintenance = Constructor::new(|_next: Next| {
    ///     (|_req: Request| async { "maintenance" }).into_boxed_handler()
    /// });
    /// ```
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Next) -> BoxedHandler + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn wrap(&self, next: Next) -> BoxedHandler {
        (self.0)(next)
    }

    /// Returns `true` if both values share the same underlying function.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constructor")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Builds a [`Constructor`] from an async function of the request and the
/// [`Next`] handler.
///
/// The function decides whether, and when, to call `next.run(req)`.
/// Returning without calling it short-circuits the rest of the chain.
pub fn from_fn<F, Fut, R>(f: F) -> Constructor
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    let f = Arc::new(f);
    Constructor::new(move |next: Next| {
        let f = Arc::clone(&f);
        (move |req: Request| (*f)(req, next.clone())).into_boxed_handler()
    })
}
