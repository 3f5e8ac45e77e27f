//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! A middleware chain wraps handlers of *different* concrete types around each
//! other: the application's `async fn`, then a closure produced by every
//! constructor in the chain. To nest them freely we hide each concrete type
//! behind a trait object (`dyn ErasedHandler`) and pass the result around as a
//! [`BoxedHandler`].
//!
//! ```text
//! async fn app(req: Request) -> Response { … }   ← user writes this
//!        ↓ chain.then(app)
//! app.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! BoxedHandler(Arc::new(FnHandler(app)))         ← heap-allocated wrapper
//!        ↓  wrapped by every constructor, last to first
//! handler.call(req)  at request time             ← one vtable dispatch per layer
//! ```
//!
//! A [`BoxedHandler`] is an `Arc`, so cloning it is one atomic increment and
//! two clones of the same handler compare equal under [`BoxedHandler::ptr_eq`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Erased types ──────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Send + 'static` lets tokio move the future across worker threads.
pub type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` because it appears inside [`BoxedHandler`]'s public
/// constructor bounds. External crates go through [`Handler`] instead.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> ResponseFuture;
}

/// A type-erased handler shared across concurrent requests.
///
/// This is what a finalized [`Chain`](crate::middleware::Chain) produces, what
/// every [`Constructor`](crate::middleware::Constructor) returns, and what the
/// [`Server`](crate::Server) invokes once per request.
#[derive(Clone)]
pub struct BoxedHandler(Arc<dyn ErasedHandler + Send + Sync + 'static>);

impl BoxedHandler {
    /// Runs the handler against one request.
    pub fn call(&self, req: Request) -> ResponseFuture {
        self.0.call(req)
    }

    /// Returns `true` if both values point at the same underlying handler.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for BoxedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxedHandler")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid request handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` (or closure returning a future) with the signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// and for [`BoxedHandler`], where the conversion is the identity. That last
/// impl is what lets an already-composed handler be fed back into another
/// chain without an extra layer of boxing.
///
/// The trait is **sealed**: only the impls in this module can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        BoxedHandler(Arc::new(FnHandler(self)))
    }
}

impl private::Sealed for BoxedHandler {}

impl Handler for BoxedHandler {
    fn into_boxed_handler(self) -> BoxedHandler {
        self
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> ResponseFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
