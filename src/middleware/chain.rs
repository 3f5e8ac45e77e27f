//! Ordered, immutable middleware chain.

use std::fmt;

use tracing::{debug, trace};

use super::{Constructor, Next};
use crate::fallback;
use crate::handler::{BoxedHandler, Handler};

/// An ordered, immutable list of middleware [`Constructor`]s.
///
/// Build it once at startup, derive variants with [`append`](Chain::append)
/// and [`extend`](Chain::extend), then collapse it into a single handler with
/// [`then`](Chain::then). No method mutates an existing chain: each one that
/// combines returns a new chain with its own backing storage, so chains
/// derived from a common base never observe each other.
///
/// ```rust
/// use ravel::middleware::{self, Chain, Next};
/// use ravel::{Request, Response};
///
/// async fn auth(req: Request, next: Next) -> Response { next.run(req).await }
/// async fn audit(req: Request, next: Next) -> Response { next.run(req).await }
/// async fn app(_req: Request) -> &'static str { "app" }
///
/// let base = Chain::new([middleware::from_fn(auth)]);
/// let admin = base.append([middleware::from_fn(audit)]);
///
/// assert_eq!(base.len(), 1);
/// assert_eq!(admin.len(), 2);
///
/// let handler = admin.then(app);
/// ```
#[derive(Clone, Default)]
pub struct Chain {
    constructors: Vec<Constructor>,
}

impl Chain {
    /// Creates a chain from constructors in execution order.
    ///
    /// The chain copies what it is given; the caller's collection stays
    /// independent of it.
    pub fn new<I>(constructors: I) -> Self
    where
        I: IntoIterator<Item = Constructor>,
    {
        Self { constructors: constructors.into_iter().collect() }
    }

    /// Returns a new chain running this chain's constructors, then `more`.
    pub fn append<I>(&self, more: I) -> Self
    where
        I: IntoIterator<Item = Constructor>,
    {
        let more = more.into_iter();
        let mut constructors = Vec::with_capacity(self.constructors.len() + more.size_hint().0);
        constructors.extend(self.constructors.iter().cloned());
        constructors.extend(more);
        Self { constructors }
    }

    /// Returns a new chain running this chain's constructors, then `other`'s.
    ///
    /// Same as `self.append(other.constructors().iter().cloned())`.
    pub fn extend(&self, other: &Chain) -> Self {
        self.append(other.constructors.iter().cloned())
    }

    /// Wraps `handler` in every constructor, last to first, and returns the
    /// outermost handler.
    ///
    /// For an empty chain the handler comes back unchanged. A plain `async fn`
    /// is boxed anew on every call, so pass a [`BoxedHandler`] if you need
    /// `BoxedHandler::ptr_eq` identity between input and output.
    pub fn then(&self, handler: impl Handler) -> BoxedHandler {
        self.then_optional(Some(handler.into_boxed_handler()))
    }

    /// Like [`then`](Chain::then), but the terminal handler may be absent.
    ///
    /// With no handler and no constructors the result is the default
    /// not-found handler (see [`not_found`](crate::not_found)). With no
    /// handler but some constructors, the innermost constructor receives an
    /// absent [`Next`] and deals with it as it sees fit.
    pub fn then_optional(&self, handler: Option<BoxedHandler>) -> BoxedHandler {
        trace!(
            constructors = self.constructors.len(),
            terminal = handler.is_some(),
            "finalizing middleware chain"
        );

        let mut constructors = self.constructors.iter().rev();
        let Some(innermost) = constructors.next() else {
            return handler.unwrap_or_else(|| {
                debug!("empty chain without a terminal handler, using default not-found handler");
                fallback::default_handler()
            });
        };

        let handler = innermost.wrap(Next::new(handler));
        constructors.fold(handler, |inner, constructor| {
            constructor.wrap(Next::new(Some(inner)))
        })
    }

    pub fn len(&self) -> usize { self.constructors.len() }
    pub fn is_empty(&self) -> bool { self.constructors.is_empty() }

    /// The constructors in execution order.
    pub fn constructors(&self) -> &[Constructor] { &self.constructors }
}

impl FromIterator<Constructor> for Chain {
    fn from_iter<I: IntoIterator<Item = Constructor>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("constructors", &self.constructors.len())
            .finish()
    }
}
