//! # ravel
//!
//! Ordered, immutable middleware chains for async HTTP handlers.
//!
//! ## The contract
//!
//! A [`Chain`] is a list of middleware constructors. You build it once, derive
//! variants from it without ever mutating it, and finalize it around your
//! application handler. The first middleware you list is the first to run.
//!
//! What ravel intentionally leaves to others:
//!
//! - **Middleware behaviour**: a constructor may short-circuit, rewrite, or
//!   pass through. The chain never inspects it.
//! - **Shared request state**: the chain holds none. Locking is the concern of
//!   individual middleware.
//!
//! What's left for ravel:
//!
//! - Chain composition: [`Chain::new`], [`Chain::append`], [`Chain::extend`]
//! - Finalization: [`Chain::then`], with a built-in [`not_found`] fallback
//! - A small hyper/tokio [`Server`] that runs one finalized handler, with
//!   graceful shutdown
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use ravel::middleware::{self, Chain, Next};
//! use ravel::{Request, Response, Server, StatusCode};
//!
//! #[tokio::main]
//! async fn main() {
//!     let chain = Chain::new([middleware::from_fn(log), middleware::from_fn(auth)]);
//!     Server::bind("0.0.0.0:3000").serve(chain.then(app)).await.unwrap();
//! }
//!
//! async fn log(req: Request, next: Next) -> Response {
//!     let path = req.path().to_owned();
//!     let res = next.run(req).await;
//!     tracing::info!(%path, status = %res.status_code(), "served");
//!     res
//! }
//!
//! async fn auth(req: Request, next: Next) -> Response {
//!     if req.header("authorization").is_none() {
//!         return Response::status(StatusCode::UNAUTHORIZED);
//!     }
//!     next.run(req).await
//! }
//!
//! async fn app(_req: Request) -> &'static str {
//!     "hello"
//! }
//! ```

mod error;
mod fallback;
mod handler;
mod request;
mod response;
mod server;

pub mod middleware;

pub use error::Error;
pub use fallback::{DEFAULT_NOT_FOUND_BODY, not_found};
pub use handler::{BoxedHandler, Handler, ResponseFuture};
pub use middleware::{Chain, Constructor, Next};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use server::{DEFAULT_MAX_BODY_BYTES, Server};

pub use http;
pub use http::{Method, StatusCode};
