//! Built-in not-found handler.
//!
//! [`Chain::then_optional`](crate::middleware::Chain::then_optional) substitutes
//! this handler when it is given no terminal handler and has no middleware to
//! wrap, so the result is always invocable. [`Next::run`](crate::middleware::Next::run)
//! uses it too when a constructor was handed an absent inner handler.
//!
//! The body is exported so embedders can recognise the fallback response:
//!
//! ```rust
//! use ravel::{Chain, DEFAULT_NOT_FOUND_BODY, Method, Request, StatusCode};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let handler = Chain::default().then_optional(None);
//! let res = handler.call(Request::new(Method::GET, "/")).await;
//! assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
//! assert_eq!(res.body(), DEFAULT_NOT_FOUND_BODY.as_bytes());
//! # }
//! ```

use http::StatusCode;

use crate::handler::{BoxedHandler, Handler};
use crate::{Request, Response};

/// Body of every response produced by the default not-found handler.
pub const DEFAULT_NOT_FOUND_BODY: &str = "404 page not found";

/// Always returns `404 Not Found` with [`DEFAULT_NOT_FOUND_BODY`] as a
/// plain-text body.
pub async fn not_found(_req: Request) -> Response {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .text(DEFAULT_NOT_FOUND_BODY)
}

pub(crate) fn default_handler() -> BoxedHandler {
    not_found.into_boxed_handler()
}
