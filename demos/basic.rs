//! Minimal ravel example: a shared base chain, an admin chain derived from it,
//! and the default not-found fallback.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/
//!   curl -i http://localhost:3000/ -H 'x-api-key: secret'
//!   curl -i http://localhost:3001/anything

use ravel::http::{HeaderName, HeaderValue};
use ravel::middleware::{self, Chain, Next};
use ravel::{Request, Response, Server, StatusCode};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let base = Chain::new([middleware::from_fn(access_log), middleware::from_fn(powered_by)]);
    let protected = base.append([middleware::from_fn(require_key)]);

    let app = Server::bind("0.0.0.0:3000").serve(protected.then(hello));
    // No terminal handler: every request gets the default 404.
    let fallback = Server::bind("0.0.0.0:3001").serve(base.then_optional(None));

    let (app, fallback) = tokio::join!(app, fallback);
    app.expect("server error");
    fallback.expect("server error");
}

// Runs first: sees every request, and every response on the way out.
async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.path().to_owned();
    let res = next.run(req).await;
    info!(%method, %path, status = %res.status_code(), "request");
    res
}

async fn powered_by(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    res.headers_mut().insert(
        HeaderName::from_static("x-powered-by"),
        HeaderValue::from_static("ravel"),
    );
    res
}

// Short-circuits: `hello` never runs without the key.
async fn require_key(req: Request, next: Next) -> Response {
    if req.header("x-api-key") != Some("secret") {
        return Response::status(StatusCode::UNAUTHORIZED);
    }
    next.run(req).await
}

async fn hello(_req: Request) -> Response {
    Response::text("hello")
}
