use std::sync::{Arc, Mutex};

use ravel::middleware::{self, Chain, Constructor, Next};
use ravel::{BoxedHandler, DEFAULT_NOT_FOUND_BODY, Handler, Method, Request, Response, StatusCode};

// Writes its tag in front of whatever the inner handlers produced, so the
// final body lists tags in the order the constructors were chained.
fn tag(tag: &'static str) -> Constructor {
    middleware::from_fn(move |req: Request, next: Next| async move {
        let mut res = next.run(req).await;
        let mut body = tag.as_bytes().to_vec();
        body.extend_from_slice(res.body());
        *res.body_mut() = body;
        res
    })
}

// Records its name before delegating: observes request-time order directly.
fn record(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Constructor {
    let log = Arc::clone(log);
    middleware::from_fn(move |req: Request, next: Next| {
        log.lock().unwrap().push(name);
        next.run(req)
    })
}

async fn app(_req: Request) -> Response {
    Response::text("app")
}

async fn get(handler: &BoxedHandler) -> Response {
    handler.call(Request::new(Method::GET, "/")).await
}

#[tokio::test]
async fn then_orders_handlers_correctly() {
    let handler = Chain::new([tag("t1\n"), tag("t2\n"), tag("t3\n")]).then(app);

    let res = get(&handler).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"t1\nt2\nt3\napp");
}

#[tokio::test]
async fn first_constructor_sees_the_request_first() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let terminal_log = Arc::clone(&log);
    let handler = Chain::new([record(&log, "a"), record(&log, "b"), record(&log, "c")]).then(
        move |_req: Request| {
            terminal_log.lock().unwrap().push("app");
            async { "done" }
        },
    );

    get(&handler).await;
    assert_eq!(*log.lock().unwrap(), ["a", "b", "c", "app"]);
}

#[test]
fn then_works_with_no_middleware() {
    let terminal = app.into_boxed_handler();
    let handler = Chain::default().then(terminal.clone());
    assert!(BoxedHandler::ptr_eq(&handler, &terminal));

    let handler = Chain::new(Vec::<Constructor>::new()).then_optional(Some(terminal.clone()));
    assert!(BoxedHandler::ptr_eq(&handler, &terminal));
}

#[tokio::test]
async fn default_handler_when_nothing_is_chained() {
    let handler = Chain::default().then_optional(None);

    let res = get(&handler).await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(res.body(), DEFAULT_NOT_FOUND_BODY.as_bytes());
}

#[tokio::test]
async fn middleware_without_terminal_reaches_the_fallback() {
    let handler = Chain::new([tag("t1\n")]).then_optional(None);

    let res = get(&handler).await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(res.body(), format!("t1\n{DEFAULT_NOT_FOUND_BODY}").as_bytes());
}

#[tokio::test]
async fn constructor_can_reject_an_absent_terminal() {
    let strict = Constructor::new(|next: Next| match next.into_handler() {
        Some(inner) => inner,
        None => (|_req: Request| async { StatusCode::INTERNAL_SERVER_ERROR }).into_boxed_handler(),
    });

    let res = get(&Chain::new([strict.clone()]).then_optional(None)).await;
    assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = get(&Chain::new([strict]).then(app)).await;
    assert_eq!(res.body(), b"app");
}

#[tokio::test]
async fn append_adds_handlers_correctly() {
    let chain = Chain::new([tag("t1\n"), tag("t2\n")]);
    let new_chain = chain.append([tag("t3\n"), tag("t4\n")]);

    assert_eq!(chain.len(), 2);
    assert_eq!(new_chain.len(), 4);

    let res = get(&new_chain.then(app)).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"t1\nt2\nt3\nt4\napp");

    let res = get(&chain.then(app)).await;
    assert_eq!(res.body(), b"t1\nt2\napp");
}

#[tokio::test]
async fn extend_adds_handlers_correctly() {
    let chain1 = Chain::new([tag("t1\n"), tag("t2\n")]);
    let chain2 = Chain::new([tag("t3\n"), tag("t4\n")]);
    let new_chain = chain1.extend(&chain2);

    assert_eq!(chain1.len(), 2);
    assert_eq!(chain2.len(), 2);
    assert_eq!(new_chain.len(), 4);

    let res = get(&new_chain.then(app)).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"t1\nt2\nt3\nt4\napp");
}

#[tokio::test]
async fn append_and_extend_are_equivalent() {
    let chain = Chain::new([tag("a\n")]);
    let (c1, c2) = (tag("b\n"), tag("c\n"));

    let appended = chain.append([c1.clone(), c2.clone()]);
    let extended = chain.extend(&Chain::new([c1, c2]));

    assert_eq!(appended.len(), extended.len());
    for (a, e) in appended.constructors().iter().zip(extended.constructors()) {
        assert!(Constructor::ptr_eq(a, e));
    }
    assert_eq!(get(&appended.then(app)).await.body(), get(&extended.then(app)).await.body());
}

#[tokio::test]
async fn finalize_is_repeatable() {
    let chain: Chain = [tag("x\n"), tag("y\n")].into_iter().collect();

    let first = chain.then(app);
    let second = chain.then(app);
    assert!(!BoxedHandler::ptr_eq(&first, &second));

    for handler in [&first, &second, &first] {
        let res = get(handler).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"x\ny\napp");
    }
}

#[tokio::test]
async fn finalized_chain_can_be_chained_again() {
    let inner = Chain::new([tag("inner\n")]).then(app);
    let outer = Chain::new([tag("outer\n")]).then(inner);

    assert_eq!(get(&outer).await.body(), b"outer\ninner\napp");
}

#[tokio::test]
async fn request_changes_flow_inward() {
    #[derive(Clone)]
    struct User(&'static str);

    let authenticate = middleware::from_fn(|mut req: Request, next: Next| {
        req.extensions_mut().insert(User("alice"));
        next.run(req)
    });

    let handler = Chain::new([authenticate]).then(|req: Request| async move {
        match req.extensions().get::<User>() {
            Some(User(name)) => format!("hello {name}"),
            None => "anonymous".to_owned(),
        }
    });

    assert_eq!(get(&handler).await.body(), b"hello alice");
}

#[tokio::test]
async fn handlers_run_concurrently() {
    let handler = Chain::new([tag("t\n")]).then(app);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..16 {
        let handler = handler.clone();
        tasks.spawn(async move { get(&handler).await.body().to_vec() });
    }
    while let Some(body) = tasks.join_next().await {
        assert_eq!(body.unwrap(), b"t\napp");
    }
}

#[tokio::test]
async fn middleware_reads_the_request_body() {
    let require_body = middleware::from_fn(|req: Request, next: Next| async move {
        if req.body().is_empty() {
            return Response::builder().status(StatusCode::BAD_REQUEST).no_body();
        }
        next.run(req).await
    });
    let handler = Chain::new([require_body]).then(|req: Request| async move {
        String::from_utf8_lossy(req.body()).into_owned()
    });

    let res = handler.call(Request::new(Method::POST, "/notes").with_body("remember")).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"remember");

    let res = handler.call(Request::new(Method::POST, "/notes")).await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert!(res.body().is_empty());
    assert!(res.header("content-type").is_none());
}

#[test]
fn emptiness_tracks_constructor_count() {
    let empty = Chain::default();
    assert!(empty.is_empty());

    let grown = empty.append([tag("t\n")]);
    assert!(empty.is_empty());
    assert!(!grown.is_empty());
    assert!(!empty.extend(&grown).is_empty());
}
