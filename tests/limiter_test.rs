mod common;

use std::time::Duration;

use ampway::middleware::rate_limit::{limiter, LimiterConfig, MemoryStore, RateLimitMiddleware, RateLimitStore};
use ampway::{handler_fn, Method, Mux, Routes, StatusCode};
use common::{body_string, request, status};

fn config(limit: i64) -> LimiterConfig {
    LimiterConfig {
        limit,
        duration: Duration::from_secs(60),
        debug: true,
        ..LimiterConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_limit_reached_returns_limit_status() {
    let mut mux = Mux::default();
    mux.get("/test/one", status(StatusCode::OK), [limiter(config(1))]);

    let response = mux.dispatch(request(Method::GET, "/test/one")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = mux.dispatch(request(Method::GET, "/test/one")).await;
    assert_eq!(response.status(), StatusCode::LOCKED);
    assert_eq!(body_string(response).await, "Rate Limit Reached");
}

#[tokio::test(start_paused = true)]
async fn test_next_handler_replaces_limit_status() {
    let mut mux = Mux::default();
    let config = config(1).with_next(status(StatusCode::BAD_REQUEST));
    mux.get("/test/two", status(StatusCode::OK), [limiter(config)]);

    let response = mux.dispatch(request(Method::GET, "/test/two")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = mux.dispatch(request(Method::GET, "/test/two")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(start_paused = true)]
async fn test_skip_bypasses_limiting() {
    let mut mux = Mux::default();
    let config = config(1).with_skip(|ctx| ctx.origin() == "example.com");
    mux.get("/test/three", status(StatusCode::OK), [limiter(config)]);

    for _ in 0..3 {
        let response = mux
            .dispatch(request(Method::GET, "http://example.com/test/three"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    mux.dispatch(request(Method::GET, "http://other.com/test/three")).await;
    let response = mux
        .dispatch(request(Method::GET, "http://other.com/test/three"))
        .await;
    assert_eq!(response.status(), StatusCode::LOCKED);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_limiter_never_limits() {
    let mut mux = Mux::default();
    mux.get("/test/four", status(StatusCode::OK), [limiter(config(0))]);
    let zero_window = LimiterConfig {
        duration: Duration::ZERO,
        ..config(1)
    };
    mux.get("/test/five", status(StatusCode::OK), [limiter(zero_window)]);

    for path in ["/test/four", "/test/five"] {
        for _ in 0..5 {
            let response = mux.dispatch(request(Method::GET, path)).await;
            assert_eq!(response.status(), StatusCode::OK, "{path}");
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_window_expiry_allows_requests_again() {
    let mut mux = Mux::default();
    mux.get("/window", status(StatusCode::OK), [limiter(config(2))]);

    for _ in 0..2 {
        assert_eq!(mux.dispatch(request(Method::GET, "/window")).await.status(), StatusCode::OK);
    }
    assert_eq!(mux.dispatch(request(Method::GET, "/window")).await.status(), StatusCode::LOCKED);

    tokio::time::advance(Duration::from_secs(61)).await;
    assert_eq!(mux.dispatch(request(Method::GET, "/window")).await.status(), StatusCode::OK);
}

#[tokio::test(start_paused = true)]
async fn test_skip_fails_does_not_count_errors() {
    let store = MemoryStore::new();
    let config = LimiterConfig {
        skip_fails: true,
        ..config(1)
    };
    let mut mux = Mux::default();
    mux.get(
        "/fails",
        status(StatusCode::INTERNAL_SERVER_ERROR),
        [RateLimitMiddleware::with_store(config, store.clone())],
    );

    for _ in 0..3 {
        let response = mux.dispatch(request(Method::GET, "/fails")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
    assert!(store.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_skip_success_counts_only_failures() {
    let store = MemoryStore::new();
    let config = LimiterConfig {
        skip_success: true,
        ..config(2)
    };
    let handler = handler_fn(|ctx| {
        Box::pin(async move {
            let code = if ctx.query_bool("fail", Some(false))? {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            ctx.set_status(code);
            Ok(())
        })
    });
    let mut mux = Mux::default();
    mux.get("/mixed", handler, [RateLimitMiddleware::with_store(config, store.clone())]);

    mux.dispatch(request(Method::GET, "/mixed")).await;
    mux.dispatch(request(Method::GET, "/mixed?fail=true")).await;
    assert_eq!(store.get("").await.map(|item| item.hits()), Some(1));

    mux.dispatch(request(Method::GET, "/mixed?fail=true")).await;
    let response = mux.dispatch(request(Method::GET, "/mixed")).await;
    assert_eq!(response.status(), StatusCode::LOCKED);
}

#[tokio::test(start_paused = true)]
async fn test_custom_key_generator_separates_clients() {
    let config = config(1).with_key_generator(|ctx| ctx.header("x-api-key").unwrap_or("anonymous").to_string());
    let mut mux = Mux::default();
    mux.get("/keyed", status(StatusCode::OK), [limiter(config)]);

    let keyed = |key: &'static str| {
        hyper::Request::builder()
            .uri("/keyed")
            .header("x-api-key", key)
            .body(bytes::Bytes::new())
            .unwrap()
    };

    assert_eq!(mux.dispatch(keyed("a")).await.status(), StatusCode::OK);
    assert_eq!(mux.dispatch(keyed("b")).await.status(), StatusCode::OK);
    assert_eq!(mux.dispatch(keyed("a")).await.status(), StatusCode::LOCKED);
}
