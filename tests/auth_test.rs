mod common;

use std::collections::HashMap;

use ampway::middleware::auth::{auth, basic, AuthConfig, BasicAuthConfig};
use ampway::{Context, Method, Mux, Routes, StatusCode};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use common::{body_string, request, status};
use hyper::header::{AUTHORIZATION, WWW_AUTHENTICATE};

fn name_is_hello(ctx: &Context) -> bool {
    matches!(ctx.param("name"), Ok("hello"))
}

#[tokio::test]
async fn test_refused_request_gets_no_access_status() {
    let mut mux = Mux::default();
    mux.get(
        "/test/one/{name}",
        status(StatusCode::OK),
        [auth(AuthConfig::new(name_is_hello))],
    );

    let response = mux.dispatch(request(Method::GET, "/test/one/hello")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = mux.dispatch(request(Method::GET, "/test/one/invalid")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_no_access_handler_replaces_status() {
    let mut mux = Mux::default();
    let config = AuthConfig::new(name_is_hello).with_no_access(status(StatusCode::BAD_REQUEST));
    mux.get("/test/two/{name}", status(StatusCode::OK), [auth(config)]);

    let response = mux.dispatch(request(Method::GET, "/test/two/hello")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = mux.dispatch(request(Method::GET, "/test/two/invalid")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_custom_no_access_status() {
    let mut mux = Mux::default();
    let config = AuthConfig::new(|_ctx| false).with_status(StatusCode::FORBIDDEN);
    mux.get("/private", status(StatusCode::OK), [auth(config)]);

    let response = mux.dispatch(request(Method::GET, "/private")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_auth_func_is_pass_through() {
    let mut mux = Mux::default();
    mux.get("/open", status(StatusCode::OK), [auth(AuthConfig::default())]);

    let response = mux.dispatch(request(Method::GET, "/open")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_basic_auth() {
    let mut users = HashMap::new();
    users.insert("admin".to_string(), bcrypt::hash("secret", 4).unwrap());
    let config = basic(BasicAuthConfig {
        users,
        realm: "Admin Area".to_string(),
    });

    let mut mux = Mux::default();
    mux.get("/admin", status(StatusCode::OK), [auth(config)]);

    let authorized = |credentials: &str| {
        hyper::Request::builder()
            .uri("/admin")
            .header(AUTHORIZATION, format!("Basic {}", BASE64.encode(credentials)))
            .body(Bytes::new())
            .unwrap()
    };

    let response = mux.dispatch(authorized("admin:secret")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = mux.dispatch(authorized("admin:wrong")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[WWW_AUTHENTICATE], "Basic realm=\"Admin Area\"");
    assert_eq!(body_string(response).await, "Unauthorized");

    let response = mux.dispatch(request(Method::GET, "/admin")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
