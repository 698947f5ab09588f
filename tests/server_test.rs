use std::net::SocketAddr;

use ampway::middleware::cors::{cors, CorsConfig};
use ampway::settings::{ServerSettings, Settings};
use ampway::{handler_fn, Mux, Routes, Server, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
struct Ping {
    message: String,
}

async fn spawn_server() -> SocketAddr {
    let mut mux = Mux::default();
    mux.use_middleware(cors(CorsConfig::default()));
    mux.get(
        "/hello/{name}",
        handler_fn(|ctx| {
            Box::pin(async move {
                let name = ctx.param("name")?.to_string();
                ctx.render_string(StatusCode::OK, &format!("hello {name}"))
            })
        }),
        [],
    );
    mux.post(
        "/ping",
        handler_fn(|ctx| {
            Box::pin(async move {
                let ping: Ping = ctx.bind_json()?;
                ctx.render_json(StatusCode::OK, &Ping { message: format!("pong: {}", ping.message) })
            })
        }),
        [],
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Server::new(mux, ServerSettings::default(), None);
    tokio::spawn(server.serve_listener(listener));
    addr
}

#[tokio::test]
async fn test_server_end_to_end() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/hello/world"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(response.text().await.unwrap(), "hello world");

    let response = client
        .post(format!("http://{addr}/ping"))
        .json(&Ping { message: "hi".into() })
        .send()
        .await
        .unwrap();
    let pong: Ping = response.json().await.unwrap();
    assert_eq!(pong.message, "pong: hi");

    let response = client
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/anything"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = client
        .get(format!("http://{addr}/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_default_settings_bind_address() {
    let settings = Settings::default();
    assert_eq!(settings.server.addr(), "0.0.0.0:8080");
    assert!(!settings.tls.enabled);
}
