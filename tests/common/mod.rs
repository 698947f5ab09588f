#![allow(dead_code)]

use ampway::{handler_fn, BoxedHandler, Method, StatusCode};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response};

pub fn request(method: Method, uri: &str) -> Request<Bytes> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Bytes::new())
        .unwrap()
}

pub fn request_with_body(method: Method, uri: &str, body: &'static str) -> Request<Bytes> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
}

pub async fn body_string(response: Response<Full<Bytes>>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// 상태 코드만 설정하는 핸들러
pub fn status(code: StatusCode) -> BoxedHandler {
    handler_fn(move |ctx| {
        Box::pin(async move {
            ctx.set_status(code);
            Ok(())
        })
    })
}
