use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use tracing::{debug, error};

use crate::routing::Mux;

pub struct RequestHandler {
    mux: Arc<Mux>,
}

impl RequestHandler {
    pub fn new(mux: Arc<Mux>) -> Self {
        Self { mux }
    }

    /// 본문을 모두 읽은 뒤 라우터로 넘깁니다. 본문을 읽지 못하면 400으로 응답합니다.
    pub async fn handle_request(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        let (parts, body) = req.into_parts();
        debug!(method = %parts.method, path = %parts.uri.path(), "요청 수신");

        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                error!(error = %e, "요청 본문 읽기 실패");
                let mut response = Response::new(Full::new(Bytes::from("Bad Request")));
                *response.status_mut() = StatusCode::BAD_REQUEST;
                return Ok(response);
            }
        };

        Ok(self.mux.dispatch(Request::from_parts(parts, body)).await)
    }

    pub async fn handle_connection<I>(&self, io: I) -> std::result::Result<(), hyper::Error>
    where
        I: hyper::rt::Read + hyper::rt::Write + Send + Unpin + 'static,
    {
        http1::Builder::new()
            .serve_connection(io, service_fn(|req| self.handle_request(req)))
            .await
    }
}
