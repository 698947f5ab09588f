use bytes::{Bytes, BytesMut};
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{HeaderMap, Response, StatusCode};

/// 응답 출력 버퍼
///
/// 상태 코드를 쓰는 순간 헤더 블록이 확정(commit)됩니다. 확정 후의 헤더 변경과
/// 두 번째 상태 코드는 전송되지 않습니다. 상태 없이 본문을 쓰면 200으로
/// 확정됩니다.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    headers: HeaderMap,
    committed: Option<(StatusCode, HeaderMap)>,
    body: BytesMut,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// 상태 코드를 쓰고 헤더를 확정합니다. 이미 확정된 경우 `false`를 반환합니다.
    pub fn write_header(&mut self, status: StatusCode) -> bool {
        if self.committed.is_some() {
            return false;
        }
        self.committed = Some((status, self.headers.clone()));
        true
    }

    pub fn is_committed(&self) -> bool {
        self.committed.is_some()
    }

    /// 전송에 확정된 상태 코드
    pub fn status(&self) -> Option<StatusCode> {
        self.committed.as_ref().map(|(status, _)| *status)
    }

    /// Content-Type이 비어 있을 때만 설정합니다.
    pub fn set_content_type(&mut self, content_type: &'static str) {
        if !self.headers.contains_key(CONTENT_TYPE) {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
    }

    pub fn write(&mut self, chunk: &[u8]) -> usize {
        if self.committed.is_none() {
            self.write_header(StatusCode::OK);
        }
        self.body.extend_from_slice(chunk);
        chunk.len()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let (status, headers) = self
            .committed
            .unwrap_or((StatusCode::OK, self.headers));

        let mut response = Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}
