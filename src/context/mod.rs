//! 요청 컨텍스트
//!
//! 요청 하나의 수명 동안 핸들러 체인이 공유하는 가변 상태입니다.
//! 요청 보기, 응답 출력, 값 저장소, 그리고 체인 커서를 함께 들고 있으며
//! 다른 요청과 공유되지 않습니다.

mod params;
mod values;
mod writer;

pub use values::Values;
pub use writer::ResponseWriter;

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderName, HeaderValue, HOST};
use hyper::http::request::Parts;
use hyper::{HeaderMap, Method, Request, Response, StatusCode, Uri};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::binding::{self, Codec, Json, Toml, Xml, Yaml, PLAIN_CONTENT_TYPE};
use crate::middleware::chain;
use crate::middleware::{BoxedHandler, Error, Lookup, Result};

pub struct Context {
    request_id: String,
    parts: Parts,
    body: Bytes,
    params: HashMap<String, String>,
    writer: ResponseWriter,
    status: Option<StatusCode>,
    aborted: bool,
    values: Values,
    handlers: Arc<[BoxedHandler]>,
    cursor: Option<usize>,
}

impl Context {
    pub fn new(
        request: Request<Bytes>,
        params: HashMap<String, String>,
        handlers: Arc<[BoxedHandler]>,
    ) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            request_id: Uuid::new_v4().to_string(),
            parts,
            body,
            params,
            writer: ResponseWriter::new(),
            status: None,
            aborted: false,
            values: Values::new(),
            handlers,
            cursor: None,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    // ── 체인 커서 ────────────────────────────────────────────────────────────

    /// 커서를 한 칸 전진시키고 그 위치의 핸들러를 반환합니다.
    /// 끝을 지나면 커서는 `len`에 머물고 `None`을 반환합니다.
    pub(crate) fn advance(&mut self) -> Option<BoxedHandler> {
        let next = self
            .cursor
            .map_or(0, |cursor| cursor + 1)
            .min(self.handlers.len());
        self.cursor = Some(next);
        self.handlers.get(next).cloned()
    }

    pub(crate) fn exhaust(&mut self) {
        self.cursor = Some(self.handlers.len());
    }

    /// 현재 커서 위치 (`None`은 첫 핸들러 이전)
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// 체인의 나머지를 현재 핸들러 안에서 실행합니다.
    ///
    /// 남은 핸들러를 순서대로 실행하고, abort 되거나 에러가 나면 멈춥니다.
    /// 이미 abort 된 컨텍스트에서는 아무 것도 실행하지 않습니다.
    pub async fn next(&mut self) -> Result<()> {
        chain::drive(self).await
    }

    // ── 요청 보기 ────────────────────────────────────────────────────────────

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// 요청 호스트 (Host 헤더, 없으면 URI authority)
    pub fn origin(&self) -> &str {
        self.header(HOST.as_str())
            .or_else(|| self.parts.uri.authority().map(|a| a.as_str()))
            .unwrap_or("")
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    // ── 값 저장소 ────────────────────────────────────────────────────────────

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub async fn set_value<T>(&self, key: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.values.set(key, value).await;
    }

    pub async fn get_value<T>(&self, key: &str) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.values.get(key).await
    }

    pub async fn remove_value(&self, key: &str) -> bool {
        self.values.remove(key).await
    }

    // ── 경로 파라미터 ────────────────────────────────────────────────────────

    /// 라우트 패턴이 캡처한 경로 값. 바인딩되지 않았거나 비어 있으면 `NotFound`.
    pub fn param(&self, name: &str) -> Result<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::not_found(Lookup::Param, name))
    }

    pub fn param_int(&self, name: &str) -> Result<i64> {
        params::convert(name, self.param(name)?, "int")
    }

    pub fn param_float(&self, name: &str) -> Result<f64> {
        params::convert(name, self.param(name)?, "float")
    }

    pub fn param_bool(&self, name: &str) -> Result<bool> {
        params::convert_bool(name, self.param(name)?)
    }

    // ── 쿼리 파라미터 ────────────────────────────────────────────────────────

    fn query_raw(&self, name: &str) -> Option<String> {
        params::query_value(self.parts.uri.query(), name)
    }

    /// 쿼리 값. 키가 없으면 기본값을, 기본값도 없으면 `NotFound`를 반환합니다.
    pub fn query(&self, name: &str, default: Option<&str>) -> Result<String> {
        match (self.query_raw(name), default) {
            (Some(value), _) => Ok(value),
            (None, Some(default)) => Ok(default.to_string()),
            (None, None) => Err(Error::not_found(Lookup::Query, name)),
        }
    }

    pub fn query_int(&self, name: &str, default: Option<i64>) -> Result<i64> {
        match (self.query_raw(name), default) {
            (Some(value), _) => params::convert(name, &value, "int"),
            (None, Some(default)) => Ok(default),
            (None, None) => Err(Error::not_found(Lookup::Query, name)),
        }
    }

    pub fn query_float(&self, name: &str, default: Option<f64>) -> Result<f64> {
        match (self.query_raw(name), default) {
            (Some(value), _) => params::convert(name, &value, "float"),
            (None, Some(default)) => Ok(default),
            (None, None) => Err(Error::not_found(Lookup::Query, name)),
        }
    }

    pub fn query_bool(&self, name: &str, default: Option<bool>) -> Result<bool> {
        match (self.query_raw(name), default) {
            (Some(value), _) => params::convert_bool(name, &value),
            (None, Some(default)) => Ok(default),
            (None, None) => Err(Error::not_found(Lookup::Query, name)),
        }
    }

    // ── 상태와 abort ─────────────────────────────────────────────────────────

    /// 상태 코드를 기록하고 즉시 응답 헤더를 확정합니다.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
        if !self.writer.write_header(status) {
            warn!(
                request_id = %self.request_id,
                status = status.as_u16(),
                sent = ?self.writer.status(),
                "이미 헤더가 전송된 뒤의 상태 코드 설정은 무시됩니다"
            );
        }
    }

    /// 마지막으로 설정된 상태 코드 (`None`은 아직 설정되지 않음)
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn abort_with_status(&mut self, status: StatusCode) {
        self.abort();
        self.set_status(status);
    }

    /// abort 후 상태 코드를 설정합니다. 전달된 에러는 기록되지 않습니다.
    pub fn abort_with_error<E>(&mut self, status: StatusCode, _err: E) {
        self.abort_with_status(status);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    // ── 응답 출력 ────────────────────────────────────────────────────────────

    pub fn writer(&self) -> &ResponseWriter {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut ResponseWriter {
        &mut self.writer
    }

    /// 응답 헤더를 추가합니다.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<()> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Header(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::Header(format!("{name}: {e}")))?;

        if self.writer.is_committed() {
            warn!(request_id = %self.request_id, header = %name, "헤더가 이미 전송되었습니다");
        }
        self.writer.headers_mut().append(name, value);
        Ok(())
    }

    pub fn write(&mut self, body: &[u8]) -> Result<usize> {
        Ok(self.writer.write(body))
    }

    pub fn write_str(&mut self, body: &str) -> Result<usize> {
        self.write(body.as_bytes())
    }

    pub fn render(&mut self, status: StatusCode, body: impl AsRef<[u8]>) -> Result<()> {
        self.set_status(status);
        self.write(body.as_ref())?;
        Ok(())
    }

    pub fn render_string(&mut self, status: StatusCode, body: &str) -> Result<()> {
        self.writer.set_content_type(PLAIN_CONTENT_TYPE);
        self.render(status, body)
    }

    /// 코덱으로 직렬화해 응답합니다. Content-Type은 처음 한 번만 설정됩니다.
    pub fn render_with<C, T>(&mut self, status: StatusCode, value: &T) -> Result<()>
    where
        C: Codec,
        T: Serialize + ?Sized,
    {
        self.writer.set_content_type(C::CONTENT_TYPE);
        let body = C::encode(value)?;
        self.render(status, body)
    }

    pub fn render_json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) -> Result<()> {
        self.render_with::<Json, T>(status, value)
    }

    pub fn render_toml<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) -> Result<()> {
        self.render_with::<Toml, T>(status, value)
    }

    pub fn render_yaml<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) -> Result<()> {
        self.render_with::<Yaml, T>(status, value)
    }

    pub fn render_xml<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) -> Result<()> {
        self.render_with::<Xml, T>(status, value)
    }

    // ── 바인딩 ───────────────────────────────────────────────────────────────

    /// 본문을 디코딩하고 검증합니다. 실패해도 abort 하지 않습니다.
    pub fn should_bind_with<C, T>(&self) -> Result<T>
    where
        C: Codec,
        T: DeserializeOwned + Validate,
    {
        binding::bind_body::<C, T>(&self.body)
    }

    /// 시퀀스 본문을 디코딩하고 항목마다 검증합니다.
    pub fn should_bind_many_with<C, T>(&self) -> Result<Vec<T>>
    where
        C: Codec,
        T: DeserializeOwned + Validate,
    {
        binding::bind_body_many::<C, T>(&self.body)
    }

    /// `should_bind_with`와 같지만 실패하면 에러를 반환하기 전에 abort 합니다.
    pub fn bind_with<C, T>(&mut self) -> Result<T>
    where
        C: Codec,
        T: DeserializeOwned + Validate,
    {
        match self.should_bind_with::<C, T>() {
            Ok(value) => Ok(value),
            Err(err) => {
                self.abort();
                Err(err)
            }
        }
    }

    pub fn should_bind_json<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        self.should_bind_with::<Json, T>()
    }

    pub fn bind_json<T: DeserializeOwned + Validate>(&mut self) -> Result<T> {
        self.bind_with::<Json, T>()
    }

    pub fn should_bind_toml<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        self.should_bind_with::<Toml, T>()
    }

    pub fn bind_toml<T: DeserializeOwned + Validate>(&mut self) -> Result<T> {
        self.bind_with::<Toml, T>()
    }

    pub fn should_bind_yaml<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        self.should_bind_with::<Yaml, T>()
    }

    pub fn bind_yaml<T: DeserializeOwned + Validate>(&mut self) -> Result<T> {
        self.bind_with::<Yaml, T>()
    }

    pub fn should_bind_xml<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        self.should_bind_with::<Xml, T>()
    }

    pub fn bind_xml<T: DeserializeOwned + Validate>(&mut self) -> Result<T> {
        self.bind_with::<Xml, T>()
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        self.writer.into_response()
    }
}
