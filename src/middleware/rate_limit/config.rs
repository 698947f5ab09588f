use std::sync::Arc;
use std::time::Duration;

use hyper::StatusCode;

use crate::context::Context;
use crate::middleware::BoxedHandler;

pub type SkipFn = Arc<dyn Fn(&Context) -> bool + Send + Sync>;
pub type KeyFn = Arc<dyn Fn(&Context) -> String + Send + Sync>;

/// Limiter 설정
#[derive(Clone)]
pub struct LimiterConfig {
    /// true를 반환하면 해당 요청은 제한하지 않음
    pub skip: Option<SkipFn>,

    /// 한도 초과 시 상태 코드 대신 실행할 핸들러
    pub next: Option<BoxedHandler>,

    /// 요청별 키 생성 (기본값: 요청 호스트)
    pub key_generator: Option<KeyFn>,

    /// 윈도우당 허용 요청 수 (0 이하이면 비활성화)
    pub limit: i64,

    /// 윈도우 길이 (0이면 비활성화)
    pub duration: Duration,

    /// 한도 초과 응답 상태 코드
    pub limit_status: StatusCode,

    /// 실패 응답(>= 400)은 기록하지 않음
    pub skip_fails: bool,

    /// 성공 응답(< 400)은 기록하지 않음
    pub skip_success: bool,

    pub debug: bool,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            skip: None,
            next: None,
            key_generator: None,
            limit: default_limit(),
            duration: default_duration(),
            limit_status: StatusCode::LOCKED,
            skip_fails: false,
            skip_success: false,
            debug: false,
        }
    }
}

pub(crate) fn default_limit() -> i64 {
    10
}

pub(crate) fn default_duration() -> Duration {
    Duration::from_secs(60)
}

impl LimiterConfig {
    pub fn with_skip<F>(mut self, skip: F) -> Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        self.skip = Some(Arc::new(skip));
        self
    }

    pub fn with_key_generator<F>(mut self, key_generator: F) -> Self
    where
        F: Fn(&Context) -> String + Send + Sync + 'static,
    {
        self.key_generator = Some(Arc::new(key_generator));
        self
    }

    pub fn with_next(mut self, next: BoxedHandler) -> Self {
        self.next = Some(next);
        self
    }

    /// 한도나 윈도우가 0 이하이면 제한이 꺼진 것으로 봅니다.
    pub fn is_disabled(&self) -> bool {
        self.limit <= 0 || self.duration.is_zero()
    }
}

impl std::fmt::Debug for LimiterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LimiterConfig")
            .field("skip", &self.skip.is_some())
            .field("next", &self.next.is_some())
            .field("key_generator", &self.key_generator.is_some())
            .field("limit", &self.limit)
            .field("duration", &self.duration)
            .field("limit_status", &self.limit_status)
            .field("skip_fails", &self.skip_fails)
            .field("skip_success", &self.skip_success)
            .field("debug", &self.debug)
            .finish()
    }
}
