use std::sync::Arc;

use hyper::StatusCode;

use crate::context::Context;
use crate::middleware::BoxedHandler;

pub type AuthFn = Arc<dyn Fn(&Context) -> bool + Send + Sync>;

/// 인증 미들웨어 설정
#[derive(Clone)]
pub struct AuthConfig {
    /// 요청 허용 여부를 판단하는 함수. 없으면 미들웨어는 아무 것도 하지 않습니다.
    pub auth_func: Option<AuthFn>,

    /// 거부된 요청을 처리할 핸들러
    pub no_access_func: Option<BoxedHandler>,

    /// `no_access_func`가 없을 때 사용하는 상태 코드
    pub no_access_status: StatusCode,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_func: None,
            no_access_func: None,
            no_access_status: StatusCode::UNAUTHORIZED,
        }
    }
}

impl AuthConfig {
    pub fn new<F>(auth: F) -> Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        Self {
            auth_func: Some(Arc::new(auth)),
            ..Self::default()
        }
    }

    pub fn with_no_access(mut self, handler: BoxedHandler) -> Self {
        self.no_access_func = Some(handler);
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.no_access_status = status;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("auth_func", &self.auth_func.is_some())
            .field("no_access_func", &self.no_access_func.is_some())
            .field("no_access_status", &self.no_access_status)
            .finish()
    }
}
