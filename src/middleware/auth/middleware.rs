use async_trait::async_trait;
use tracing::debug;

use super::config::{AuthConfig, AuthFn};
use crate::context::Context;
use crate::middleware::{BoxedHandler, Handler, Result};
use hyper::StatusCode;

/// 요청 단위 인증 검사
pub struct AuthMiddleware {
    auth: AuthFn,
    no_access: Option<BoxedHandler>,
    no_access_status: StatusCode,
}

impl AuthMiddleware {
    /// `auth_func`가 없으면 통과 핸들러를 반환합니다.
    pub fn new(config: AuthConfig) -> BoxedHandler {
        match config.auth_func {
            Some(auth) => std::sync::Arc::new(Self {
                auth,
                no_access: config.no_access_func,
                no_access_status: config.no_access_status,
            }),
            None => crate::middleware::pass_through(),
        }
    }
}

#[async_trait]
impl Handler for AuthMiddleware {
    async fn call(&self, ctx: &mut Context) -> Result<()> {
        if (self.auth)(ctx) {
            return Ok(());
        }

        debug!(path = %ctx.path(), origin = %ctx.origin(), "인증 거부");
        ctx.abort();
        match &self.no_access {
            Some(handler) => handler.call(ctx).await,
            None => {
                ctx.set_status(self.no_access_status);
                Ok(())
            }
        }
    }
}
