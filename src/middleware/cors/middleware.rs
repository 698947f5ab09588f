use std::sync::Arc;

use async_trait::async_trait;
use hyper::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE, ORIGIN,
};
use hyper::StatusCode;
use tracing::info;

use super::config::{CorsConfig, OriginRequestFn};
use crate::context::Context;
use crate::middleware::{Handler, Result};

const ALLOW_PRIVATE_NETWORK: &str = "access-control-allow-private-network";

/// CORS 미들웨어
///
/// Origin 검사 함수가 있으면 검사만 하고, 없으면 설정된 CORS 헤더를 붙입니다.
pub struct CorsMiddleware {
    allowed_origins: String,
    allow_origin: Option<OriginRequestFn>,
    allowed_methods: String,
    allowed_headers: String,
    exposed_headers: String,
    max_age: String,
    allow_credentials: bool,
    allow_private_network: bool,
    debug: bool,
}

impl CorsMiddleware {
    pub fn new(config: CorsConfig) -> Self {
        let allow_origin = match (config.allow_origin_request_func, config.allow_origin_func) {
            (Some(request_func), _) => Some(request_func),
            (None, Some(origin_func)) => {
                let wrapped: OriginRequestFn = Arc::new(move |_ctx: &Context, origin: &str| origin_func(origin));
                Some(wrapped)
            }
            (None, None) => None,
        };

        Self {
            allowed_origins: config.allowed_origins.join(", "),
            allow_origin,
            allowed_methods: config.allowed_methods.join(", "),
            allowed_headers: config.allowed_headers.join(", "),
            exposed_headers: config.exposed_headers.join(", "),
            max_age: config.max_age.max(0).to_string(),
            allow_credentials: config.allow_credentials,
            allow_private_network: config.allow_private_network,
            debug: config.debug,
        }
    }

    /// 요청의 Origin 헤더, 없으면 요청 호스트
    fn request_origin(ctx: &Context) -> String {
        ctx.header(ORIGIN.as_str())
            .unwrap_or_else(|| ctx.origin())
            .to_string()
    }

    fn set_cors_headers(&self, ctx: &mut Context) -> Result<()> {
        let headers = [
            (ACCESS_CONTROL_ALLOW_ORIGIN.as_str(), self.allowed_origins.as_str()),
            (ACCESS_CONTROL_ALLOW_METHODS.as_str(), self.allowed_methods.as_str()),
            (ACCESS_CONTROL_ALLOW_HEADERS.as_str(), self.allowed_headers.as_str()),
            (ACCESS_CONTROL_EXPOSE_HEADERS.as_str(), self.exposed_headers.as_str()),
        ];
        for (name, value) in headers {
            if !value.is_empty() {
                ctx.add_header(name, value)?;
            }
        }

        if self.allow_credentials {
            ctx.add_header(ACCESS_CONTROL_ALLOW_CREDENTIALS.as_str(), "true")?;
        }
        if self.allow_private_network {
            ctx.add_header(ALLOW_PRIVATE_NETWORK, "true")?;
        }
        ctx.add_header(ACCESS_CONTROL_MAX_AGE.as_str(), &self.max_age)
    }
}

#[async_trait]
impl Handler for CorsMiddleware {
    async fn call(&self, ctx: &mut Context) -> Result<()> {
        if let Some(allow) = &self.allow_origin {
            let origin = Self::request_origin(ctx);
            if !allow(ctx, &origin) {
                info!(origin = %origin, path = %ctx.path(), "허용되지 않은 Origin");
                ctx.abort_with_status(StatusCode::FORBIDDEN);
            }
            return Ok(());
        }

        self.set_cors_headers(ctx)?;

        if self.debug {
            info!("CORS {} {} {}", ctx.origin(), ctx.method(), ctx.path());
        }
        Ok(())
    }
}
