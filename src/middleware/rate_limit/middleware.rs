use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hyper::StatusCode;
use tracing::{debug, info};

use super::config::{KeyFn, LimiterConfig, SkipFn};
use super::store::{MemoryStore, RateLimitStore};
use crate::context::Context;
use crate::middleware::{pass_through, BoxedHandler, Handler, Result};

/// Rate Limit 미들웨어
///
/// 한도 안이면 체인의 나머지를 먼저 실행하고, 그 결과 상태 코드에 따라
/// 요청을 기록합니다.
pub struct RateLimitMiddleware<S: RateLimitStore = MemoryStore> {
    skip: Option<SkipFn>,
    next: Option<BoxedHandler>,
    key_generator: Option<KeyFn>,
    limit: u64,
    duration: Duration,
    limit_status: StatusCode,
    skip_fails: bool,
    skip_success: bool,
    debug: bool,
    store: S,
}

impl RateLimitMiddleware<MemoryStore> {
    /// 설정으로 미들웨어를 만듭니다. 비활성화 설정이면 통과 핸들러를 반환합니다.
    pub fn new(config: LimiterConfig) -> BoxedHandler {
        Self::with_store(config, MemoryStore::new())
    }
}

impl<S: RateLimitStore + 'static> RateLimitMiddleware<S> {
    pub fn with_store(config: LimiterConfig, store: S) -> BoxedHandler {
        match Self::build(config, store) {
            Some(middleware) => Arc::new(middleware),
            None => pass_through(),
        }
    }

    fn build(config: LimiterConfig, store: S) -> Option<Self> {
        if config.is_disabled() {
            info!(limit = config.limit, duration = ?config.duration, "요청 제한이 비활성화되었습니다");
            return None;
        }

        Some(Self {
            skip: config.skip,
            next: config.next,
            key_generator: config.key_generator,
            limit: config.limit as u64,
            duration: config.duration,
            limit_status: config.limit_status,
            skip_fails: config.skip_fails,
            skip_success: config.skip_success,
            debug: config.debug,
            store,
        })
    }

    /// 요청 식별 키를 만듭니다.
    fn key(&self, ctx: &Context) -> String {
        match &self.key_generator {
            Some(generate) => generate(ctx),
            None => ctx.origin().to_string(),
        }
    }

    fn should_record(&self, ctx: &Context) -> bool {
        let failed = ctx.status().map_or(false, |status| status.as_u16() >= 400);
        if failed {
            !self.skip_fails
        } else {
            !self.skip_success
        }
    }
}

#[async_trait]
impl<S: RateLimitStore + 'static> Handler for RateLimitMiddleware<S> {
    async fn call(&self, ctx: &mut Context) -> Result<()> {
        if let Some(skip) = &self.skip {
            if skip(ctx) {
                return Ok(());
            }
        }

        let key = self.key(ctx);
        debug!("Rate limit check for client: {}", key);

        if self.store.is_limited(&key, self.duration, self.limit).await {
            debug!(key = %key, limit = self.limit, "요청 한도 초과");
            ctx.abort();
            if let Some(next) = &self.next {
                return next.call(ctx).await;
            }
            return ctx.render(self.limit_status, "Rate Limit Reached");
        }

        ctx.next().await?;

        if self.should_record(ctx) {
            self.store.record_hit(&key).await;
        }

        if self.debug {
            let hits = self.store.get(&key).await.map_or(0, |item| item.hits());
            info!(key = %key, hits = hits, status = ?ctx.status(), "LIMITER");
        }
        Ok(())
    }
}
