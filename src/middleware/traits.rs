use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::Result;
use crate::context::Context;

/// 컨텍스트를 빌려 쓰는 박싱된 future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// 핸들러 트레이트
///
/// 라우트 핸들러, 전역 미들웨어, 라우트/그룹 미들웨어 모두 같은 계약을 따르며
/// 체인 안에서 위치로만 구분됩니다.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, ctx: &mut Context) -> Result<()>;
}

/// 여러 요청이 공유하는 핸들러
pub type BoxedHandler = Arc<dyn Handler>;

/// 함수 핸들러 래퍼
pub struct HandlerFn<F>(F);

#[async_trait]
impl<F> Handler for HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Result<()>> + Send + Sync,
{
    async fn call(&self, ctx: &mut Context) -> Result<()> {
        (self.0)(ctx).await
    }
}

/// 클로저를 핸들러로 변환합니다.
///
/// ```
/// use ampway::{handler_fn, StatusCode};
///
/// let hello = handler_fn(|ctx| Box::pin(async move {
///     ctx.render_string(StatusCode::OK, "hello")
/// }));
/// # drop(hello);
/// ```
pub fn handler_fn<F>(f: F) -> BoxedHandler
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
{
    Arc::new(HandlerFn(f))
}

/// 아무 것도 하지 않고 체인을 계속 진행시키는 핸들러
///
/// 설정상 비활성화된 미들웨어가 이 핸들러로 대체됩니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

#[async_trait]
impl Handler for PassThrough {
    async fn call(&self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }
}

pub fn pass_through() -> BoxedHandler {
    Arc::new(PassThrough)
}
