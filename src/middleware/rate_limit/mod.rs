//! Rate Limiting 미들웨어
//!
//! 키별 요청 수를 시간 윈도우 안에서 세고 한도를 넘은 요청을 중단시킵니다.

mod config;
mod middleware;
pub mod store;

pub use config::{KeyFn, LimiterConfig, SkipFn};
pub use middleware::RateLimitMiddleware;
pub use store::{MemoryStore, RateLimitItem, RateLimitStore};

use crate::middleware::BoxedHandler;

/// 메모리 저장소를 쓰는 limiter 핸들러를 만듭니다.
pub fn limiter(config: LimiterConfig) -> BoxedHandler {
    RateLimitMiddleware::new(config)
}
