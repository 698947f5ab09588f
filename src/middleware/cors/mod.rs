mod config;
mod middleware;

pub use config::{CorsConfig, OriginFn, OriginRequestFn};
pub use middleware::CorsMiddleware;

use std::sync::Arc;

use crate::middleware::BoxedHandler;

pub fn cors(config: CorsConfig) -> BoxedHandler {
    Arc::new(CorsMiddleware::new(config))
}

pub(crate) use config::{default_headers, default_methods, default_origins};
