mod basic;
mod config;
mod middleware;

pub use basic::{basic, BasicAuthConfig};
pub use config::{AuthConfig, AuthFn};
pub use middleware::AuthMiddleware;

use crate::middleware::BoxedHandler;

pub fn auth(config: AuthConfig) -> BoxedHandler {
    AuthMiddleware::new(config)
}
