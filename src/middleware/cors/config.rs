use std::sync::Arc;

use crate::context::Context;

pub type OriginFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;
pub type OriginRequestFn = Arc<dyn Fn(&Context, &str) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct CorsConfig {
    /// 허용할 Origin 목록
    pub allowed_origins: Vec<String>,

    /// Origin 검사 함수 (`allowed_origins`보다 우선)
    pub allow_origin_func: Option<OriginFn>,

    /// 요청까지 보는 Origin 검사 함수 (가장 우선)
    pub allow_origin_request_func: Option<OriginRequestFn>,

    /// 허용할 HTTP 메서드 목록
    pub allowed_methods: Vec<String>,

    /// 허용할 헤더 목록
    pub allowed_headers: Vec<String>,

    /// 노출할 헤더 목록
    pub exposed_headers: Vec<String>,

    /// preflight 요청 캐시 시간 (초, 0 이하이면 캐시하지 않음)
    pub max_age: i64,

    /// credentials 허용 여부
    pub allow_credentials: bool,

    pub allow_private_network: bool,

    pub debug: bool,
}

pub(crate) fn default_origins() -> Vec<String> {
    vec!["*".to_string()]
}

pub(crate) fn default_methods() -> Vec<String> {
    vec!["OPTIONS", "HEAD", "GET", "POST", "PUT", "PATCH", "DELETE"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(crate) fn default_headers() -> Vec<String> {
    vec!["Content-Type".to_string()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_origins(),
            allow_origin_func: None,
            allow_origin_request_func: None,
            allowed_methods: default_methods(),
            allowed_headers: default_headers(),
            exposed_headers: Vec::new(),
            max_age: 0,
            allow_credentials: true,
            allow_private_network: false,
            debug: false,
        }
    }
}

impl CorsConfig {
    pub fn with_origin_func<F>(mut self, allow: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.allow_origin_func = Some(Arc::new(allow));
        self
    }

    pub fn with_origin_request_func<F>(mut self, allow: F) -> Self
    where
        F: Fn(&Context, &str) -> bool + Send + Sync + 'static,
    {
        self.allow_origin_request_func = Some(Arc::new(allow));
        self
    }
}

impl std::fmt::Debug for CorsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorsConfig")
            .field("allowed_origins", &self.allowed_origins)
            .field("allow_origin_func", &self.allow_origin_func.is_some())
            .field("allow_origin_request_func", &self.allow_origin_request_func.is_some())
            .field("allowed_methods", &self.allowed_methods)
            .field("allowed_headers", &self.allowed_headers)
            .field("exposed_headers", &self.exposed_headers)
            .field("max_age", &self.max_age)
            .field("allow_credentials", &self.allow_credentials)
            .field("allow_private_network", &self.allow_private_network)
            .field("debug", &self.debug)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CorsConfig::default();
        assert_eq!(config.allowed_origins, vec!["*"]);
        assert_eq!(config.allowed_methods.len(), 7);
        assert_eq!(config.allowed_headers, vec!["Content-Type"]);
        assert!(config.exposed_headers.is_empty());
        assert_eq!(config.max_age, 0);
        assert!(config.allow_credentials);
        assert!(!config.allow_private_network);
    }
}
