//! 메서드 + 경로 기반 라우팅
//!
//! 경로 문법은 `matchit`을 따릅니다. 이름 세그먼트는 `{name}`, 나머지 전체는
//! `{*rest}`로 캡처합니다.

mod group;
mod mux;

pub use group::Group;
pub use mux::{Mux, MuxConfig};

use hyper::Method;

use crate::middleware::BoxedHandler;

/// 라우트 등록 인터페이스
///
/// `method`가 `None`이면 모든 메서드에 응답하는 라우트입니다.
pub trait Routes {
    fn route<I>(&mut self, method: Option<Method>, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>;

    fn handle<I>(&mut self, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.route(None, path, handler, middleware)
    }

    fn get<I>(&mut self, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.route(Some(Method::GET), path, handler, middleware)
    }

    fn post<I>(&mut self, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.route(Some(Method::POST), path, handler, middleware)
    }

    fn put<I>(&mut self, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.route(Some(Method::PUT), path, handler, middleware)
    }

    fn patch<I>(&mut self, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.route(Some(Method::PATCH), path, handler, middleware)
    }

    fn delete<I>(&mut self, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.route(Some(Method::DELETE), path, handler, middleware)
    }

    fn head<I>(&mut self, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.route(Some(Method::HEAD), path, handler, middleware)
    }

    fn options<I>(&mut self, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.route(Some(Method::OPTIONS), path, handler, middleware)
    }

    fn connect<I>(&mut self, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.route(Some(Method::CONNECT), path, handler, middleware)
    }

    fn trace<I>(&mut self, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.route(Some(Method::TRACE), path, handler, middleware)
    }
}

/// 그룹 접두사와 라우트 경로를 `/` 하나로 이어 붙입니다.
pub(crate) fn join_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    let joined = format!("{prefix}/{path}");
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/api", "/users"), "/api/users");
        assert_eq!(join_path("/api/", "users/{id}"), "/api/users/{id}");
        assert_eq!(join_path("/api", "/"), "/api/");
        assert_eq!(join_path("", "/health"), "/health");
        assert_eq!(join_path("/", ""), "/");
    }
}
