use hyper::Method;

use super::Routes;
use crate::middleware::BoxedHandler;

pub(crate) struct GroupRoute {
    pub(crate) method: Option<Method>,
    pub(crate) path: String,
    pub(crate) handler: BoxedHandler,
    pub(crate) middleware: Vec<BoxedHandler>,
}

/// 공통 접두사와 미들웨어를 가진 라우트 묶음
///
/// 그룹 미들웨어는 라우트를 등록하는 시점의 목록이 해당 라우트에 복사됩니다.
/// `Mux::group`으로 넘겨야 실제로 등록됩니다.
pub struct Group {
    prefix: String,
    middleware: Vec<BoxedHandler>,
    routes: Vec<GroupRoute>,
}

impl Group {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            middleware: Vec::new(),
            routes: Vec::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn use_middleware(&mut self, handler: BoxedHandler) -> &mut Self {
        self.middleware.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub(crate) fn into_routes(self) -> (String, Vec<GroupRoute>) {
        (self.prefix, self.routes)
    }
}

impl Routes for Group {
    fn route<I>(&mut self, method: Option<Method>, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        let middleware = self
            .middleware
            .iter()
            .cloned()
            .chain(middleware)
            .collect();

        self.routes.push(GroupRoute {
            method,
            path: path.to_string(),
            handler,
            middleware,
        });
        self
    }
}
