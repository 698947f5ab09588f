use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use matchit::{InsertError, Router};
use serde::Deserialize;
use tracing::{info, warn};

use super::{join_path, Group, Routes};
use crate::binding::PLAIN_CONTENT_TYPE;
use crate::middleware::{handler_fn, BoxedHandler, Chain, Outcome};

#[derive(Debug, Clone, Deserialize)]
pub struct MuxConfig {
    /// 매칭되는 OPTIONS 라우트가 없을 때 200으로 응답할지 여부
    #[serde(default = "default_options")]
    pub default_options: bool,
}

fn default_options() -> bool {
    true
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            default_options: default_options(),
        }
    }
}

/// 라우트 테이블
///
/// 메서드별 트리를 먼저 찾고, 없으면 모든 메서드용 트리를 찾습니다.
/// 각 라우트의 체인은 등록 시점의 전역 미들웨어 목록으로 고정됩니다.
pub struct Mux {
    config: MuxConfig,
    middleware: Vec<BoxedHandler>,
    routes: HashMap<Method, Router<Chain>>,
    any: Router<Chain>,
    default_options: Option<Chain>,
}

impl Default for Mux {
    fn default() -> Self {
        Self::new(MuxConfig::default())
    }
}

impl Mux {
    pub fn new(config: MuxConfig) -> Self {
        Self {
            config,
            middleware: Vec::new(),
            routes: HashMap::new(),
            any: Router::new(),
            default_options: None,
        }
    }

    pub fn config(&self) -> &MuxConfig {
        &self.config
    }

    /// 전역 미들웨어를 추가합니다. 이후에 등록하는 라우트에만 적용됩니다.
    pub fn use_middleware(&mut self, handler: BoxedHandler) -> &mut Self {
        self.middleware.push(handler);
        self
    }

    /// 라우트를 등록합니다. 경로가 잘못되었거나 충돌하면 에러를 반환합니다.
    pub fn try_route(
        &mut self,
        method: Option<Method>,
        path: &str,
        handler: BoxedHandler,
        middleware: Vec<BoxedHandler>,
    ) -> Result<(), InsertError> {
        let chain = Chain::new(&self.middleware, &middleware, handler);
        let tree = match &method {
            Some(method) => self.routes.entry(method.clone()).or_default(),
            None => &mut self.any,
        };
        tree.insert(path, chain)?;

        match method {
            Some(method) => info!("{} {}", method, path),
            None => info!("ANY {}", path),
        }
        Ok(())
    }

    /// 그룹의 라우트를 접두사를 붙여 등록합니다.
    pub fn group(&mut self, group: Group) -> &mut Self {
        let (prefix, routes) = group.into_routes();
        for route in routes {
            let path = join_path(&prefix, &route.path);
            self.route(route.method, &path, route.handler, route.middleware);
        }
        self
    }

    /// 기본 OPTIONS 응답기를 설치합니다.
    ///
    /// 등록된 OPTIONS 라우트가 없는 모든 경로에 200으로 응답하며, 지금까지
    /// 추가된 전역 미들웨어를 거칩니다. `default_options`가 꺼져 있으면
    /// 아무 것도 하지 않습니다.
    pub fn install_default_options(&mut self) {
        if !self.config.default_options {
            return;
        }
        if self.default_options.is_some() {
            warn!("기본 OPTIONS 응답기가 이미 설치되어 있습니다");
            return;
        }

        let preflight = handler_fn(|ctx| {
            Box::pin(async move {
                ctx.set_status(StatusCode::OK);
                Ok(())
            })
        });
        self.default_options = Some(Chain::new(&self.middleware, &[], preflight));
        info!("OPTIONS /{{*path}}");
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<(&Chain, HashMap<String, String>)> {
        let matched = self
            .routes
            .get(method)
            .and_then(|tree| tree.at(path).ok())
            .or_else(|| self.any.at(path).ok())?;

        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((matched.value, params))
    }

    /// 경로가 매칭되는 다른 메서드 목록
    fn allowed_methods(&self, path: &str) -> Vec<&Method> {
        let mut methods: Vec<&Method> = self
            .routes
            .iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| method)
            .collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }

    /// 요청을 찾아 체인을 실행하고 컨텍스트에 쌓인 응답을 돌려줍니다.
    pub async fn dispatch(&self, request: Request<Bytes>) -> Response<Full<Bytes>> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let found = self.lookup(&method, &path).or_else(|| {
            self.default_options
                .as_ref()
                .filter(|_| method == Method::OPTIONS)
                .map(|chain| (chain, HashMap::new()))
        });
        let Some((chain, params)) = found else {
            return self.not_matched(&method, &path);
        };

        let (ctx, outcome) = chain.run(request, params).await;
        if let Outcome::Errored(err) = &outcome {
            warn!(method = %method, path = %path, error = %err, "핸들러 에러로 체인이 중단되었습니다");
        }
        ctx.into_response()
    }

    fn not_matched(&self, method: &Method, path: &str) -> Response<Full<Bytes>> {
        let allowed = self.allowed_methods(path);
        if allowed.is_empty() {
            info!(method = %method, path = %path, status = 404, "일치하는 라우트가 없습니다");
            return plain(StatusCode::NOT_FOUND, "404 page not found");
        }

        info!(method = %method, path = %path, status = 405, "허용되지 않은 메서드입니다");
        let mut response = plain(StatusCode::METHOD_NOT_ALLOWED, "405 method not allowed");
        let allow = allowed
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if let Ok(value) = HeaderValue::from_str(&allow) {
            response.headers_mut().insert(ALLOW, value);
        }
        response
    }
}

impl Routes for Mux {
    /// # Panics
    ///
    /// 경로 문법이 잘못되었거나 이미 등록된 라우트와 충돌하면 패닉합니다.
    fn route<I>(&mut self, method: Option<Method>, path: &str, handler: BoxedHandler, middleware: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        let middleware = middleware.into_iter().collect();
        if let Err(e) = self.try_route(method, path, handler, middleware) {
            panic!("invalid route `{path}`: {e}");
        }
        self
    }
}

fn plain(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(PLAIN_CONTENT_TYPE));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn ok(body: &'static str) -> BoxedHandler {
        handler_fn(move |ctx| Box::pin(async move { ctx.render_string(StatusCode::OK, body) }))
    }

    fn request(method: Method, uri: &str) -> Request<Bytes> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::new())
            .unwrap()
    }

    async fn body(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_method_tree_before_any() {
        let mut mux = Mux::default();
        mux.get("/items", ok("get"), []);
        mux.handle("/items", ok("any"), []);

        assert_eq!(body(mux.dispatch(request(Method::GET, "/items")).await).await, "get");
        assert_eq!(body(mux.dispatch(request(Method::DELETE, "/items")).await).await, "any");
    }

    #[tokio::test]
    async fn test_not_found_and_method_not_allowed() {
        let mut mux = Mux::default();
        mux.get("/items", ok("get"), []);
        mux.post("/items", ok("post"), []);

        let response = mux.dispatch(request(Method::GET, "/missing")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(response).await, "404 page not found");

        let response = mux.dispatch(request(Method::PUT, "/items")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, POST");
    }

    #[tokio::test]
    async fn test_default_options() {
        let mut mux = Mux::default();
        mux.options("/custom", ok("custom"), []);
        mux.install_default_options();

        let response = mux.dispatch(request(Method::OPTIONS, "/anything/else")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = mux.dispatch(request(Method::OPTIONS, "/custom")).await;
        assert_eq!(body(response).await, "custom");
    }

    #[tokio::test]
    async fn test_default_options_disabled() {
        let mut mux = Mux::new(MuxConfig { default_options: false });
        mux.install_default_options();

        let response = mux.dispatch(request(Method::OPTIONS, "/anything")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_try_route_conflict() {
        let mut mux = Mux::default();
        assert!(mux.try_route(Some(Method::GET), "/a", ok("a"), Vec::new()).is_ok());
        assert!(mux.try_route(Some(Method::GET), "/a", ok("b"), Vec::new()).is_err());
        assert!(mux.try_route(Some(Method::POST), "/a", ok("c"), Vec::new()).is_ok());
    }

    #[tokio::test]
    async fn test_path_params_reach_context() {
        let mut mux = Mux::default();
        mux.get(
            "/users/{id}",
            handler_fn(|ctx| {
                Box::pin(async move {
                    let id = ctx.param_int("id")?;
                    ctx.render_string(StatusCode::OK, &format!("user {id}"))
                })
            }),
            [],
        );

        let response = mux.dispatch(request(Method::GET, "/users/7")).await;
        assert_eq!(body(response).await, "user 7");
    }
}
