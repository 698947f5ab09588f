//! ampway는 메서드 + 경로 라우팅 위에 핸들러 체인을 실행하는 경량 HTTP 프레임워크입니다.
//!
//! # 주요 기능
//!
//! - 요청 단위 컨텍스트 (파라미터, 쿼리, 값 저장소, 응답 출력)
//! - 전역/그룹/라우트 미들웨어 체인 (abort, next, 에러 전파)
//! - JSON/TOML/YAML/XML 렌더링과 검증을 포함한 바인딩
//! - CORS, 인증, 요청 제한 미들웨어
//!
//! # 예제
//!
//! ```
//! use ampway::{handler_fn, Mux, Routes, StatusCode};
//!
//! let mut mux = Mux::default();
//! mux.get(
//!     "/users/{id}",
//!     handler_fn(|ctx| Box::pin(async move {
//!         let id = ctx.param_int("id")?;
//!         ctx.render_string(StatusCode::OK, &format!("user {id}"))
//!     })),
//!     [],
//! );
//! ```
//!
//! # 미들웨어
//!
//! ```
//! use ampway::middleware::rate_limit::{limiter, LimiterConfig};
//! use ampway::middleware::cors::{cors, CorsConfig};
//! use ampway::Mux;
//!
//! let mut mux = Mux::default();
//! mux.use_middleware(cors(CorsConfig::default()))
//!     .use_middleware(limiter(LimiterConfig::default()));
//! ```

pub mod binding;
pub mod context;
pub mod logging;
pub mod middleware;
pub mod routing;
pub mod server;
pub mod settings;
pub mod tls;

pub use context::Context;
pub use hyper::{Method, StatusCode};
pub use middleware::{handler_fn, BoxedHandler, Error, Handler, Outcome, Result};
pub use routing::{Group, Mux, MuxConfig, Routes};
pub use server::Server;
