use std::collections::HashMap;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hyper::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use hyper::StatusCode;
use serde::Deserialize;

use super::config::AuthConfig;
use crate::context::Context;
use crate::handler_fn;

/// Basic 인증 설정
#[derive(Debug, Clone, Deserialize)]
pub struct BasicAuthConfig {
    /// 사용자 이름과 bcrypt 해시 맵
    #[serde(default)]
    pub users: HashMap<String, String>,

    /// 인증 영역 (realm)
    #[serde(default = "default_realm")]
    pub realm: String,
}

fn default_realm() -> String {
    "Restricted Area".to_string()
}

impl Default for BasicAuthConfig {
    fn default() -> Self {
        Self {
            users: HashMap::new(),
            realm: default_realm(),
        }
    }
}

/// Authorization 헤더에서 자격증명을 추출합니다.
pub(crate) fn credentials(ctx: &Context) -> Option<(String, String)> {
    let encoded = ctx.header(AUTHORIZATION.as_str())?.strip_prefix("Basic ")?.trim();
    let decoded = String::from_utf8(BASE64.decode(encoded).ok()?).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// bcrypt ($2a$, $2b$, $2y$) 해시만 지원합니다.
fn verify_password(password: &str, hash: &str) -> bool {
    hash.starts_with("$2") && bcrypt::verify(password, hash).unwrap_or(false)
}

/// Basic 인증용 `AuthConfig`를 만듭니다.
///
/// 거부된 요청에는 `WWW-Authenticate` 헤더와 함께 401을 응답합니다.
pub fn basic(config: BasicAuthConfig) -> AuthConfig {
    let users = Arc::new(config.users);
    let challenge = format!("Basic realm=\"{}\"", config.realm);

    AuthConfig::new(move |ctx| {
        credentials(ctx)
            .and_then(|(user, password)| users.get(&user).map(|hash| verify_password(&password, hash)))
            .unwrap_or(false)
    })
    .with_no_access(handler_fn(move |ctx| {
        let challenge = challenge.clone();
        Box::pin(async move {
            ctx.add_header(WWW_AUTHENTICATE.as_str(), &challenge)?;
            ctx.render_string(StatusCode::UNAUTHORIZED, "Unauthorized")
        })
    }))
}
