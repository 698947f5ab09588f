use std::time::Duration;

use hyper::StatusCode;
use serde::Deserialize;

use super::SettingsError;
use crate::middleware::cors::CorsConfig;
use crate::middleware::rate_limit::LimiterConfig;

/// 파일로 설정하는 limiter 값
///
/// 함수형 옵션(skip, next, 키 생성)은 코드에서 `LimiterConfig`에 직접 지정합니다.
#[derive(Debug, Clone, Deserialize)]
pub struct LimiterSettings {
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// 윈도우 길이 (초)
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,

    #[serde(default = "default_limit_status")]
    pub limit_status: u16,

    #[serde(default)]
    pub skip_fails: bool,

    #[serde(default)]
    pub skip_success: bool,

    #[serde(default)]
    pub debug: bool,
}

fn default_limit() -> i64 { 10 }
fn default_duration_secs() -> u64 { 60 }
fn default_limit_status() -> u16 { StatusCode::LOCKED.as_u16() }

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            duration_secs: default_duration_secs(),
            limit_status: default_limit_status(),
            skip_fails: false,
            skip_success: false,
            debug: false,
        }
    }
}

impl TryFrom<&LimiterSettings> for LimiterConfig {
    type Error = SettingsError;

    fn try_from(settings: &LimiterSettings) -> Result<Self, Self::Error> {
        let limit_status = StatusCode::from_u16(settings.limit_status).map_err(|e| {
            SettingsError::InvalidConfig(format!("limiter.limit_status {}: {}", settings.limit_status, e))
        })?;

        Ok(LimiterConfig {
            limit: settings.limit,
            duration: Duration::from_secs(settings.duration_secs),
            limit_status,
            skip_fails: settings.skip_fails,
            skip_success: settings.skip_success,
            debug: settings.debug,
            ..LimiterConfig::default()
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    #[serde(default = "crate::middleware::cors::default_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default = "crate::middleware::cors::default_methods")]
    pub allowed_methods: Vec<String>,

    #[serde(default = "crate::middleware::cors::default_headers")]
    pub allowed_headers: Vec<String>,

    #[serde(default)]
    pub exposed_headers: Vec<String>,

    #[serde(default)]
    pub max_age: i64,

    #[serde(default = "default_true")]
    pub allow_credentials: bool,

    #[serde(default)]
    pub allow_private_network: bool,

    #[serde(default)]
    pub debug: bool,
}

fn default_true() -> bool { true }

impl From<&CorsSettings> for CorsConfig {
    fn from(settings: &CorsSettings) -> Self {
        CorsConfig {
            allowed_origins: settings.allowed_origins.clone(),
            allowed_methods: settings.allowed_methods.clone(),
            allowed_headers: settings.allowed_headers.clone(),
            exposed_headers: settings.exposed_headers.clone(),
            max_age: settings.max_age,
            allow_credentials: settings.allow_credentials,
            allow_private_network: settings.allow_private_network,
            debug: settings.debug,
            ..CorsConfig::default()
        }
    }
}
