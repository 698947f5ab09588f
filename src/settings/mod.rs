use std::{env, fs, path::Path};
use serde::Deserialize;
use tracing::debug;

mod error;
pub mod logging;
mod middleware;
mod server;
mod tls;

pub use error::SettingsError;
pub use logging::{LogFormat, LogOutput, LogSettings};
pub use middleware::{CorsSettings, LimiterSettings};
pub use server::{parse_env_var, ServerSettings};
pub use tls::TlsSettings;

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    // 서버 설정
    #[serde(default)]
    pub server: ServerSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    // TLS 설정
    #[serde(default)]
    pub tls: TlsSettings,

    /// 전역 limiter (없으면 설치하지 않음)
    #[serde(default)]
    pub limiter: Option<LimiterSettings>,

    /// 전역 CORS (없으면 설치하지 않음)
    #[serde(default)]
    pub cors: Option<CorsSettings>,
}

impl Settings {
    /// `AMPWAY_CONFIG_FILE`이 있으면 TOML 파일에서, 없으면 환경 변수에서 읽습니다.
    pub async fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("AMPWAY_CONFIG_FILE") {
            Self::from_toml_file(&config_path).await
        } else {
            Self::from_env().await
        }
    }

    pub async fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("설정 파일 로드: {}", path.as_ref().display());
        let content = fs::read_to_string(&path).map_err(|e| SettingsError::FileError {
            path: path.as_ref().to_string_lossy().to_string(),
            error: e,
        })?;

        let settings: Self = toml::from_str(&content)?;
        settings.validate().await?;
        Ok(settings)
    }

    pub async fn from_env() -> Result<Self> {
        let settings = Self {
            server: ServerSettings::from_env()?,
            logging: LogSettings::from_env()?,
            tls: TlsSettings::from_env()?,
            limiter: None,
            cors: None,
        };

        settings.validate().await?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    pub async fn validate(&self) -> Result<()> {
        self.tls.validate().await?;

        // HTTP/HTTPS 포트 충돌 검사
        if self.tls.enabled && self.server.port == self.tls.port {
            return Err(SettingsError::EnvVarInvalid {
                var_name: "AMPWAY_PORT/AMPWAY_TLS_PORT".to_string(),
                value: format!("{}/{}", self.server.port, self.tls.port),
                reason: "HTTP와 HTTPS 포트는 달라야 합니다".to_string(),
            });
        }

        Ok(())
    }
}
