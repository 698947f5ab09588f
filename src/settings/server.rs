use serde::Deserialize;
use std::env;
use super::SettingsError;

#[derive(Clone, Debug, Deserialize)]
pub struct ServerSettings {
    /// 바인딩 주소 (기본값: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP 포트 (기본값: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// 기본 OPTIONS 응답기 설치 여부
    #[serde(default = "default_options")]
    pub default_options: bool,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_options() -> bool { true }

pub fn parse_env_var<T: std::str::FromStr, F: FnOnce() -> T>(name: &str, default: F) -> Result<T, SettingsError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e: T::Err| SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: val,
            reason: e.to_string(),
        }),
        Err(env::VarError::NotPresent) => Ok(default()),
        Err(e) => Err(SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: "".to_string(),
            reason: e.to_string(),
        }),
    }
}

impl ServerSettings {
    pub(crate) fn parse_port(name: &str, default: u16) -> Result<u16, SettingsError> {
        let port = parse_env_var(name, || default)?;
        if port == 0 {
            return Err(SettingsError::EnvVarInvalid {
                var_name: name.to_string(),
                value: port.to_string(),
                reason: "포트는 0이 될 수 없습니다".to_string(),
            });
        }
        Ok(port)
    }

    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(Self {
            host: env::var("AMPWAY_HOST").unwrap_or_else(|_| default_host()),
            port: Self::parse_port("AMPWAY_PORT", default_port())?,
            default_options: parse_env_var("AMPWAY_DEFAULT_OPTIONS", default_options)?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_options: default_options(),
        }
    }
}
