use thiserror::Error;

use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS 오류: {0}")]
    Tls(String),

    #[error("설정 오류: {0}")]
    Config(#[from] SettingsError),
}
