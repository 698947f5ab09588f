use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_rustls::rustls::{self, Certificate, PrivateKey};
use tokio_rustls::TlsAcceptor;
use tracing::{error, info};

use crate::server::ServerError;
use crate::settings::TlsSettings;

pub struct TlsConfig {
    pub acceptor: TlsAcceptor,
    pub listener: TcpListener,
}

impl TlsConfig {
    pub async fn new(host: &str, settings: &TlsSettings) -> Result<Self, ServerError> {
        let (cert_path, key_path) = match (&settings.cert_path, &settings.key_path) {
            (Some(cert), Some(key)) => (cert, key),
            _ => return Err(ServerError::Tls("인증서와 개인키 경로가 필요합니다".to_string())),
        };

        let tls_config = Self::load_tls_config(cert_path, key_path)?;
        let acceptor = TlsAcceptor::from(Arc::new(tls_config));

        let listener = TcpListener::bind(format!("{}:{}", host, settings.port)).await
            .map_err(|e| {
                error!(error = %e, port = settings.port, "HTTPS 포트 바인딩 실패");
                e
            })?;

        info!(port = settings.port, "HTTPS 리스너 시작");
        Ok(Self { acceptor, listener })
    }

    pub fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<rustls::ServerConfig, ServerError> {
        let mut cert_reader = BufReader::new(File::open(cert_path)?);
        let certs: Vec<Certificate> = rustls_pemfile::certs(&mut cert_reader)?
            .into_iter()
            .map(Certificate)
            .collect();
        if certs.is_empty() {
            return Err(ServerError::Tls(format!("인증서를 찾을 수 없음: {}", cert_path.display())));
        }

        let key = Self::load_private_key(key_path)?;

        rustls::ServerConfig::builder()
            .with_safe_defaults()
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .map_err(|e| ServerError::Tls(e.to_string()))
    }

    /// PKCS#8 키를 먼저 찾고, 없으면 RSA(PKCS#1) 키를 찾습니다.
    fn load_private_key(key_path: &Path) -> Result<PrivateKey, ServerError> {
        let mut reader = BufReader::new(File::open(key_path)?);
        if let Some(key) = rustls_pemfile::pkcs8_private_keys(&mut reader)?.into_iter().next() {
            return Ok(PrivateKey(key));
        }

        let mut reader = BufReader::new(File::open(key_path)?);
        rustls_pemfile::rsa_private_keys(&mut reader)?
            .into_iter()
            .next()
            .map(PrivateKey)
            .ok_or_else(|| ServerError::Tls(format!("개인키를 찾을 수 없음: {}", key_path.display())))
    }
}
