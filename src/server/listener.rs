use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use hyper_util::rt::TokioIo;
use crate::{
    settings::{ServerSettings, TlsSettings},
    tls::TlsConfig,
};
use tracing::{error, info};
use super::handler::RequestHandler;
use super::Result;

pub struct ServerListener {
    http_listener: TcpListener,
    https_config: Option<TlsConfig>,
}

impl ServerListener {
    pub async fn new(server: &ServerSettings, tls: Option<&TlsSettings>) -> Result<Self> {
        let http_listener = TcpListener::bind(server.addr())
            .await
            .map_err(|e| {
                error!(error = %e, port = server.port, "HTTP 포트 바인딩 실패");
                e
            })?;

        info!(port = server.port, "HTTP 리스너 시작");

        let https_config = match tls {
            Some(tls) if tls.enabled => Some(TlsConfig::new(&server.host, tls).await?),
            _ => None,
        };

        Ok(Self {
            http_listener,
            https_config,
        })
    }

    /// 이미 바인딩된 HTTP 리스너로 만듭니다.
    pub fn from_listener(http_listener: TcpListener) -> Self {
        Self {
            http_listener,
            https_config: None,
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.http_listener.local_addr()?)
    }

    pub async fn run(
        self,
        handler: Arc<RequestHandler>,
    ) -> Result<()> {
        loop {
            tokio::select! {
                result = self.http_listener.accept() => {
                    match result {
                        Ok((stream, _)) => {
                            let handler = handler.clone();
                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                if let Err(err) = handler.handle_connection(io).await {
                                    error!(error = %err, "HTTP 연결 처리 실패");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "HTTP 연결 수락 실패");
                        }
                    }
                }

                result = async {
                    match &self.https_config {
                        Some(config) => config
                            .listener
                            .accept()
                            .await
                            .map(|accepted| (accepted, config.acceptor.clone())),
                        None => std::future::pending().await,
                    }
                } => {
                    match result {
                        Ok(((stream, _), acceptor)) => {
                            let handler = handler.clone();
                            tokio::spawn(async move {
                                match acceptor.accept(stream).await {
                                    Ok(tls_stream) => {
                                        let io = TokioIo::new(tls_stream);
                                        if let Err(err) = handler.handle_connection(io).await {
                                            error!(error = %err, "HTTPS 연결 처리 실패");
                                        }
                                    }
                                    Err(e) => {
                                        error!(error = %e, "TLS 핸드쉐이크 실패");
                                    }
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "HTTPS 연결 수락 실패");
                        }
                    }
                }
            }
        }
    }
}
