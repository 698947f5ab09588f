//! HTTP 서버
//!
//! 연결마다 작업을 하나 띄우고, 요청마다 라우터의 체인을 실행합니다.

pub mod error;
pub mod handler;
pub mod listener;

pub use error::ServerError;
pub use handler::RequestHandler;
pub use listener::ServerListener;

pub type Result<T> = std::result::Result<T, ServerError>;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::routing::Mux;
use crate::settings::{ServerSettings, TlsSettings};

pub struct Server {
    mux: Arc<Mux>,
    settings: ServerSettings,
    tls: Option<TlsSettings>,
}

impl Server {
    /// 서버를 만들면서 기본 OPTIONS 응답기를 설치합니다.
    pub fn new(mut mux: Mux, settings: ServerSettings, tls: Option<TlsSettings>) -> Self {
        mux.install_default_options();
        Self {
            mux: Arc::new(mux),
            settings,
            tls,
        }
    }

    pub fn mux(&self) -> &Arc<Mux> {
        &self.mux
    }

    /// 설정된 주소에 바인딩하고 연결을 받습니다.
    pub async fn run(self) -> Result<()> {
        let listener = ServerListener::new(&self.settings, self.tls.as_ref()).await?;
        listener.run(Arc::new(RequestHandler::new(self.mux))).await
    }

    /// 이미 바인딩된 리스너로 HTTP만 서비스합니다.
    pub async fn serve_listener(self, listener: TcpListener) -> Result<()> {
        ServerListener::from_listener(listener)
            .run(Arc::new(RequestHandler::new(self.mux)))
            .await
    }
}
