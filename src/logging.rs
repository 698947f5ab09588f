use std::fmt::Display;
use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

use crate::context::Context;
use crate::settings::{LogFormat, LogOutput, LogSettings};

/// 전역 tracing 구독자를 설치합니다.
///
/// 파일 출력일 때 반환되는 guard가 살아 있는 동안만 로그가 기록됩니다.
/// 이미 구독자가 설치되어 있으면 아무 것도 하지 않습니다.
pub fn init_logging(settings: &LogSettings) -> Option<WorkerGuard> {
    let default_level = LevelFilter::from_level(settings.level);
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
        .add_directive("ampway=debug".parse().unwrap_or_else(|_| default_level.into()));

    let (writer, guard) = match &settings.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::File(path) => {
            let path = Path::new(path);
            let directory = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| "ampway.log".as_ref());
            tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name))
        }
    };

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let installed = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    match installed {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

/// 요청 한 건의 완료 기록
#[derive(Debug, Clone)]
pub struct RequestLog {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub origin: String,
    /// 핸들러가 설정한 마지막 상태 코드
    pub status: Option<u16>,
    pub aborted: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

impl RequestLog {
    pub fn from_context(ctx: &Context) -> Self {
        Self {
            request_id: ctx.request_id().to_string(),
            method: ctx.method().to_string(),
            path: ctx.path().to_string(),
            origin: ctx.origin().to_string(),
            status: ctx.status().map(|status| status.as_u16()),
            aborted: ctx.is_aborted(),
            duration_ms: 0,
            error: None,
        }
    }

    pub fn with_error(&mut self, error: impl Display) {
        self.error = Some(error.to_string());
    }
}

/// 요청 완료 기록을 남깁니다.
///
/// 에러는 ERROR, 4xx/5xx 상태는 WARN, abort와 정상 완료는 INFO로 기록합니다.
pub fn log_request(log: &RequestLog) {
    if let Some(err) = &log.error {
        error!(
            request_id = %log.request_id,
            method = %log.method,
            path = %log.path,
            origin = %log.origin,
            status = ?log.status,
            duration_ms = log.duration_ms,
            error = %err,
            "요청 처리 실패"
        );
    } else if log.status.map_or(false, |status| status >= 400) {
        warn!(
            request_id = %log.request_id,
            method = %log.method,
            path = %log.path,
            origin = %log.origin,
            status = ?log.status,
            aborted = log.aborted,
            duration_ms = log.duration_ms,
            "요청 완료 (에러 상태)"
        );
    } else if log.aborted {
        info!(
            request_id = %log.request_id,
            method = %log.method,
            path = %log.path,
            origin = %log.origin,
            status = ?log.status,
            duration_ms = log.duration_ms,
            "요청 중단"
        );
    } else {
        info!(
            request_id = %log.request_id,
            method = %log.method,
            path = %log.path,
            origin = %log.origin,
            status = ?log.status,
            duration_ms = log.duration_ms,
            "요청 완료"
        );
    }
}
