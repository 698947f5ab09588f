use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use hyper::Request;
use tracing::debug;

use super::{BoxedHandler, Error, Result};
use crate::context::Context;
use crate::logging::{log_request, RequestLog};

/// 라우트 등록 시점에 고정되는 핸들러 체인
///
/// 전역 미들웨어 → 라우트 미들웨어 → 최종 핸들러 순서로 이어 붙인 스냅샷이며,
/// 이후 전역 미들웨어가 추가되어도 이미 만들어진 체인은 바뀌지 않습니다.
#[derive(Clone)]
pub struct Chain {
    handlers: Arc<[BoxedHandler]>,
}

impl Chain {
    pub fn new(global: &[BoxedHandler], route: &[BoxedHandler], terminal: BoxedHandler) -> Self {
        let handlers: Vec<BoxedHandler> = global
            .iter()
            .chain(route.iter())
            .cloned()
            .chain(std::iter::once(terminal))
            .collect();

        Self {
            handlers: handlers.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// 이 체인을 실행할 요청 컨텍스트를 만듭니다.
    pub fn context(&self, request: Request<Bytes>, params: HashMap<String, String>) -> Context {
        Context::new(request, params, Arc::clone(&self.handlers))
    }

    /// 컨텍스트를 만들고 체인을 끝까지 실행합니다.
    pub async fn run(&self, request: Request<Bytes>, params: HashMap<String, String>) -> (Context, Outcome) {
        let mut ctx = self.context(request, params);
        let outcome = execute(&mut ctx).await;
        (ctx, outcome)
    }
}

/// 체인 실행 결과
#[derive(Debug)]
pub enum Outcome {
    /// 모든 핸들러가 실행됨
    Completed,
    /// 어떤 핸들러가 abort 함
    Aborted,
    /// 어떤 핸들러가 에러를 반환함
    Errored(Error),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted)
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Outcome::Errored(err) => Some(err),
            _ => None,
        }
    }
}

/// 커서를 한 칸씩 전진시키며 남은 핸들러를 실행합니다.
///
/// 실행기와 `Context::next()`가 모두 이 루프를 사용하므로 커서가 이미 지나간
/// 핸들러는 다시 실행되지 않습니다. 에러가 나면 커서를 끝으로 옮겨 이후
/// 핸들러가 실행될 수 없게 합니다.
pub(crate) async fn drive(ctx: &mut Context) -> Result<()> {
    while !ctx.is_aborted() {
        let Some(handler) = ctx.advance() else {
            break;
        };

        if let Err(err) = handler.call(ctx).await {
            ctx.exhaust();
            return Err(err);
        }
    }
    Ok(())
}

/// 핸들러 체인 실행기
///
/// 결과와 관계없이 요청 완료 기록을 남깁니다. 에러는 재시도하지 않으며
/// 상태 코드로 자동 변환하지도 않습니다.
pub async fn execute(ctx: &mut Context) -> Outcome {
    let started = Instant::now();
    debug!(
        request_id = %ctx.request_id(),
        handlers = ctx.handler_count(),
        "핸들러 체인 실행 시작"
    );

    let result = drive(ctx).await;

    let mut log = RequestLog::from_context(ctx);
    log.duration_ms = started.elapsed().as_millis() as u64;

    let outcome = match result {
        Err(err) => {
            log.with_error(&err);
            Outcome::Errored(err)
        }
        Ok(()) if ctx.is_aborted() => Outcome::Aborted,
        Ok(()) => Outcome::Completed,
    };

    log_request(&log);
    outcome
}
