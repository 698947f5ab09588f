use std::sync::Arc;

use ampway::middleware::cors::{cors, CorsConfig};
use ampway::middleware::rate_limit::{limiter, LimiterConfig};
use ampway::settings::Settings;
use ampway::{handler_fn, logging, Group, Mux, MuxConfig, Routes, Server, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct Note {
    #[validate(length(min = 1, max = 200))]
    text: String,
}

type Notes = Arc<RwLock<Vec<Note>>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load().await?;
    let _guard = logging::init_logging(&settings.logging);

    let mut mux = Mux::new(MuxConfig {
        default_options: settings.server.default_options,
    });

    if let Some(cors_settings) = &settings.cors {
        mux.use_middleware(cors(CorsConfig::from(cors_settings)));
    }
    if let Some(limiter_settings) = &settings.limiter {
        mux.use_middleware(limiter(LimiterConfig::try_from(limiter_settings)?));
    }

    mux.get(
        "/health",
        handler_fn(|ctx| Box::pin(async move { ctx.render_string(StatusCode::OK, "ok") })),
        [],
    );

    let notes: Notes = Arc::default();
    mux.group(notes_group(notes));

    let tls = settings.tls.enabled.then(|| settings.tls.clone());
    let server = Server::new(mux, settings.server.clone(), tls);
    info!(addr = %settings.server.addr(), "서버 시작");

    if let Err(e) = server.run().await {
        error!(error = %e, "서버 실행 실패");
        return Err(e.into());
    }
    Ok(())
}

fn notes_group(notes: Notes) -> Group {
    let mut group = Group::new("/notes");

    let list = Arc::clone(&notes);
    group.get(
        "/",
        handler_fn(move |ctx| {
            let notes = Arc::clone(&list);
            Box::pin(async move {
                let notes = notes.read().await;
                ctx.render_json(StatusCode::OK, &*notes)
            })
        }),
        [],
    );

    let create = Arc::clone(&notes);
    group.post(
        "/",
        handler_fn(move |ctx| {
            let notes = Arc::clone(&create);
            Box::pin(async move {
                let note: Note = match ctx.bind_json() {
                    Ok(note) => note,
                    Err(e) => return ctx.render_string(StatusCode::BAD_REQUEST, &e.to_string()),
                };
                notes.write().await.push(note.clone());
                ctx.render_json(StatusCode::CREATED, &note)
            })
        }),
        [],
    );

    group.get(
        "/{index}",
        handler_fn(move |ctx| {
            let notes = Arc::clone(&notes);
            Box::pin(async move {
                let index = ctx.param_int("index")?;
                let notes = notes.read().await;
                let found = usize::try_from(index).ok().and_then(|i| notes.get(i).cloned());
                match found {
                    Some(note) => ctx.render_json(StatusCode::OK, &note),
                    None => ctx.render_string(StatusCode::NOT_FOUND, "note not found"),
                }
            })
        }),
        [],
    );

    group
}
