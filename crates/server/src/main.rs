use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod notes;

use config::{load_settings, Settings};
use notes::{notes_view, NotesView};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let app = build_router(&settings)?;

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(settings: &Settings) -> anyhow::Result<Router> {
    let notes = notes_view(NotesView::new(settings.page_title.clone()))?;
    info!(
        get_actions = ?notes.dispatcher().get_actions().actions(),
        post_actions = ?notes.dispatcher().post_actions().actions(),
        "mounted notes board at /boards/:board"
    );

    Ok(Router::new()
        .route("/healthz", get(healthz))
        .merge(notes.into_router("/boards/:board"))
        .layer(RequestBodyLimitLayer::new(settings.max_body_bytes)))
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
