pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use client::{Controller, HttpTodoApi};
use config::Config;
use db::Db;
use repository::SledTodoStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = Config::parse();

    let db = if config.in_memory {
        tracing::warn!("running with an in-memory database");
        Db::temporary()?
    } else {
        Db::open(&config.db_path)
            .with_context(|| format!("failed to open database at {}", config.db_path))?
    };
    let store = Arc::new(SledTodoStore::new(db));

    // the page talks to the API over HTTP, like any other client would
    let api_url = config.api_url();
    tracing::debug!(%api_url, "page reaches the API");
    let controller = Controller::new(HttpTodoApi::new(&api_url)?);
    let app = Router::new()
        .merge(api::routes(api::ApiState::new(store.clone())))
        .merge(ui::routes(controller))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to listen on {}", config.addr))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.flush().await?;
    tracing::info!("database flushed, bye");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mortodo=debug,tower_http=debug,info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
