mod config;
mod logging;
mod state;
mod routes;
mod routes_session;
mod routes_files;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tracing::info;

use annotation::Session;
use datasets::LangSmithClient;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = AppConfig::from_env()?;
    logging::setup_logging(&cfg.log_level, cfg.log_use_basic_format)?;

    info!(
        endpoint = %cfg.langchain_endpoint,
        project = ?cfg.langchain_project,
        tracing = cfg.langchain_tracing,
        output_dir = %cfg.output_dir.display(),
        allowed_origin = ?cfg.allowed_origin,
        "configuration loaded"
    );

    let client = LangSmithClient::new(&cfg.langchain_endpoint, &cfg.langchain_api_key)
        .context("Failed to create LangSmith client")?;
    let session = Session::new(Box::new(client), cfg.output_dir.clone());
    let app_state = Arc::new(AppState::new(session));

    let allowed_origin = cfg
        .allowed_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()
        .context("ANNOTATOR_ALLOWED_ORIGIN is not a valid header value")?;
    let app = routes::router(app_state, allowed_origin);

    let addr = &cfg.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("annotator listening on http://{addr}");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
