use std::sync::Arc;

use story_captioner::{app, config::Config, spawn_session_sweeper, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let state = Arc::new(AppState::from_config(&config));
    spawn_session_sweeper(state.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    info!("🚀 Server running on http://{}", listener.local_addr()?);
    info!("📡 Story API at {}", config.api_host);
    match &config.pdf_render_url {
        Some(url) => info!("📄 PDF export via {}", url),
        None => info!("📄 PDF export disabled"),
    }
    info!(
        "🧹 Sessions expire after {}s idle",
        config.session_idle.as_secs()
    );

    axum::serve(listener, app(state)).await?;
    Ok(())
}
