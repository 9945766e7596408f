//! Browser front-end for image captioning and children's story generation.
//!
//! Uploaded images are captioned through a remote API, with a per-session
//! cache keyed by image fingerprint. Stories generated from those captions are
//! kept in a five-entry history, optionally with a rendered PDF.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod history;
pub mod imaging;
pub mod page;
pub mod pdf;
pub mod session;
pub mod story;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::client::{ApiClient, Captioner, StoryTeller};
use crate::config::Config;
use crate::pdf::{HttpPdfRenderer, PdfRenderer};
use crate::session::SessionStore;

pub use crate::error::{AppError, Result};

pub struct AppState {
    pub sessions: SessionStore,
    pub captioner: Arc<dyn Captioner>,
    pub storyteller: Arc<dyn StoryTeller>,
    /// `None` disables PDF export
    pub pdf: Option<Arc<dyn PdfRenderer>>,
    pub max_upload_bytes: usize,
    pub session_idle: Duration,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let api = Arc::new(ApiClient::new(config.api_host.clone()));
        Self {
            sessions: SessionStore::new(),
            captioner: api.clone(),
            storyteller: api,
            pdf: config
                .pdf_render_url
                .as_ref()
                .map(|url| Arc::new(HttpPdfRenderer::new(url.clone())) as Arc<dyn PdfRenderer>),
            max_upload_bytes: config.max_upload_bytes,
            session_idle: config.session_idle,
        }
    }
}

/// Periodically drops sessions idle for longer than `state.session_idle`.
pub fn spawn_session_sweeper(state: Arc<AppState>) -> JoinHandle<()> {
    let period = (state.session_idle / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let evicted = state
                .sessions
                .evict_idle(state.session_idle, chrono::Utc::now())
                .await;
            if evicted > 0 {
                tracing::debug!(evicted, "idle sessions dropped");
            }
        }
    })
}

pub fn app(state: Arc<AppState>) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/sessions", post(handlers::create_session))
        .route("/api/sessions/:id", delete(handlers::end_session))
        .route(
            "/api/sessions/:id/images",
            post(handlers::upload_images).layer(upload_limit),
        )
        .route(
            "/api/sessions/:id/characters",
            get(handlers::list_characters).post(handlers::add_character),
        )
        .route(
            "/api/sessions/:id/characters/:index",
            delete(handlers::delete_character),
        )
        .route(
            "/api/sessions/:id/stories",
            get(handlers::list_stories).post(handlers::generate_story),
        )
        .route(
            "/api/sessions/:id/stories/:index/pdf",
            get(handlers::download_pdf),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
