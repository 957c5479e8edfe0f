//! HTTP server: page routes and the comment endpoint

mod api;
mod error;
mod pages;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::AppError;

use crate::config::SiteConfig;
use crate::render::PageRenderer;
use crate::store::ContentStore;

/// Shared state handed to every handler
pub struct AppState {
    pub config: SiteConfig,
    pub renderer: PageRenderer,
    pub store: Arc<dyn ContentStore>,
}

impl AppState {
    pub fn new(config: SiteConfig, store: Arc<dyn ContentStore>) -> Result<Self> {
        let renderer = PageRenderer::new(&config)?;
        Ok(Self {
            config,
            renderer,
            store,
        })
    }

    /// `Cache-Control` for post pages
    fn cache_control(&self) -> String {
        format!("public, max-age={}", self.config.revalidate)
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/post/:slug", get(pages::post_page))
        .route("/post/:slug/comment", post(pages::submit_comment))
        .route("/api/createComment", post(api::create_comment))
        .route("/healthz", get(|| async { "ok" }))
        .fallback(pages::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server and run until interrupted
pub async fn start(
    config: SiteConfig,
    store: Arc<dyn ContentStore>,
    ip: &str,
    port: u16,
) -> Result<()> {
    match store.fetch_slugs().await {
        Ok(slugs) => tracing::info!("{} post route(s) available", slugs.len()),
        Err(e) => tracing::warn!("Could not list posts: {}", e),
    }

    let state = Arc::new(AppState::new(config, store)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
