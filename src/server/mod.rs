//! HTTP API
//!
//! - GET  /api/health
//! - POST /api/classify-text   JSON `{ "text": "..." }`
//! - POST /api/classify-image  multipart `image`

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::SERVICE_NAME;

use crate::config::Config;
use crate::error::{EcoSortError, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use ecosort_common::{Classifier, MAX_UPLOAD_BYTES};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// multipartのヘッダー等の余裕分
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    /// 画像判定用の乱数（シード指定時は再現可能）
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new(classifier: Classifier, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            classifier: Arc::new(classifier),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.classifier()?, config.rng_seed))
    }
}

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/classify-text", post(handlers::classify_text))
        .route("/api/classify-image", post(handlers::classify_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES as usize + BODY_LIMIT_OVERHEAD))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| EcoSortError::Server(format!("{}: {}", addr, e)))?;
    info!(
        addr = %addr,
        seeded = config.rng_seed.is_some(),
        keywords = ?config.keywords_path,
        "EcoSort API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| EcoSortError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
