//! Router construction and the listening loop.

use axum::Router;
use axum::routing::{get, post};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use versecast_core::VersecastConfig;
use versecast_core::error::{Result, VersecastError};
use versecast_corpus::CorpusLibrary;
use versecast_scheduler::PreferenceStore;

use crate::routes;

/// State shared by every handler.
pub struct AppState {
    pub config: VersecastConfig,
    pub library: Arc<CorpusLibrary>,
    pub store: PreferenceStore,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: VersecastConfig, library: Arc<CorpusLibrary>, store: PreferenceStore) -> Self {
        Self {
            config,
            library,
            store,
            start_time: Instant::now(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(routes::health_check))
        .route("/api/save-subscription", post(routes::save_subscription))
        .route("/api/translations", get(routes::list_translations))
        .route("/api/verse/random", get(routes::random_verse))
        .route(
            "/api/verse/{translation}/{book}/{chapter}/{verse}",
            get(routes::lookup_verse),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Bind and serve until `shutdown` resolves.
pub async fn serve(state: Arc<AppState>, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VersecastError::Http(format!("cannot bind {addr}: {e}")))?;
    tracing::info!("🌐 Gateway listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| VersecastError::Http(e.to_string()))
}
