//! HTTP front-end: the polling dashboard and the one-shot scan API.
//!
//! Routes:
//! - `GET /` — embedded dashboard page
//! - `POST /start` — kick off a background run (`{url, folder?}`)
//! - `GET /status` — current run snapshot for pollers
//! - `POST /scan` — find links on a page without downloading (`{url}`)

pub mod error;
pub mod models;

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::scrape::{RunController, Scraper};
use error::ApiError;
use models::{ScanRequest, ScanResponse, StartRequest, StartedResponse};

/// Shared state behind every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Owner of the single background run.
    pub controller: RunController,
    /// Scraper used by the download-free `/scan` endpoint.
    pub scanner: Scraper,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            controller: RunController::default(),
            scanner: Scraper::new(),
        }
    }
}

/// Builds the application router. Exposed so tests can drive it in-process.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/start", post(start))
        .route("/status", get(status))
        .route("/scan", post(scan))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds `address` and serves the app until ctrl-c or SIGTERM.
///
/// # Errors
///
/// Returns an IO error when the listener cannot bind or the server fails.
pub async fn run(address: SocketAddr) -> std::io::Result<()> {
    let app = router(AppState::default());

    let listener = TcpListener::bind(address).await?;
    info!(%address, "dashboard listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn index() -> Html<&'static str> {
    Html(include_str!("ui.html"))
}

async fn start(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let url = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingUrl)?;

    state
        .controller
        .start(url, request.folder)
        .map_err(|_| ApiError::AlreadyRunning)?;

    Ok((StatusCode::ACCEPTED, Json(StartedResponse::new())))
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.status())
}

async fn scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let url = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingUrl)?;

    let pdfs = state
        .scanner
        .scan(url)
        .await
        .map_err(|e| ApiError::Fetch(e.to_string()))?;

    Ok(Json(ScanResponse {
        count: pdfs.len(),
        pdfs,
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        #[allow(clippy::expect_used)]
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        #[allow(clippy::expect_used)]
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
