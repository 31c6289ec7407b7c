//! HTTP surface
//!
//! # Endpoints
//!
//! - `POST /deidentify` - one text, `{text, id?, disabled?, patient_*?}` to `{text, id}`
//! - `POST /deidentify_bulk` - `{texts: [...], disabled?}` to `{texts: [...]}`
//! - `GET /health` - liveness and version
//!
//! # Example
//!
//! ```rust,no_run
//! use deid::anonymization::{adapter::Deidentifier, config::EngineConfig, RuleBasedEngine};
//! use deid::server::{serve, AppState};
//! use std::sync::Arc;
//!
//! # async fn example() -> deid::domain::Result<()> {
//! let engine = RuleBasedEngine::new(EngineConfig::default())
//!     .map_err(|e| deid::domain::DeidError::Configuration(e.to_string()))?;
//! let state = AppState::new(Deidentifier::new(Arc::new(engine)), 1000);
//! let (_tx, rx) = tokio::sync::watch::channel(false);
//! serve(state, "127.0.0.1:5000", rx).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;

use crate::anonymization::adapter::Deidentifier;
use crate::domain::{DeidError, Result};
use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use error::ApiError;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub deidentifier: Deidentifier,
    pub max_bulk_texts: usize,
}

impl AppState {
    pub fn new(deidentifier: Deidentifier, max_bulk_texts: usize) -> Self {
        Self {
            deidentifier,
            max_bulk_texts,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    Router::new()
        .route("/deidentify", post(handlers::deidentify))
        .route("/deidentify_bulk", post(handlers::deidentify_bulk))
        .route("/health", get(handlers::health))
        .layer(ServiceBuilder::new().layer(trace_layer))
        .with_state(state)
}

/// Serve the router until the shutdown signal turns `true`
///
/// In-flight requests are allowed to finish.
pub async fn serve(
    state: AppState,
    bind_address: &str,
    mut shutdown_signal: watch::Receiver<bool>,
) -> Result<()> {
    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(|e| DeidError::Server(format!("Failed to bind {bind_address}: {e}")))?;

    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            // An Err here means the sender was dropped, which also ends the server.
            let _ = shutdown_signal.wait_for(|stop| *stop).await;
            tracing::info!("Shutting down server");
        })
        .await
        .map_err(|e| DeidError::Server(e.to_string()))?;

    tracing::info!("Server stopped");
    Ok(())
}
