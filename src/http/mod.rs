//! HTTP surface: router, shared state, and error-to-response mapping.

pub mod decode;
pub mod install;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::application::ports::Installer;
use crate::application::services::install::InstallService;
use crate::config::Config;
use crate::domain::ServiceError;

/// Shared read-only state: configuration plus the installer behind its
/// port. Cloned per request; concurrent requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: Arc<InstallService>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, installer: Arc<dyn Installer>) -> Self {
        let service = Arc::new(InstallService::new(&config, installer));
        Self {
            config: Arc::new(config),
            service,
        }
    }
}

/// Compose the service router:
///   - `POST /install` runs the pipeline and streams back the archive
///   - `GET /health`   answers liveness probes
///
/// Other methods on `/install` get 405 from the method router before any
/// request state exists. The body-limit layer holds both wire encodings to
/// the configured ceiling.
#[must_use]
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.body_limit;
    Router::new()
        .route("/install", post(install::handle))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Minimal health-check handler for container / load-balancer probes.
async fn health() -> StatusCode {
    StatusCode::OK
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "install request failed");
        }
        (status, self.to_string()).into_response()
    }
}
