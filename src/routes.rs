//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check: database and cache (public)
//! - `/api/posts*`       - Post API (reads public, writes need a session)
//! - `/uploads/*`        - Uploaded images
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter for mutations
//! - **Body limit** - `MAX_UPLOAD_BYTES` per request
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes::{protected_routes, public_routes};
use crate::config::Config;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower::Layer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// `config.behind_proxy` switches rate limiting to forwarding headers; see
/// [`rate_limit::apply`].
pub fn app_router(state: AppState, config: &Config) -> NormalizePath<Router> {
    let public = rate_limit::apply(public_routes(), rate_limit::PUBLIC, config.behind_proxy);
    let protected = rate_limit::apply(
        protected_routes(state.clone()),
        rate_limit::MUTATING,
        config.behind_proxy,
    );

    let api_router = public
        .merge(protected)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes));

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
