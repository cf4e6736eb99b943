//! HTTP application wiring.
//!
//! - `services.rs`: picks the repository and image store from configuration
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: multipart decoding and response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, extract::DefaultBodyLimit, routing::get};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use shopdeck_infra::{GatewayConfig, images::local::UPLOADS_ROUTE};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<AppServices>, config: &GatewayConfig) -> anyhow::Result<Router> {
    let app = Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router().layer(Extension(services)))
        .nest_service(UPLOADS_ROUTE, ServeDir::new(&config.upload_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        );

    Ok(match &config.client_origin {
        Some(origin) => app.layer(middleware::cors_layer(origin)?),
        None => app,
    })
}
