//! HTTP surface for `ccman serve`.
//!
//! Thin axum handlers over [`ProfileStore`]; every store call runs on the
//! blocking pool so the store lock never stalls the async runtime.

mod error;
mod routes;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::store::ProfileStore;

pub use error::ApiError;
pub use routes::{ActionResponse, ApplyResponse, SharedStore, StatusResponse};

/// Route prefix for the profile API.
pub const API_PREFIX: &str = "/api/v1/api-config";

/// Build the application router.
pub fn app(store: Arc<ProfileStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    let api = Router::new()
        .route(
            "/profiles",
            get(routes::list_profiles).post(routes::create_profile),
        )
        .route(
            "/profiles/{id}",
            put(routes::update_profile).delete(routes::delete_profile),
        )
        .route("/profiles/{id}/apply", post(routes::apply_profile))
        .route("/current", get(routes::current))
        .route("/status", get(routes::status))
        .route("/backup", post(routes::backup))
        .with_state(store);

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .nest(API_PREFIX, api)
        .layer(cors)
}

/// Serve the router on `addr` until Ctrl-C.
pub async fn serve(store: Arc<ProfileStore>, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to install Ctrl-C handler; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server...");
}
