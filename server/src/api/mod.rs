//! API Router and Application State
//!
//! Central routing configuration and shared state.

pub mod catalog;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use ipm_common::Role;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    auth,
    config::Config,
    permissions::{guarded, RouteRequirement},
    privacy::{self, PrivacyMasker},
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Response masker applied after handlers
    pub masker: Arc<PrivacyMasker>,
}

impl AppState {
    /// Create new application state with the investor visibility rule.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_masker(config, PrivacyMasker::new())
    }

    /// Create application state with a custom masker.
    #[must_use]
    pub fn with_masker(config: Config, masker: PrivacyMasker) -> Self {
        Self {
            config: Arc::new(config),
            masker: Arc::new(masker),
        }
    }
}

/// Wrap application routes in the request pipeline.
///
/// Inbound: viewer extraction, then each route's own gates. Outbound:
/// privacy masking of JSON bodies. `routes` must contain at least one route.
pub fn with_pipeline(routes: Router<AppState>, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes
        .route_layer(from_fn_with_state(state.clone(), privacy::mask_response))
        .layer(from_fn_with_state(state.clone(), auth::attach_viewer))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    // Admin-tier routes (project_admin satisfies the admin token)
    let admin_routes = guarded(
        Router::new().route("/api/roles", get(catalog::get_role_table)),
        RouteRequirement::new().roles([Role::Admin]),
    );

    // Protected routes that require authentication
    let protected_routes = Router::new()
        .route("/api/me/permissions", get(catalog::get_my_permissions))
        .merge(admin_routes)
        .layer(from_fn_with_state(state.clone(), auth::require_auth));

    let routes = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Public catalog mirror
        .route("/api/permissions", get(catalog::get_catalog))
        .merge(protected_routes);

    with_pipeline(routes, state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Server version
    version: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
