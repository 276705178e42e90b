//! HTTP routes

pub mod auth;
pub mod health;
pub mod site;
pub mod tenants;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{routing::host_routing, state::AppState};

/// Create all routes, wrapped in the host-routing interception layer
pub fn create_router(state: AppState) -> Router {
    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Root-host public routes
    let public_routes = Router::new()
        .route("/", get(site::root_home))
        .route("/login", get(auth::login_page))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));

    // Administrative routes; the host-routing layer denies these without a
    // valid session, so handlers can assume one is present
    let admin_routes = Router::new()
        .route("/admin", get(tenants::dashboard))
        .route("/admin/tenants", get(tenants::list_tenants))
        .route("/admin/tenants", post(tenants::create_tenant))
        .route("/admin/tenants/check", post(tenants::check_availability))
        .route("/admin/tenants/:subdomain", delete(tenants::delete_tenant));

    // Tenant-scoped routes, reached through the internal rewrite
    let tenant_routes = Router::new()
        .route("/s/:subdomain", get(site::tenant_home))
        .route("/s/:subdomain/*path", get(site::tenant_page));

    let router = Router::new()
        .merge(health_routes)
        .merge(public_routes)
        .merge(admin_routes)
        .merge(tenant_routes)
        .with_state(state.clone());

    // `Router::layer` runs middleware after route matching, so the host
    // rewrite must sit on an outer router that delegates every request to
    // the routed one — otherwise the rewritten URI never affects dispatch.
    Router::new()
        .fallback_service(router)
        .layer(middleware::from_fn_with_state(state, host_routing))
        .layer(TraceLayer::new_for_http())
}
