//! Public site routes
//!
//! The landing page on the root host plus the internal `/s/...` targets that
//! tenant-host requests are rewritten to. Responses are JSON payloads for a
//! downstream renderer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use metashark_shared::CoreError;
use serde::Serialize;
use serde_json::json;

use crate::{error::ApiResult, i18n::Locale, state::AppState};

#[derive(Debug, Serialize)]
pub struct RootHomeResponse {
    pub root_domain: String,
    pub locale: String,
    pub tenant_count: usize,
}

/// Landing page on the root host.
pub async fn root_home(
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
) -> ApiResult<Json<RootHomeResponse>> {
    let tenants = state.tenants.list_tenants().await?;
    Ok(Json(RootHomeResponse {
        root_domain: state.config.root_domain.clone(),
        locale: locale.0.to_string(),
        tenant_count: tenants.len(),
    }))
}

/// Tenant root, reached through the internal rewrite. Unknown subdomains get
/// a 404 placeholder instead of falling through to the root site.
pub async fn tenant_home(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> ApiResult<Response> {
    render_tenant(&state, &subdomain, "/").await
}

/// Any deeper path on a tenant host.
pub async fn tenant_page(
    State(state): State<AppState>,
    Path((subdomain, path)): Path<(String, String)>,
) -> ApiResult<Response> {
    render_tenant(&state, &subdomain, &format!("/{path}")).await
}

async fn render_tenant(state: &AppState, subdomain: &str, path: &str) -> ApiResult<Response> {
    match state.registry.get(subdomain).await.map_err(CoreError::from)? {
        Some(tenant) => Ok(Json(json!({
            "subdomain": tenant.subdomain,
            "icon": tenant.icon,
            "createdAt": tenant.created_at,
            "path": path,
        }))
        .into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No site exists for '{subdomain}'"),
                "subdomain": subdomain,
            })),
        )
            .into_response()),
    }
}
