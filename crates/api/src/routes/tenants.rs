//! Administrative tenant routes
//!
//! Thin handlers over the tenant manager. Validation and conflict failures
//! echo the submitted values back so the admin form can repopulate.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use metashark_shared::{CoreError, Session, TenantRecord};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateTenantForm {
    pub subdomain: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckForm {
    pub subdomain: String,
}

/// Validation/conflict payload carrying the submitted values back to the
/// form
#[derive(Debug, Serialize)]
pub struct TenantFormError {
    pub error: String,
    pub subdomain: String,
    pub icon: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: Session,
    pub tenants: Vec<TenantRecord>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub removed: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub subdomain: String,
    pub available: bool,
}

/// The administrative dashboard payload: the signed-in user plus the
/// tenant listing.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<DashboardResponse>> {
    let tenants = state.tenants.list_tenants().await?;
    tracing::debug!("dashboard for {}: {} tenants", session.email, tenants.len());
    Ok(Json(DashboardResponse {
        user: session,
        tenants,
    }))
}

/// The cached tenant listing, in creation order.
pub async fn list_tenants(State(state): State<AppState>) -> ApiResult<Json<Vec<TenantRecord>>> {
    Ok(Json(state.tenants.list_tenants().await?))
}

/// Create a tenant and send the caller to its external URL.
pub async fn create_tenant(
    State(state): State<AppState>,
    Form(form): Form<CreateTenantForm>,
) -> Response {
    match state.tenants.create_tenant(&form.subdomain, &form.icon).await {
        Ok(record) => {
            Redirect::to(&state.config.tenant_url(&record.subdomain)).into_response()
        }
        Err(CoreError::Validation(error)) => (
            StatusCode::BAD_REQUEST,
            Json(TenantFormError {
                error,
                subdomain: form.subdomain,
                icon: form.icon,
            }),
        )
            .into_response(),
        Err(CoreError::Conflict(error)) => (
            StatusCode::CONFLICT,
            Json(TenantFormError {
                error,
                subdomain: form.subdomain,
                icon: form.icon,
            }),
        )
            .into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// Delete a tenant. "Not found" is a success with a distinct message, never
/// an error; store failures surface separately.
pub async fn delete_tenant(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let removed = state.tenants.delete_tenant(&subdomain).await?;
    let message = if removed {
        "Subdomain deleted successfully".to_string()
    } else {
        format!("Subdomain '{subdomain}' was not found")
    };
    Ok(Json(DeleteResponse { removed, message }))
}

/// Advisory availability check for the create form.
pub async fn check_availability(
    State(state): State<AppState>,
    Form(form): Form<CheckForm>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let available = state.tenants.subdomain_available(&form.subdomain).await?;
    Ok(Json(AvailabilityResponse {
        subdomain: form.subdomain,
        available,
    }))
}
