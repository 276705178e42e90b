//! Authentication routes
//!
//! Form-driven login and logout for the administrative surface. Rendering
//! belongs downstream; these handlers own the session cookie and the
//! redirects around it.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use metashark_shared::{CoreError, Session};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    i18n::Locale,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginPageResponse {
    pub message: String,
    pub locale: String,
}

/// The login boundary for unauthenticated visitors (the denial redirect
/// lands here). Password-form presentation is the renderer's concern.
pub async fn login_page(Extension(locale): Extension<Locale>) -> Json<LoginPageResponse> {
    Json(LoginPageResponse {
        message: "Sign in to manage tenants".to_string(),
        locale: locale.0.to_string(),
    })
}

/// Verify credentials, establish the session cookie and send the caller to
/// the administrative root. Failures are generic by design.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    if !form.email.contains('@') || form.password.is_empty() {
        return Err(ApiError::Validation(
            "The provided fields are invalid".to_string(),
        ));
    }

    match state.gate.authenticate(&form.email, &form.password).await {
        Ok((_session, token)) => {
            let cookie = state.gate.sessions().session_cookie(&token);
            let mut response = Redirect::to("/admin").into_response();
            append_set_cookie(&mut response, &cookie)?;
            Ok(response)
        }
        Err(CoreError::Auth) => Err(ApiError::InvalidCredentials),
        Err(err) => Err(err.into()),
    }
}

/// Terminate the session and return to the landing page.
pub async fn logout(State(state): State<AppState>) -> ApiResult<Response> {
    let cookie = state.gate.sessions().clear_cookie();
    let mut response = Redirect::to("/").into_response();
    append_set_cookie(&mut response, &cookie)?;
    Ok(response)
}

/// Who the current session belongs to, for the dashboard header.
pub async fn me(session: Option<Extension<Session>>) -> Response {
    match session {
        Some(Extension(session)) => Json(json!({
            "subject": session.subject,
            "name": session.display_name,
            "email": session.email,
        }))
        .into_response(),
        None => (StatusCode::UNAUTHORIZED, Json(json!({ "user": null }))).into_response(),
    }
}

fn append_set_cookie(response: &mut Response, cookie: &str) -> Result<(), ApiError> {
    let value = header::HeaderValue::from_str(cookie).map_err(|_| ApiError::Internal)?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}
