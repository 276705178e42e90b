//! Request interception layer
//!
//! A composable middleware invoked by the serving layer on every inbound
//! request. It applies the pure routing decision: tenant rewrites mutate the
//! request URI before the router matches, denials redirect to the login
//! page, and root-host traffic gets locale negotiation plus the session (if
//! any) as request extensions.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    auth::{cookie_value, SESSION_COOKIE},
    i18n,
    state::AppState,
};

use super::classifier::{decide, RouteDecision};

/// Where denied requests are sent to sign in
pub const LOGIN_PATH: &str = "/login";

/// Classify and dispatch one request.
pub async fn host_routing(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let path = req.uri().path().to_string();

    // Session validation is a cheap token decode; the expensive hash work
    // only happens at login.
    let session = cookie_value(req.headers(), SESSION_COOKIE)
        .and_then(|token| state.gate.validate(token));

    let decision = decide(
        &host,
        &path,
        &state.config.dev_host_label,
        &state.config.protected_prefix,
        || session.is_some(),
    );

    match decision {
        RouteDecision::Rewrite {
            subdomain,
            path: rewritten,
        } => {
            tracing::debug!("tenant host '{subdomain}' detected, rewriting to {rewritten}");

            // The bare tenant root ("/") is served at /s/<name>; deeper
            // paths keep the rewritten form verbatim.
            let target = if path == "/" {
                format!("/s/{subdomain}")
            } else {
                rewritten
            };
            let target = match req.uri().query() {
                Some(query) => format!("{target}?{query}"),
                None => target,
            };

            match target.parse::<Uri>() {
                Ok(uri) => {
                    *req.uri_mut() = uri;
                    next.run(req).await
                }
                Err(_) => StatusCode::BAD_REQUEST.into_response(),
            }
        }
        RouteDecision::Deny { reason } => {
            tracing::debug!("protected path {path} denied ({reason}), redirecting to login");
            Redirect::temporary(LOGIN_PATH).into_response()
        }
        RouteDecision::Allow | RouteDecision::Delegate => {
            // Locale negotiation runs on root-host traffic only; tenant
            // hosts never reach this branch.
            let locale = negotiate_locale(req.headers());
            req.extensions_mut().insert(locale);
            if let Some(session) = session {
                req.extensions_mut().insert(session);
            }
            next.run(req).await
        }
    }
}

fn negotiate_locale(headers: &HeaderMap) -> i18n::Locale {
    let cookie = cookie_value(headers, i18n::LOCALE_COOKIE);
    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    i18n::negotiate(cookie, accept_language)
}
