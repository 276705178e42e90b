//! End-to-end routing tests over the full router, with in-memory backends.

#![allow(clippy::unwrap_used)] // Allow unwrap() in tests for cleaner test code

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use metashark_api::{
    auth::{hash_password, MemoryCredentialStore, UserRecord},
    registry::MemoryStore,
    routes::create_router,
    state::AppState,
    Config,
};
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@metashark.example";
const ADMIN_PASSWORD: &str = "correct-horse-battery";

fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".to_string(),
        public_protocol: "http".to_string(),
        root_domain: "metashark.example".to_string(),
        dev_host_label: "localhost".to_string(),
        protected_prefix: "/admin".to_string(),
        redis_url: "redis://unused".to_string(),
        session_secret: "integration-test-secret-32-characters!".to_string(),
        session_expiry_hours: 24,
        admin_email: ADMIN_EMAIL.to_string(),
        admin_name: "Admin".to_string(),
        admin_password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
        listing_cache_ttl_secs: 60,
    }
}

fn test_state() -> AppState {
    let credentials = MemoryCredentialStore::new(vec![UserRecord {
        id: "admin".to_string(),
        email: ADMIN_EMAIL.to_string(),
        name: "Admin".to_string(),
        password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
    }]);
    AppState::new(
        test_config(),
        Arc::new(MemoryStore::new()),
        Arc::new(credentials),
    )
    .unwrap()
}

fn get(host: &str, path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::HOST, host)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sign in and return the session cookie for subsequent requests.
async fn login(app: &Router) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::HOST, "metashark.example")
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(format!(
            "email={ADMIN_EMAIL}&password={ADMIN_PASSWORD}"
        )))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/admin");

    let cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .to_string();
    // Keep only the name=value pair for the Cookie header
    cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn root_host_serves_landing_page() {
    let app = create_router(test_state());

    let response = app.oneshot(get("metashark.example", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["root_domain"], "metashark.example");
    assert_eq!(body["locale"], "en");
}

#[tokio::test]
async fn accept_language_switches_locale() {
    let app = create_router(test_state());

    let mut request = get("metashark.example", "/");
    request.headers_mut().insert(
        header::ACCEPT_LANGUAGE,
        "es-MX,es;q=0.9,en;q=0.5".parse().unwrap(),
    );

    let body = body_json(app.oneshot(request).await.unwrap()).await;
    assert_eq!(body["locale"], "es");
}

#[tokio::test]
async fn tenant_host_rewrites_to_tenant_site() {
    let state = test_state();
    state.tenants.create_tenant("shop", "🚀").await.unwrap();
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(get("shop.metashark.example", "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["subdomain"], "shop");
    assert_eq!(body["icon"], "🚀");

    // Deeper paths are carried through the rewrite
    let response = app
        .oneshot(get("shop.metashark.example", "/dashboard/settings"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["path"], "/dashboard/settings");
}

#[tokio::test]
async fn unknown_tenant_host_gets_not_found() {
    let app = create_router(test_state());

    let response = app
        .oneshot(get("ghost.metashark.example", "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["subdomain"], "ghost");
}

#[tokio::test]
async fn tenant_host_never_redirects_to_login() {
    let app = create_router(test_state());

    // /admin on a tenant host is just a tenant path, not the admin surface
    let response = app
        .oneshot(get("shop.metashark.example", "/admin"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_path_redirects_anonymous_to_login() {
    let app = create_router(test_state());

    let response = app
        .clone()
        .oneshot(get("metashark.example", "/admin"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/login");

    // Nested admin paths are covered too
    let response = app
        .oneshot(get("metashark.example", "/admin/tenants"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn admin_prefix_match_is_a_path_boundary() {
    let app = create_router(test_state());

    // /administrator is not under the protected prefix; it falls through to
    // the router and 404s instead of redirecting
    let response = app
        .oneshot(get("metashark.example", "/administrator"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_grants_access_to_dashboard() {
    let app = create_router(test_state());
    let cookie = login(&app).await;

    let mut request = get("metashark.example", "/admin");
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn login_with_wrong_password_is_generic() {
    let app = create_router(test_state());

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::HOST, "metashark.example")
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(format!("email={ADMIN_EMAIL}&password=wrong")))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn create_tenant_via_form_then_serve_it() {
    let app = create_router(test_state());
    let cookie = login(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/admin/tenants")
        .header(header::HOST, "metashark.example")
        .header(header::COOKIE, cookie.clone())
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from("subdomain=acme&icon=%F0%9F%9A%80"))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "http://acme.metashark.example"
    );

    // The new tenant is immediately routable
    let response = app
        .oneshot(get("acme.metashark.example", "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn invalid_subdomain_echoes_submission() {
    let app = create_router(test_state());
    let cookie = login(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/admin/tenants")
        .header(header::HOST, "metashark.example")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from("subdomain=ab&icon=x"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["subdomain"], "ab");
    assert_eq!(body["icon"], "x");
}

#[tokio::test]
async fn delete_tenant_reports_removed_and_not_found() {
    let state = test_state();
    state.tenants.create_tenant("acme", "🚀").await.unwrap();
    let app = create_router(state);
    let cookie = login(&app).await;

    let delete = |app: Router, cookie: String| async move {
        let request = Request::builder()
            .method("DELETE")
            .uri("/admin/tenants/acme")
            .header(header::HOST, "metashark.example")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    };

    let response = delete(app.clone(), cookie.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["removed"], true);

    let response = delete(app, cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["removed"], false);
}

#[tokio::test]
async fn logout_clears_the_session() {
    let app = create_router(test_state());
    let cookie = login(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .header(header::HOST, "metashark.example")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn health_reports_registry_status() {
    let app = create_router(test_state());

    let response = app
        .oneshot(get("metashark.example", "/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["registry"], "healthy");
}
