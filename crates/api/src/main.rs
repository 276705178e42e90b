//! Metashark API server entrypoint

use std::sync::Arc;

use anyhow::Context;
use metashark_api::{
    auth::{MemoryCredentialStore, UserRecord},
    registry::RedisStore,
    routes::create_router,
    state::AppState,
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in development; silently absent in production
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("metashark_api=debug,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let store = RedisStore::connect(&config.redis_url)
        .await
        .context("failed to connect to Redis")?;
    tracing::info!("connected to registry store at {}", config.redis_url);

    // The single administrative account comes from the environment; the
    // credential store seam is where a database would plug in
    let credentials = MemoryCredentialStore::new(vec![UserRecord {
        id: "admin".to_string(),
        email: config.admin_email.clone(),
        name: config.admin_name.clone(),
        password_hash: config.admin_password_hash.clone(),
    }]);

    let bind_address = config.bind_address.clone();
    let root_domain = config.root_domain.clone();
    let state = AppState::new(config, Arc::new(store), Arc::new(credentials))
        .map_err(|e| anyhow::anyhow!("failed to build application state: {e}"))?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    tracing::info!("listening on {bind_address}, serving *.{root_domain}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
