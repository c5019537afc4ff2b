//! HTTP boundary.
//!
//! Serves the static front-end and the two API routes:
//!
//! - `POST /subscribe` - store a browser subscription (no auth)
//! - `POST /notify` - fan a payload out to every subscription (Basic auth)
//! - `GET /vapid-public-key` - the key browsers subscribe against
//!
//! Everything else falls through to the front-end: the copy embedded in the
//! binary, or an on-disk tree when `StaticDir` is set.
//!
//! # Modules
//!
//! - [`assets`] - Embedded front-end
//! - [`auth`] - Basic credential parsing and constant-time check
//! - [`error`] - `AppError` to HTTP response mapping
//! - [`routes`] - Handlers and the access-log middleware
//! - [`state`] - Shared handler state

// Rust guideline compliant 2026-02

pub mod assets;
pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::notifications::WebPushSender;
use crate::store::SubscriptionStore;

pub use error::AppError;
pub use state::AppState;

use routes::{
    log_request, method_not_allowed, notify_handler, subscribe_handler, vapid_public_key_handler,
};

/// Build the application router over `state`.
///
/// Static files come from `static_dir` when given, otherwise from the
/// embedded front-end.
pub fn router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route(
            "/subscribe",
            post(subscribe_handler).fallback(method_not_allowed),
        )
        .route("/notify", post(notify_handler).fallback(method_not_allowed))
        .route("/vapid-public-key", get(vapid_public_key_handler));

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api.fallback(assets::serve_embedded),
    };

    app.layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Wire up the store, dispatcher and router from `config` and serve until
/// SIGINT/SIGTERM.
pub async fn run(config: Config) -> Result<()> {
    let store = SubscriptionStore::open(&config.subscription_dir)?;
    log::info!(
        "Subscription store at {} ({} record(s))",
        store.dir().display(),
        store.count()?
    );

    let sender = Arc::new(WebPushSender::new()?);
    let dispatcher = Dispatcher::from_config(&config, store.clone(), sender);
    log::info!("Malformed record policy: {}", config.malformed_records);

    match &config.static_dir {
        Some(dir) if !dir.is_dir() => log::warn!(
            "Static directory {} does not exist; only API routes will respond",
            dir.display()
        ),
        Some(dir) => log::info!("Serving front-end from {}", dir.display()),
        None => log::info!("Serving embedded front-end"),
    }

    let state = AppState::new(&config, store, dispatcher);
    let app = router(state, config.static_dir.as_deref());

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    log::info!("Server running on {}", config.listen_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server failed")?;

    log::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => log::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                log::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                log::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
