//! Route handlers and the access-log middleware.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::{auth::authorize, error::AppError, state::AppState};

/// `POST /subscribe`: persist the raw body as a subscription record.
pub async fn subscribe_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let id = state.store.save(&body).map_err(AppError::Storage)?;
    log::info!("Stored subscription {id}");

    Ok(Json(json!({ "error": null })))
}

/// `POST /notify`: push the raw body to every stored subscription.
///
/// The dispatch runs to completion before the empty `200` is written; its
/// outcome is only logged.
pub async fn notify_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    authorize(&headers, &state.client)?;

    log::info!("push: {}", String::from_utf8_lossy(&body));
    state.dispatcher.dispatch_all(&body).await;

    Ok(StatusCode::OK)
}

/// `GET /vapid-public-key`: the key browsers subscribe against.
pub async fn vapid_public_key_handler(State(state): State<Arc<AppState>>) -> String {
    state.vapid_public_key.clone()
}

/// Fallback for wrong methods on the POST-only routes.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Access log: `<remote> <method> <uri>` for every request.
pub async fn log_request(request: Request, next: Next) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "-".to_string(), |ConnectInfo(addr)| addr.to_string());
    log::info!("{} {} {}", remote, request.method(), request.uri());

    next.run(request).await
}
