//! HTTP error mapping.

use axum::{
    http::{header::WWW_AUTHENTICATE, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::AUTH_REALM;

/// Failures a handler reports to the HTTP caller.
///
/// Responses are plain text and deliberately coarse.
#[derive(Error, Debug)]
pub enum AppError {
    /// Route exists but not for this method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Missing or wrong Basic credentials.
    #[error("Unauthorized")]
    Unauthorized,

    /// Subscription could not be persisted.
    #[error("Error writing file")]
    Storage(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Storage(e) => {
                log::error!("Storage failure: {e:#}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if matches!(self, AppError::Unauthorized) {
            let challenge = format!("Basic realm=\"{AUTH_REALM}\"");
            return (status, [(WWW_AUTHENTICATE, challenge)], self.to_string()).into_response();
        }

        (status, self.to_string()).into_response()
    }
}
