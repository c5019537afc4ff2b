//! HTTP Basic authentication for the notify endpoint.
//!
//! Credentials are compared with `subtle` so a mismatch takes the same time
//! whichever half was wrong.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use subtle::ConstantTimeEq;

use super::error::AppError;
use crate::config::ClientCredentials;

/// Extract `(user, password)` from an `Authorization: Basic ...` header.
///
/// Returns `None` for a missing header, another scheme, or undecodable
/// content.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Check the request's Basic credentials against `expected`.
pub fn authorize(headers: &HeaderMap, expected: &ClientCredentials) -> Result<(), AppError> {
    let Some((user, password)) = basic_credentials(headers) else {
        log::warn!("Rejected notify: missing or malformed credentials");
        return Err(AppError::Unauthorized);
    };

    // Evaluate both halves before combining.
    let user_ok = user.as_bytes().ct_eq(expected.id().as_bytes());
    let password_ok = password.as_bytes().ct_eq(expected.secret().as_bytes());

    if bool::from(user_ok & password_ok) {
        Ok(())
    } else {
        log::warn!("Rejected notify: bad credentials");
        Err(AppError::Unauthorized)
    }
}
