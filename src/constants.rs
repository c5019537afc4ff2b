//! Application-wide constants for pushrelay.
//!
//! This module centralizes magic numbers and default configuration values
//! so they are documented in one place. Constants are grouped by domain.
//!
//! # Categories
//!
//! - **Push**: Web push message parameters
//! - **Timeouts**: Outbound network timeouts
//! - **Defaults**: Fallbacks for optional configuration

use std::time::Duration;

// ============================================================================
// Push
// ============================================================================

/// Time-to-live for every push message, in seconds.
///
/// The push service discards the message if the browser is not reachable
/// within this window.
pub const PUSH_TTL_SECONDS: u32 = 30;

/// File extension of stored subscription records.
pub const RECORD_EXTENSION: &str = "json";

// ============================================================================
// Timeouts
// ============================================================================

/// HTTP client request timeout for calls to push services.
///
/// Applies per delivery. Deliveries are sequential, so a stalled push
/// service would otherwise hold up the whole dispatch.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Defaults
// ============================================================================

/// Default env-file consulted at startup.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Default bind address for the HTTP server.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Default directory holding one file per subscription.
pub const DEFAULT_SUBSCRIPTION_DIR: &str = "subscribes";

/// Realm advertised in `WWW-Authenticate` on `/notify` rejections.
pub const AUTH_REALM: &str = "pushrelay";
