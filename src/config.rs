//! Configuration loading.
//!
//! Configuration is read once at startup from the process environment,
//! optionally seeded from an env-file, and is immutable afterwards. The
//! resulting [`Config`] is passed explicitly to every component that needs
//! part of it; nothing reads the environment after startup.
//!
//! # Variables
//!
//! | Variable           | Required | Default        |
//! |--------------------|----------|----------------|
//! | `Subscriber`       | yes      |                |
//! | `VAPIDPublicKey`   | yes      |                |
//! | `VAPIDPrivateKey`  | yes      |                |
//! | `ClientID`         | yes      |                |
//! | `ClientSecret`     | yes      |                |
//! | `ListenAddr`       | no       | `0.0.0.0:8080` |
//! | `SubscriptionDir`  | no       | `subscribes`   |
//! | `StaticDir`        | no       | embedded       |
//! | `MalformedRecords` | no       | `abort`        |

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{DEFAULT_LISTEN_ADDR, DEFAULT_SUBSCRIPTION_DIR};
use crate::dispatch::MalformedRecordPolicy;
use crate::notifications::vapid::VapidKeys;

/// Credential pair guarding the `/notify` endpoint.
///
/// Both halves are wiped from memory on drop and never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ClientCredentials {
    id: String,
    secret: String,
}

impl ClientCredentials {
    /// Build a credential pair.
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
        }
    }

    /// Expected Basic-auth user name.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Expected Basic-auth password.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Process-wide configuration, built once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// VAPID `sub` claim (`mailto:` or `https:` contact).
    pub subscriber: String,
    /// Validated VAPID key pair used to sign push requests.
    pub vapid: VapidKeys,
    /// Credentials required on `/notify`.
    pub client: ClientCredentials,
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// Directory holding one file per subscription.
    pub subscription_dir: PathBuf,
    /// On-disk front-end overriding the embedded one.
    pub static_dir: Option<PathBuf>,
    /// What a dispatch does when it meets an unreadable record.
    pub malformed_records: MalformedRecordPolicy,
}

impl Config {
    /// Load configuration, seeding the environment from `env_file` first.
    ///
    /// A missing or unreadable env-file is logged and ignored; variables
    /// already present in the process environment win over the file.
    pub fn load(env_file: &Path) -> Result<Self> {
        match dotenvy::from_path(env_file) {
            Ok(()) => log::info!("Loaded environment from {}", env_file.display()),
            Err(e) => log::warn!("Could not load {}: {e}", env_file.display()),
        }
        Self::from_env()
    }

    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).with_context(|| format!("Required environment variable {key} is not set"))
        };

        let subscriber = normalize_subscriber(&required("Subscriber")?);
        let vapid = VapidKeys::from_base64url(
            required("VAPIDPublicKey")?.trim(),
            required("VAPIDPrivateKey")?.trim(),
        )
        .context("Invalid VAPID key pair")?;
        let client = ClientCredentials::new(required("ClientID")?, required("ClientSecret")?);

        let listen_addr = get("ListenAddr")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("ListenAddr must be a socket address such as 0.0.0.0:8080")?;
        let subscription_dir = get("SubscriptionDir")
            .map_or_else(|| PathBuf::from(DEFAULT_SUBSCRIPTION_DIR), PathBuf::from);
        let static_dir = get("StaticDir").map(PathBuf::from);
        let malformed_records = match get("MalformedRecords") {
            Some(value) => value.parse()?,
            None => MalformedRecordPolicy::default(),
        };

        Ok(Self {
            subscriber,
            vapid,
            client,
            listen_addr,
            subscription_dir,
            static_dir,
            malformed_records,
        })
    }
}

/// Push services expect the VAPID subject to be a URI.
///
/// A bare address gets a `mailto:` prefix.
fn normalize_subscriber(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("https:") || raw.starts_with("mailto:") {
        raw.to_string()
    } else {
        format!("mailto:{raw}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, String> {
        let keys = VapidKeys::generate().expect("generate keys");
        HashMap::from([
            ("Subscriber", "ops@example.com".to_string()),
            ("VAPIDPublicKey", keys.public_key_base64url().to_string()),
            ("VAPIDPrivateKey", keys.private_key_base64url().to_string()),
            ("ClientID", "relay".to_string()),
            ("ClientSecret", "hunter2".to_string()),
        ])
    }

    fn load(vars: &HashMap<&'static str, String>) -> Result<Config> {
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_applied() {
        let config = load(&base_vars()).expect("config");
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.subscription_dir, PathBuf::from("subscribes"));
        assert_eq!(config.static_dir, None);
        assert_eq!(config.malformed_records, MalformedRecordPolicy::Abort);
        assert_eq!(config.client.id(), "relay");
        assert_eq!(config.client.secret(), "hunter2");
    }

    #[test]
    fn test_each_required_variable_is_enforced() {
        for key in [
            "Subscriber",
            "VAPIDPublicKey",
            "VAPIDPrivateKey",
            "ClientID",
            "ClientSecret",
        ] {
            let mut vars = base_vars();
            vars.remove(key);
            let err = load(&vars).expect_err("missing variable must fail");
            assert!(format!("{err:#}").contains(key), "error should name {key}: {err:#}");
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut vars = base_vars();
        vars.insert("ClientSecret", "   ".to_string());
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_optional_overrides() {
        let mut vars = base_vars();
        vars.insert("ListenAddr", "127.0.0.1:9000".to_string());
        vars.insert("SubscriptionDir", "/var/lib/pushrelay".to_string());
        vars.insert("StaticDir", "public".to_string());
        vars.insert("MalformedRecords", "Skip".to_string());

        let config = load(&vars).expect("config");
        assert_eq!(config.listen_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.subscription_dir, PathBuf::from("/var/lib/pushrelay"));
        assert_eq!(config.static_dir, Some(PathBuf::from("public")));
        assert_eq!(config.malformed_records, MalformedRecordPolicy::Skip);
    }

    #[test]
    fn test_invalid_listen_addr_rejected() {
        let mut vars = base_vars();
        vars.insert("ListenAddr", "not-an-address".to_string());
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_mismatched_vapid_keys_rejected() {
        let mut vars = base_vars();
        let other = VapidKeys::generate().expect("generate keys");
        vars.insert("VAPIDPublicKey", other.public_key_base64url().to_string());
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_subscriber_normalization() {
        assert_eq!(normalize_subscriber("ops@example.com"), "mailto:ops@example.com");
        assert_eq!(normalize_subscriber("mailto:ops@example.com"), "mailto:ops@example.com");
        assert_eq!(normalize_subscriber("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = ClientCredentials::new("relay", "hunter2");
        let printed = format!("{creds:?}");
        assert!(printed.contains("relay"));
        assert!(!printed.contains("hunter2"));
    }
}
