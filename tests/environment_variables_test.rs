//! Tests for loading configuration from the process environment and env-files.
//!
//! These mutate process-wide environment variables, so every test holds
//! `ENV_LOCK` for its whole duration.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use pushrelay::{Config, MalformedRecordPolicy, VapidKeys};
use tempfile::TempDir;

// Global lock to prevent env var pollution between tests
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: [&str; 9] = [
    "Subscriber",
    "VAPIDPublicKey",
    "VAPIDPrivateKey",
    "ClientID",
    "ClientSecret",
    "ListenAddr",
    "SubscriptionDir",
    "StaticDir",
    "MalformedRecords",
];

/// Clears every relay variable on creation and again on drop.
struct EnvGuard;

impl EnvGuard {
    fn new() -> Self {
        for key in VARS {
            env::remove_var(key);
        }
        Self
    }

    fn set(&self, key: &str, value: &str) {
        env::set_var(key, value);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in VARS {
            env::remove_var(key);
        }
    }
}

fn write_env_file(dir: &TempDir, keys: &VapidKeys, extra: &str) -> PathBuf {
    let path = dir.path().join(".env");
    let content = format!(
        "Subscriber=ops@example.com\n\
         VAPIDPublicKey={}\n\
         VAPIDPrivateKey={}\n\
         ClientID=relay\n\
         ClientSecret=hunter2\n\
         {extra}",
        keys.public_key_base64url(),
        keys.private_key_base64url(),
    );
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_from_env_file() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let _guard = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let keys = VapidKeys::generate().unwrap();
    let path = write_env_file(&dir, &keys, "MalformedRecords=skip\n");

    let config = Config::load(&path).unwrap();

    assert_eq!(config.subscriber, "mailto:ops@example.com");
    assert_eq!(config.client.id(), "relay");
    assert_eq!(config.vapid.public_key_base64url(), keys.public_key_base64url());
    assert_eq!(config.malformed_records, MalformedRecordPolicy::Skip);
}

#[test]
fn test_process_environment_wins_over_env_file() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let guard = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let keys = VapidKeys::generate().unwrap();
    let path = write_env_file(&dir, &keys, "");
    guard.set("ClientID", "from-process");

    let config = Config::load(&path).unwrap();

    assert_eq!(config.client.id(), "from-process");
}

#[test]
fn test_missing_env_file_falls_back_to_environment() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let guard = EnvGuard::new();
    let keys = VapidKeys::generate().unwrap();
    guard.set("Subscriber", "https://example.com/contact");
    guard.set("VAPIDPublicKey", keys.public_key_base64url());
    guard.set("VAPIDPrivateKey", keys.private_key_base64url());
    guard.set("ClientID", "relay");
    guard.set("ClientSecret", "hunter2");

    let config = Config::load(&PathBuf::from("/nonexistent/.env")).unwrap();

    assert_eq!(config.subscriber, "https://example.com/contact");
}

#[test]
fn test_missing_required_variable_is_fatal() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let _guard = EnvGuard::new();

    let err = Config::load(&PathBuf::from("/nonexistent/.env")).unwrap_err();

    assert!(format!("{err:#}").contains("Subscriber"));
}
