//! VAPID keys for Web Push (RFC 8292).
//!
//! The relay signs every push request with a P-256 ECDSA key pair supplied
//! through configuration. This module validates that pair at startup and
//! generates fresh pairs for the `generate-vapid` subcommand.

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use p256::ecdsa::SigningKey;
use p256::elliptic_curve::rand_core::OsRng;
use std::fmt;
use zeroize::Zeroize;

/// VAPID keypair for web push authentication.
///
/// The private key is the raw 32-byte P-256 scalar (base64url), which is the
/// format `web_push::VapidSignatureBuilder::from_base64()` expects. The public
/// key is the uncompressed SEC1 point (65 bytes), the browser's
/// `applicationServerKey`.
#[derive(Clone)]
pub struct VapidKeys {
    /// Raw 32-byte P-256 private key scalar (base64url).
    private_key_b64: String,
    /// Uncompressed public key bytes (base64url, 65 bytes decoded).
    public_key_b64: String,
}

impl VapidKeys {
    /// Generate a fresh VAPID keypair.
    pub fn generate() -> Result<Self> {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = signing_key.verifying_key();

        // SEC1 uncompressed public key (65 bytes: 0x04 || x || y)
        let public_bytes = verifying_key.to_encoded_point(false);
        let public_key_b64 = BASE64URL.encode(public_bytes.as_bytes());

        let private_key_b64 = BASE64URL.encode(signing_key.to_bytes().as_slice());

        Ok(Self {
            private_key_b64,
            public_key_b64,
        })
    }

    /// Reconstruct from configured base64url strings.
    ///
    /// Validates the public key format, the private key scalar, and that the
    /// public key actually belongs to the private key. Padded input is
    /// accepted; keys are stored unpadded.
    pub fn from_base64url(public_key_b64: &str, private_key_b64: &str) -> Result<Self> {
        let pub_bytes = BASE64URL
            .decode(public_key_b64.trim_end_matches('='))
            .context("Invalid base64url for VAPID public key")?;
        anyhow::ensure!(
            pub_bytes.len() == 65 && pub_bytes[0] == 0x04,
            "VAPID public key must be 65-byte uncompressed P-256 point"
        );

        let mut priv_bytes = BASE64URL
            .decode(private_key_b64.trim_end_matches('='))
            .context("Invalid base64url for VAPID private key")?;
        anyhow::ensure!(
            priv_bytes.len() == 32,
            "VAPID private key must be 32-byte P-256 scalar, got {} bytes",
            priv_bytes.len()
        );
        let signing_key = SigningKey::from_bytes(priv_bytes.as_slice().into())
            .context("VAPID private key is not a valid P-256 scalar")?;
        priv_bytes.zeroize();

        let derived = signing_key.verifying_key().to_encoded_point(false);
        anyhow::ensure!(
            derived.as_bytes() == pub_bytes.as_slice(),
            "VAPID public key does not match the private key"
        );

        Ok(Self {
            private_key_b64: BASE64URL.encode(signing_key.to_bytes().as_slice()),
            public_key_b64: BASE64URL.encode(&pub_bytes),
        })
    }

    /// Base64url-encoded uncompressed public key (65 bytes decoded).
    ///
    /// Served to browsers as the `applicationServerKey`.
    pub fn public_key_base64url(&self) -> &str {
        &self.public_key_b64
    }

    /// Base64url-encoded raw 32-byte private key scalar.
    pub fn private_key_base64url(&self) -> &str {
        &self.private_key_b64
    }
}

impl Drop for VapidKeys {
    fn drop(&mut self) {
        self.private_key_b64.zeroize();
    }
}

impl fmt::Debug for VapidKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VapidKeys")
            .field("public_key_b64", &self.public_key_b64)
            .field("private_key_b64", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_vapid_keys() {
        let keys = VapidKeys::generate().expect("should generate keys");

        let pub_bytes = BASE64URL
            .decode(keys.public_key_base64url())
            .expect("decode public key");
        assert_eq!(pub_bytes.len(), 65, "uncompressed P-256 public key is 65 bytes");
        assert_eq!(pub_bytes[0], 0x04, "uncompressed point starts with 0x04");

        let priv_bytes = BASE64URL
            .decode(keys.private_key_base64url())
            .expect("decode private key");
        assert_eq!(priv_bytes.len(), 32, "raw P-256 scalar is 32 bytes");
    }

    #[test]
    fn test_from_base64url_roundtrip() {
        let keys = VapidKeys::generate().expect("should generate keys");
        let reconstructed =
            VapidKeys::from_base64url(keys.public_key_base64url(), keys.private_key_base64url())
                .expect("should reconstruct from base64url");

        assert_eq!(keys.public_key_base64url(), reconstructed.public_key_base64url());
        assert_eq!(keys.private_key_base64url(), reconstructed.private_key_base64url());
    }

    #[test]
    fn test_from_base64url_accepts_padding() {
        let keys = VapidKeys::generate().expect("should generate keys");
        let padded_public = format!("{}=", keys.public_key_base64url());
        assert!(VapidKeys::from_base64url(&padded_public, keys.private_key_base64url()).is_ok());
    }

    #[test]
    fn test_from_base64url_rejects_mismatched_pair() {
        let a = VapidKeys::generate().expect("generate keys");
        let b = VapidKeys::generate().expect("generate keys");
        let err = VapidKeys::from_base64url(a.public_key_base64url(), b.private_key_base64url())
            .expect_err("mismatched pair must fail");
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_from_base64url_rejects_invalid() {
        assert!(VapidKeys::from_base64url("not-valid-key", "also-bad").is_err());
    }

    #[test]
    fn test_vapid_key_works_with_web_push_from_base64() {
        use web_push::{SubscriptionInfo, VapidSignatureBuilder};

        let keys = VapidKeys::generate().expect("generate keys");
        let sub = SubscriptionInfo::new(
            "https://push.example.com/test",
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
            "AAAAAAAAAAAAAAAAAAAAAA",
        );
        let builder = VapidSignatureBuilder::from_base64(keys.private_key_base64url(), &sub);
        assert!(builder.is_ok(), "from_base64 should accept our raw key scalar");
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let keys = VapidKeys::generate().expect("generate keys");
        let printed = format!("{keys:?}");
        assert!(!printed.contains(keys.private_key_base64url()));
        assert!(printed.contains(keys.public_key_base64url()));
    }
}
