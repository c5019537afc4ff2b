//! Web push message sending.
//!
//! Defines the browser subscription shape, the [`PushDelivery`] capability
//! the dispatcher talks to, and [`WebPushSender`], which encrypts messages
//! (RFC 8291) and signs them with VAPID (RFC 8292) before posting them to
//! the subscription's push service (RFC 8030).

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use serde::{Deserialize, Serialize};

use crate::constants::HTTP_REQUEST_TIMEOUT;
use crate::notifications::vapid::VapidKeys;

/// A browser's push subscription, as produced by `PushSubscription.toJSON()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Push service endpoint URL.
    pub endpoint: String,
    /// Expiry in epoch milliseconds, when the browser reports one.
    #[serde(
        rename = "expirationTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_time: Option<f64>,
    /// Encryption key material.
    pub keys: SubscriptionKeys,
}

/// Key material of a [`Subscription`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    /// Browser's P-256 ECDH public key (base64url).
    pub p256dh: String,
    /// Shared auth secret (base64url).
    pub auth: String,
}

/// Sender identity and message parameters for one delivery.
#[derive(Clone, Debug)]
pub struct PushOptions {
    /// VAPID `sub` claim.
    pub subscriber: String,
    /// Signing key pair.
    pub vapid: VapidKeys,
    /// Message time-to-live in seconds.
    pub ttl: u32,
}

/// Result of a delivery the push service accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// HTTP status returned by the push service.
    pub status: u16,
}

/// Capability to deliver one payload to one subscription.
///
/// Implementations make a single attempt; retries are not this layer's job.
#[async_trait]
pub trait PushDelivery: Send + Sync {
    /// Attempt one delivery of `payload` to `subscription`.
    async fn deliver(
        &self,
        payload: &[u8],
        subscription: &Subscription,
        options: &PushOptions,
    ) -> Result<DeliveryReceipt>;
}

/// Production [`PushDelivery`] backed by the `web-push` crate and reqwest.
///
/// Holds one `reqwest::Client` so connections to push services are pooled
/// across deliveries.
#[derive(Clone, Debug)]
pub struct WebPushSender {
    client: reqwest::Client,
}

impl WebPushSender {
    /// Create a sender with the default request timeout.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .context("Failed to build push HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PushDelivery for WebPushSender {
    async fn deliver(
        &self,
        payload: &[u8],
        subscription: &Subscription,
        options: &PushOptions,
    ) -> Result<DeliveryReceipt> {
        use web_push::{
            ContentEncoding, SubscriptionInfo, VapidSignatureBuilder, WebPushMessageBuilder,
        };

        let sub_info = SubscriptionInfo::new(
            &subscription.endpoint,
            &subscription.keys.p256dh,
            &subscription.keys.auth,
        );

        let mut sig_builder =
            VapidSignatureBuilder::from_base64(options.vapid.private_key_base64url(), &sub_info)
                .context("Failed to build VAPID signature")?;
        sig_builder.add_claim("sub", options.subscriber.as_str());
        let sig = sig_builder.build().context("Failed to sign VAPID JWT")?;

        // aes128gcm cannot encrypt zero bytes, so an empty payload goes out
        // as a body-less push.
        let mut builder = WebPushMessageBuilder::new(&sub_info);
        if !payload.is_empty() {
            builder.set_payload(ContentEncoding::Aes128Gcm, payload);
        }
        builder.set_vapid_signature(sig.clone());
        builder.set_ttl(options.ttl);

        let message = builder.build().context("Failed to build web push message")?;

        // The web-push crate only builds the message; sending goes through
        // our pooled reqwest client.
        let mut request = self
            .client
            .post(message.endpoint.to_string())
            .header("TTL", message.ttl.to_string());

        if let Some(urgency) = message.urgency {
            request = request.header("Urgency", urgency.to_string());
        }

        if let Some(topic) = message.topic {
            request = request.header("Topic", topic);
        }

        if let Some(push_payload) = message.payload {
            request = request
                .header("Content-Encoding", push_payload.content_encoding.to_str())
                .header("Content-Type", "application/octet-stream");

            for (key, value) in &push_payload.crypto_headers {
                request = request.header(*key, value.as_str());
            }

            request = request.body(push_payload.content);
        } else {
            // web-push only attaches VAPID headers to encrypted payloads.
            request = request
                .header(
                    "Authorization",
                    format!("vapid t={}, k={}", sig.auth_t, BASE64URL.encode(&sig.auth_k)),
                )
                .body(Vec::<u8>::new());
        }

        let response = request.send().await.context("Web push HTTP request failed")?;
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            Ok(DeliveryReceipt { status })
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(anyhow::anyhow!("Web push send failed (HTTP {status}): {body}"))
        }
    }
}
