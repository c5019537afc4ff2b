//! Web push notification infrastructure.
//!
//! Holds the VAPID key handling and the push delivery capability used to
//! fan notifications out to browser push services.
//!
//! # Architecture
//!
//! ```text
//! POST /notify
//!     ↓
//! Dispatcher walks the subscription store
//!     ↓
//! PushDelivery encrypts + signs, sends web push (RFC 8030)
//!     ↓
//! Push service delivers to the browser's service worker
//! ```
//!
//! # VAPID Keys
//!
//! The relay identifies itself to push services with a P-256 ECDSA keypair
//! (VAPID, RFC 8292) supplied through configuration. Browsers subscribe
//! against the public half, which the front-end fetches from
//! `/vapid-public-key`.

// Rust guideline compliant 2026-02

pub mod push;
pub mod vapid;

pub use push::{DeliveryReceipt, PushDelivery, PushOptions, Subscription, SubscriptionKeys, WebPushSender};
pub use vapid::VapidKeys;
