//! pushrelay - minimal web push relay.
//!
//! Serves a static front-end, accepts browser push subscriptions, stores
//! them one file per subscription, and on an authenticated trigger pushes a
//! payload to every stored subscription.
//!
//! # Architecture
//!
//! ```text
//! POST /subscribe ──► SubscriptionStore::save ──► subscribes/<sha1>.json
//!
//! POST /notify ──► auth ──► Dispatcher::dispatch_all
//!                               │ for each record (sequential)
//!                               ▼
//!                         PushDelivery::deliver ──► push service
//! ```
//!
//! # Modules
//!
//! - [`config`] - Startup configuration from the environment
//! - [`store`] - Directory-backed subscription store
//! - [`dispatch`] - Fan-out of one payload to all subscriptions
//! - [`notifications`] - VAPID keys and the web push delivery capability
//! - [`server`] - axum router and server loop

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod notifications;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::{ClientCredentials, Config};
pub use dispatch::{DispatchSummary, Dispatcher, MalformedRecordPolicy};
pub use notifications::{PushDelivery, PushOptions, Subscription, VapidKeys, WebPushSender};
pub use store::SubscriptionStore;
