//! Shared state handed to every handler.

use std::sync::Arc;

use crate::config::{ClientCredentials, Config};
use crate::dispatch::Dispatcher;
use crate::store::SubscriptionStore;

/// Shared, read-only state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    /// Where `/subscribe` writes.
    pub store: SubscriptionStore,
    /// What `/notify` runs.
    pub dispatcher: Dispatcher,
    /// Credentials `/notify` requires.
    pub client: ClientCredentials,
    /// Served to the front-end as its `applicationServerKey`.
    pub vapid_public_key: String,
}

impl AppState {
    /// Assemble handler state from its parts and the startup configuration.
    pub fn new(config: &Config, store: SubscriptionStore, dispatcher: Dispatcher) -> Arc<Self> {
        Arc::new(Self {
            store,
            dispatcher,
            client: config.client.clone(),
            vapid_public_key: config.vapid.public_key_base64url().to_string(),
        })
    }
}
