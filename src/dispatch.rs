//! Notification fan-out.
//!
//! [`Dispatcher::dispatch_all`] walks the subscription store and hands the
//! payload to the delivery capability once per record, one at a time, in
//! enumeration order. Delivery failures are logged and counted; they never
//! stop the walk. An unreadable record is handled per
//! [`MalformedRecordPolicy`].

use anyhow::Result;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::Config;
use crate::constants::PUSH_TTL_SECONDS;
use crate::notifications::{PushDelivery, PushOptions};
use crate::store::SubscriptionStore;

/// What a dispatch does when a stored record cannot be read or parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedRecordPolicy {
    /// Stop the dispatch; records after the bad one are not attempted.
    #[default]
    Abort,
    /// Log the bad record and carry on with the next one.
    Skip,
}

impl FromStr for MalformedRecordPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => anyhow::bail!("MalformedRecords must be 'abort' or 'skip', got '{other}'"),
        }
    }
}

impl fmt::Display for MalformedRecordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Tally of one dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Deliveries the push service accepted.
    pub delivered: usize,
    /// Deliveries that returned an error.
    pub failed: usize,
    /// Malformed records passed over under [`MalformedRecordPolicy::Skip`].
    pub skipped: usize,
    /// Whether the walk stopped early.
    pub aborted: bool,
}

/// Delivers one payload to every stored subscription.
#[derive(Clone)]
pub struct Dispatcher {
    store: SubscriptionStore,
    delivery: Arc<dyn PushDelivery>,
    options: PushOptions,
    policy: MalformedRecordPolicy,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("store", &self.store)
            .field("options", &self.options)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Build a dispatcher from explicit parts.
    pub fn new(
        store: SubscriptionStore,
        delivery: Arc<dyn PushDelivery>,
        options: PushOptions,
        policy: MalformedRecordPolicy,
    ) -> Self {
        Self {
            store,
            delivery,
            options,
            policy,
        }
    }

    /// Build a dispatcher using the sender identity and policy from `config`.
    pub fn from_config(
        config: &Config,
        store: SubscriptionStore,
        delivery: Arc<dyn PushDelivery>,
    ) -> Self {
        let options = PushOptions {
            subscriber: config.subscriber.clone(),
            vapid: config.vapid.clone(),
            ttl: PUSH_TTL_SECONDS,
        };
        Self::new(store, delivery, options, config.malformed_records)
    }

    /// Push `payload` to every stored subscription.
    ///
    /// Outcomes are logged; the returned summary is informational only.
    pub async fn dispatch_all(&self, payload: &[u8]) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        let records = match self.store.load_all() {
            Ok(records) => records,
            Err(e) => {
                log::error!("[Dispatch] Cannot enumerate subscriptions: {e:#}");
                summary.aborted = true;
                return summary;
            }
        };

        for record in records {
            let record = match record {
                Ok(record) => record,
                Err(e) => match self.policy {
                    MalformedRecordPolicy::Abort => {
                        log::error!("[Dispatch] Aborting, remaining subscriptions not notified: {e:#}");
                        summary.aborted = true;
                        break;
                    }
                    MalformedRecordPolicy::Skip => {
                        log::warn!("[Dispatch] Skipping record: {e:#}");
                        summary.skipped += 1;
                        continue;
                    }
                },
            };

            match self
                .delivery
                .deliver(payload, &record.subscription, &self.options)
                .await
            {
                Ok(receipt) => {
                    log::info!(
                        "[Dispatch] Delivered to {} (HTTP {})",
                        record.subscription.endpoint,
                        receipt.status
                    );
                    summary.delivered += 1;
                }
                Err(e) => {
                    log::warn!(
                        "[Dispatch] Delivery to {} failed: {e:#}",
                        record.subscription.endpoint
                    );
                    summary.failed += 1;
                }
            }
        }

        log::info!(
            "[Dispatch] Done: {} delivered, {} failed, {} skipped{}",
            summary.delivered,
            summary.failed,
            summary.skipped,
            if summary.aborted { ", aborted" } else { "" }
        );
        summary
    }
}
