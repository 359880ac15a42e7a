//! Desired-state document model

use indexmap::IndexMap;
use serde::Deserialize;

/// Parsed and validated desired-state document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredConfig {
    /// Subscriptions to reconcile, in file order (never empty)
    pub subscriptions: Vec<SubscriptionSpec>,
}

/// Desired provider registrations for one subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionSpec {
    pub subscription_id: String,

    /// Display only
    pub subscription_name: String,

    /// Provider namespace -> should be registered, in file order
    pub providers: IndexMap<String, bool>,
}

impl SubscriptionSpec {
    /// Human readable label for progress output
    pub fn label(&self) -> String {
        if self.subscription_name.is_empty() {
            self.subscription_id.clone()
        } else {
            format!("{} ({})", self.subscription_name, self.subscription_id)
        }
    }
}

// Wire shapes. Everything is optional here so that a missing field surfaces
// as a validation error instead of a serde "missing field" message.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDocument {
    pub subscriptions: Option<Vec<RawSubscription>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSubscription {
    pub subscription_id: Option<String>,
    pub subscription_name: Option<String>,
    pub providers: Option<IndexMap<String, bool>>,
}
