//! Desired-vs-actual reconciliation of provider registrations
//!
//! `decide` is the pure decision table; `reconcile_provider` logs and, when
//! changes are applied, issues the single register/unregister call.
//! API failures for one provider are logged and never propagated.

use crate::action::{ActionType, Outcome, SubscriptionReport};
use crate::error::Result;
use crate::provider::ProviderClient;
use crate::state::{CloudProviderState, RegistrationState};
use indexmap::IndexMap;

/// Decide what to do for a provider in `state` that should (not) be registered
pub fn decide(state: &RegistrationState, should_be_registered: bool) -> ActionType {
    match (state, should_be_registered) {
        (RegistrationState::NotRegistered, true) => ActionType::Register,
        (RegistrationState::Registered, false) => ActionType::Unregister,
        (RegistrationState::Registering, _) => ActionType::AwaitRegistering,
        (RegistrationState::Unregistering, _) => ActionType::AwaitUnregistering,
        _ => ActionType::NoOp,
    }
}

/// Find `namespace` in a provider listing, ignoring case
///
/// When the listing holds several case-insensitive matches the last one wins.
pub fn find_provider<'a>(
    providers: &'a [CloudProviderState],
    namespace: &str,
) -> Option<&'a CloudProviderState> {
    providers.iter().rev().find(|p| p.matches(namespace))
}

/// Bring one provider towards its desired registration state
pub async fn reconcile_provider(
    provider: &CloudProviderState,
    should_be_registered: bool,
    client: &dyn ProviderClient,
    apply_changes: bool,
) -> Outcome {
    let namespace = provider.namespace.as_str();
    let action = decide(&provider.registration_state, should_be_registered);

    match action {
        ActionType::Register | ActionType::Unregister if !apply_changes => {
            if action == ActionType::Register {
                tracing::info!("{} is not registered, but it should be registered.", namespace);
            } else {
                tracing::info!("{} is registered, but it should not be registered.", namespace);
            }
            Outcome::WouldApply(action)
        }
        ActionType::Register => {
            tracing::info!("Registering {}...", namespace);
            match client.register(namespace).await {
                Ok(()) => Outcome::Applied(action),
                Err(e) => {
                    tracing::error!(
                        "An error occurred registering the provider {}: {}",
                        namespace,
                        e
                    );
                    Outcome::Failed(action, e.to_string())
                }
            }
        }
        ActionType::Unregister => {
            tracing::info!("Unregistering {}...", namespace);
            match client.unregister(namespace).await {
                Ok(()) => Outcome::Applied(action),
                Err(e) => {
                    tracing::error!(
                        "An error occurred unregistering the provider {}: {}",
                        namespace,
                        e
                    );
                    Outcome::Failed(action, e.to_string())
                }
            }
        }
        ActionType::AwaitRegistering => {
            tracing::info!("{} is being registered...", namespace);
            Outcome::Pending(action)
        }
        ActionType::AwaitUnregistering => {
            tracing::info!("{} is being unregistered...", namespace);
            Outcome::Pending(action)
        }
        ActionType::NoOp => {
            if let RegistrationState::Other(state) = &provider.registration_state {
                tracing::debug!("{} is in state {}, leaving it alone", namespace, state);
            }
            Outcome::InSync
        }
    }
}

/// Reconcile every declared provider of one subscription, in declaration order
///
/// The provider listing is fetched once; a listing failure is returned to the
/// caller. Missing namespaces and failed API calls are recorded and skipped.
pub async fn reconcile_subscription(
    client: &dyn ProviderClient,
    declared: &IndexMap<String, bool>,
    apply_changes: bool,
) -> Result<SubscriptionReport> {
    let listing = client.list_providers().await?;
    tracing::debug!(
        "Subscription {} reports {} providers",
        client.subscription_id(),
        listing.len()
    );

    let mut report = SubscriptionReport::new();
    for (namespace, &should_be_registered) in declared {
        let Some(provider) = find_provider(&listing, namespace) else {
            tracing::warn!("Could not find provider with namespace: {}", namespace);
            report.record(namespace.as_str(), Outcome::NotFound);
            continue;
        };

        let outcome = reconcile_provider(provider, should_be_registered, client, apply_changes).await;
        report.record(namespace.as_str(), outcome);
    }

    tracing::debug!(
        "Subscription {}: {}",
        client.subscription_id(),
        report.summary()
    );
    Ok(report)
}
