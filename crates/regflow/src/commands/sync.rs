use anyhow::Context;
use colored::Colorize;
use regflow_cloud::{ProviderClient, SubscriptionReport, reconcile_subscription};
use regflow_cloud_azure::{Credential, ResourceManagementClient};
use regflow_config::{DesiredConfig, SubscriptionSpec};
use std::sync::Arc;

/// Reconcile every subscription against Azure Resource Manager
pub async fn handle(
    config: &DesiredConfig,
    credential: Arc<Credential>,
    endpoint: &str,
    apply_changes: bool,
) -> anyhow::Result<()> {
    let reports = sync_subscriptions(config, apply_changes, |subscription| {
        ResourceManagementClient::new(credential.clone(), subscription.subscription_id.as_str())
            .with_endpoint(endpoint)
    })
    .await?;

    let failed: usize = reports.iter().map(SubscriptionReport::failures).sum();
    if failed > 0 {
        tracing::debug!(
            "{} registration change(s) failed across {} subscription(s)",
            failed,
            reports.iter().filter(|r| r.failures() > 0).count()
        );
    }
    Ok(())
}

/// Walk subscriptions in file order, one client per subscription
///
/// A listing failure aborts the run; work already done for earlier
/// subscriptions stays done.
pub async fn sync_subscriptions<C, F>(
    config: &DesiredConfig,
    apply_changes: bool,
    mut connect: F,
) -> anyhow::Result<Vec<SubscriptionReport>>
where
    C: ProviderClient,
    F: FnMut(&SubscriptionSpec) -> C,
{
    crate::utils::print_run_mode(apply_changes);

    let mut reports = Vec::with_capacity(config.subscriptions.len());
    for subscription in &config.subscriptions {
        println!(
            "{}",
            format!("Processing subscription {}...", subscription.label()).bold()
        );

        let client = connect(subscription);
        let report = reconcile_subscription(&client, &subscription.providers, apply_changes)
            .await
            .with_context(|| {
                format!(
                    "failed to list providers for subscription {}",
                    subscription.subscription_id
                )
            })?;
        reports.push(report);
    }

    Ok(reports)
}
