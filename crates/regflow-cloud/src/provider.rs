//! Provider-management client abstraction

use crate::error::Result;
use crate::state::CloudProviderState;
use async_trait::async_trait;

/// Access to one subscription's resource providers
///
/// The Azure Resource Manager client implements this; tests use in-memory
/// fakes.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Subscription this client is bound to
    fn subscription_id(&self) -> &str;

    /// List every provider known to the subscription with its current state
    async fn list_providers(&self) -> Result<Vec<CloudProviderState>>;

    /// Request registration of a provider namespace (does not wait for completion)
    async fn register(&self, namespace: &str) -> Result<()>;

    /// Request unregistration of a provider namespace (does not wait for completion)
    async fn unregister(&self, namespace: &str) -> Result<()>;
}
