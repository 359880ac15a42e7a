//! Azure Resource Manager provider-management client
//!
//! Direct REST implementation of the three calls regflow needs: list the
//! providers of a subscription, register one, unregister one.

use crate::auth::Credential;
use crate::error::{AzureError, Result};
use async_trait::async_trait;
use regflow_cloud::{CloudProviderState, ProviderClient};
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_RESOURCE_MANAGER_ENDPOINT: &str = "https://management.azure.com";
pub const PROVIDERS_API_VERSION: &str = "2021-04-01";

/// Provider client bound to one subscription
pub struct ResourceManagementClient {
    client: reqwest::Client,
    credential: Arc<Credential>,
    subscription_id: String,
    endpoint: String,
}

impl ResourceManagementClient {
    pub fn new(credential: Arc<Credential>, subscription_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            credential,
            subscription_id: subscription_id.into(),
            endpoint: DEFAULT_RESOURCE_MANAGER_ENDPOINT.to_string(),
        }
    }

    /// Talk to another Resource Manager endpoint (sovereign clouds, tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn providers_url(&self) -> String {
        format!(
            "{}/subscriptions/{}/providers?api-version={}",
            self.endpoint, self.subscription_id, PROVIDERS_API_VERSION
        )
    }

    fn action_url(&self, namespace: &str, action: &str) -> String {
        format!(
            "{}/subscriptions/{}/providers/{}/{}?api-version={}",
            self.endpoint, self.subscription_id, namespace, action, PROVIDERS_API_VERSION
        )
    }

    /// Fetch every page of the provider listing
    pub async fn fetch_providers(&self) -> Result<Vec<CloudProviderState>> {
        let mut providers = Vec::new();
        let mut next = Some(self.providers_url());

        while let Some(url) = next {
            tracing::debug!("GET {}", url);
            let response = self
                .client
                .get(&url)
                .bearer_auth(self.credential.bearer_token().await?)
                .send()
                .await?;

            let page: ApiProviderPage = Self::check(response).await?.json().await?;
            providers.extend(page.value);
            next = page.next_link.filter(|link| !link.is_empty());
        }

        Ok(providers)
    }

    /// POST `register` or `unregister` for a namespace
    async fn post_action(&self, namespace: &str, action: &str) -> Result<()> {
        let url = self.action_url(namespace, action);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.credential.bearer_token().await?)
            .header(reqwest::header::CONTENT_LENGTH, "0")
            .send()
            .await?;

        Self::check(response).await?;
        tracing::debug!("{} accepted for {}", action, namespace);
        Ok(())
    }

    /// Turn a non-success response into an [`AzureError::Api`]
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await?;
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|envelope| format!("{}: {}", envelope.error.code, envelope.error.message))
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    body
                }
            });

        Err(AzureError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ProviderClient for ResourceManagementClient {
    fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    async fn list_providers(&self) -> regflow_cloud::Result<Vec<CloudProviderState>> {
        Ok(self.fetch_providers().await?)
    }

    async fn register(&self, namespace: &str) -> regflow_cloud::Result<()> {
        Ok(self.post_action(namespace, "register").await?)
    }

    async fn unregister(&self, namespace: &str) -> regflow_cloud::Result<()> {
        Ok(self.post_action(namespace, "unregister").await?)
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiProviderPage {
    #[serde(default)]
    value: Vec<CloudProviderState>,
    #[serde(default)]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}
