//! Azure binding for regflow
//!
//! This crate implements the `ProviderClient` trait on top of the Azure
//! Resource Manager REST API and resolves the credential it authenticates
//! with.
//!
//! # Requirements
//!
//! - Either an `az login` session (`use_cli_creds`), or
//! - a service principal: tenant id, client id and client secret, passed
//!   explicitly or through `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` and
//!   `AZURE_CLIENT_SECRET`
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use regflow_cloud::ProviderClient;
//! use regflow_cloud_azure::{authenticate, AuthOptions, ResourceManagementClient};
//!
//! let credential = Arc::new(authenticate(&AuthOptions::default()).await?);
//! let client = ResourceManagementClient::new(credential, "00000000-0000-0000-0000-000000000000");
//!
//! for provider in client.list_providers().await? {
//!     println!("{} {}", provider.namespace, provider.registration_state);
//! }
//! client.register("Microsoft.Storage").await?;
//! ```

pub mod auth;
pub mod az_cli;
pub mod client;
pub mod error;

pub use auth::{
    AccessToken, AuthOptions, Credential, CredentialSource, DEFAULT_AUTHORITY_HOST,
    ServicePrincipal, authenticate,
};
pub use az_cli::AzCli;
pub use client::{DEFAULT_RESOURCE_MANAGER_ENDPOINT, PROVIDERS_API_VERSION, ResourceManagementClient};
pub use error::{AzureError, Result};
