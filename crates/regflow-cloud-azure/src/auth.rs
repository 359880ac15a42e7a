//! Azure credential resolution
//!
//! A run authenticates exactly once, either by borrowing the Azure CLI login
//! or by exchanging service principal secrets for a token. The resulting
//! [`Credential`] is shared by every subscription client and goes back to
//! the same source for a new token when the current one runs out.

use crate::az_cli::AzCli;
use crate::error::{AzureError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Resource the CLI token is requested for
pub const RESOURCE_MANAGER_RESOURCE: &str = "https://management.azure.com/";

/// OAuth2 scope requested for service principal tokens
pub const RESOURCE_MANAGER_SCOPE: &str = "https://management.azure.com/.default";

pub const TENANT_ID_ENV: &str = "AZURE_TENANT_ID";
pub const CLIENT_ID_ENV: &str = "AZURE_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "AZURE_CLIENT_SECRET";

/// How to authenticate
#[derive(Clone, Default)]
pub struct AuthOptions {
    /// Use the Azure CLI login instead of a service principal
    pub use_cli_creds: bool,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Overrides [`DEFAULT_AUTHORITY_HOST`]
    pub authority_host: Option<String>,
}

impl AuthOptions {
    fn authority_host(&self) -> &str {
        self.authority_host
            .as_deref()
            .unwrap_or(DEFAULT_AUTHORITY_HOST)
            .trim_end_matches('/')
    }
}

impl std::fmt::Debug for AuthOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthOptions")
            .field("use_cli_creds", &self.use_cli_creds)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("authority_host", &self.authority_host)
            .finish()
    }
}

/// Where a credential came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    AzureCli,
    ServicePrincipal { tenant_id: String, client_id: String },
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::AzureCli => write!(f, "Azure CLI"),
            CredentialSource::ServicePrincipal {
                tenant_id,
                client_id,
            } => write!(f, "service principal {} (tenant {})", client_id, tenant_id),
        }
    }
}

/// Tokens are renewed once they are this close to expiring
const REFRESH_MARGIN_SECS: i64 = 300;

/// A bearer token and the moment it stops being accepted
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    fn expires_within(&self, margin: Duration) -> bool {
        self.expires_at.is_some_and(|at| at - margin <= Utc::now())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Where fresh tokens come from
enum Renewal {
    AzureCli(AzCli),
    ServicePrincipal {
        principal: ServicePrincipal,
        client: reqwest::Client,
        authority_host: String,
    },
}

impl Renewal {
    fn source(&self) -> CredentialSource {
        match self {
            Renewal::AzureCli(_) => CredentialSource::AzureCli,
            Renewal::ServicePrincipal { principal, .. } => CredentialSource::ServicePrincipal {
                tenant_id: principal.tenant_id.clone(),
                client_id: principal.client_id.clone(),
            },
        }
    }

    async fn fetch(&self) -> Result<AccessToken> {
        match self {
            Renewal::AzureCli(az) => az.get_access_token(RESOURCE_MANAGER_RESOURCE).await,
            Renewal::ServicePrincipal {
                principal,
                client,
                authority_host,
            } => principal.login(client, authority_host).await,
        }
    }
}

/// Bearer token provider for Azure Resource Manager
///
/// Shared by every subscription client for the whole run. A credential
/// built by [`authenticate`] fetches a new token from its source when the
/// current one is about to expire; one built with [`Credential::new`]
/// keeps its token and refuses it once expired.
pub struct Credential {
    source: CredentialSource,
    renewal: Option<Renewal>,
    refresh_margin: Duration,
    token: Mutex<AccessToken>,
}

impl Credential {
    /// A fixed token that is never renewed
    pub fn new(
        access_token: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
        source: CredentialSource,
    ) -> Self {
        Self {
            source,
            renewal: None,
            refresh_margin: Duration::seconds(REFRESH_MARGIN_SECS),
            token: Mutex::new(AccessToken::new(access_token, expires_at)),
        }
    }

    fn renewable(token: AccessToken, renewal: Renewal) -> Self {
        Self {
            source: renewal.source(),
            renewal: Some(renewal),
            refresh_margin: Duration::seconds(REFRESH_MARGIN_SECS),
            token: Mutex::new(token),
        }
    }

    /// Renew tokens this long before they expire (default five minutes)
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.lock().await.expires_at()
    }

    /// The token to send, renewed first if it is close to expiry
    pub async fn bearer_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;

        if let Some(renewal) = &self.renewal {
            if token.expires_within(self.refresh_margin) {
                tracing::debug!("Renewing access token from {}", self.source);
                *token = renewal.fetch().await?;
            }
        }

        match token.expires_at() {
            Some(at) if at <= Utc::now() => Err(AzureError::TokenExpired(at)),
            _ => Ok(token.secret().to_string()),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("source", &self.source)
            .field("renewable", &self.renewal.is_some())
            .field("refresh_margin", &self.refresh_margin)
            .finish_non_exhaustive()
    }
}

/// Service principal secrets, resolved from options or the environment
#[derive(Clone)]
pub struct ServicePrincipal {
    pub tenant_id: String,
    pub client_id: String,
    client_secret: String,
}

impl ServicePrincipal {
    /// Take each field from `options`, falling back to its environment variable
    pub fn resolve(options: &AuthOptions) -> Result<Self> {
        Ok(Self {
            tenant_id: option_or_env(options.tenant_id.as_deref(), TENANT_ID_ENV)?,
            client_id: option_or_env(options.client_id.as_deref(), CLIENT_ID_ENV)?,
            client_secret: option_or_env(options.client_secret.as_deref(), CLIENT_SECRET_ENV)?,
        })
    }

    /// Exchange the secret for an access token (client credentials grant)
    pub async fn login(&self, client: &reqwest::Client, authority_host: &str) -> Result<AccessToken> {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            authority_host.trim_end_matches('/'),
            self.tenant_id
        );

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", RESOURCE_MANAGER_SCOPE),
        ];

        tracing::debug!("Requesting token from {}", url);
        let response = client.post(&url).form(&form).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<TokenErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error_description.or(e.error))
                .unwrap_or(body);
            return Err(AzureError::TokenRequest(format!("{}: {}", status, message)));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        let expires_at = token
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .map(|secs| Utc::now() + Duration::seconds(secs));

        Ok(AccessToken::new(token.access_token, expires_at))
    }
}

impl std::fmt::Debug for ServicePrincipal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServicePrincipal")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

fn option_or_env(value: Option<&str>, env_var: &'static str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok().filter(|v| !v.is_empty()))
        .ok_or(AzureError::MissingCredential(env_var))
}

/// Obtain the run's credential
pub async fn authenticate(options: &AuthOptions) -> Result<Credential> {
    let renewal = if options.use_cli_creds {
        Renewal::AzureCli(AzCli::new())
    } else {
        Renewal::ServicePrincipal {
            principal: ServicePrincipal::resolve(options)?,
            client: reqwest::Client::new(),
            authority_host: options.authority_host().to_string(),
        }
    };

    let token = renewal.fetch().await?;
    let credential = Credential::renewable(token, renewal);
    tracing::debug!("Authenticated with Azure using {}", credential.source());
    Ok(credential)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}
