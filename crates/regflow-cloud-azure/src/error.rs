//! Azure provider error types

use chrono::{DateTime, Utc};
use regflow_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AzureError {
    #[error("az not found. Please install the Azure CLI: https://aka.ms/installazurecli")]
    AzCliNotFound,

    #[error("Azure CLI credential unavailable: {0}")]
    CliCredential(String),

    #[error("missing service principal setting: pass it on the command line or set {0}")]
    MissingCredential(&'static str),

    #[error("token request failed: {0}")]
    TokenRequest(String),

    #[error("access token expired at {0}")]
    TokenExpired(DateTime<Utc>),

    #[error("Azure Resource Manager returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<AzureError> for CloudError {
    fn from(err: AzureError) -> Self {
        match err {
            AzureError::Api { status: 401 | 403, .. }
            | AzureError::TokenExpired(_)
            | AzureError::TokenRequest(_)
            | AzureError::CliCredential(_)
            | AzureError::MissingCredential(_)
            | AzureError::AzCliNotFound => CloudError::AuthenticationFailed(err.to_string()),
            other => CloudError::ApiError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AzureError>;
