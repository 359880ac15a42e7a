//! Cloud provider error types

use thiserror::Error;

/// Errors surfaced through [`crate::ProviderClient`]
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error: {0}")]
    ApiError(String),
}

pub type Result<T> = std::result::Result<T, CloudError>;
