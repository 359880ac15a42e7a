use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("an error occurred parsing the json file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("at least one subscription must exist in the json file")]
    NoSubscriptions,

    #[error(
        "each subscription in the json file must contain a subscriptionId property (entry at index {index} has none)"
    )]
    MissingSubscriptionId { index: usize },

    #[error(
        "each subscription in the json file must contain a providers property (subscription {subscription_id} has none)"
    )]
    MissingProviders { subscription_id: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
