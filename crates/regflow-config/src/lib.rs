//! regflow desired-state configuration
//!
//! Loads the JSON document that declares, per subscription, which resource
//! providers should be registered:
//!
//! ```json
//! {
//!   "subscriptions": [
//!     {
//!       "subscriptionId": "00000000-0000-0000-0000-000000000000",
//!       "subscriptionName": "production",
//!       "providers": { "Microsoft.Storage": true, "Microsoft.Batch": false }
//!     }
//!   ]
//! }
//! ```
//!
//! Validation stops at the first violation found.

pub mod error;
pub mod model;

pub use error::*;
pub use model::{DesiredConfig, SubscriptionSpec};

use model::RawDocument;
use std::path::Path;

impl DesiredConfig {
    /// Parse and validate a desired-state document held in memory
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: Option<RawDocument> = serde_json::from_str(content)?;

        let raw_subscriptions = document
            .and_then(|d| d.subscriptions)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::NoSubscriptions)?;

        let mut subscriptions = Vec::with_capacity(raw_subscriptions.len());
        for (index, raw) in raw_subscriptions.into_iter().enumerate() {
            let subscription_id = raw
                .subscription_id
                .filter(|id| !id.is_empty())
                .ok_or(ConfigError::MissingSubscriptionId { index })?;

            let providers = raw.providers.ok_or_else(|| ConfigError::MissingProviders {
                subscription_id: subscription_id.clone(),
            })?;

            subscriptions.push(SubscriptionSpec {
                subscription_id,
                subscription_name: raw.subscription_name.unwrap_or_default(),
                providers,
            });
        }

        Ok(Self { subscriptions })
    }

    /// Number of declared (subscription, provider) pairs
    pub fn provider_count(&self) -> usize {
        self.subscriptions.iter().map(|s| s.providers.len()).sum()
    }
}

/// Read, parse and validate the desired-state file at `path`
pub fn load_desired_state(path: impl AsRef<Path>) -> Result<DesiredConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = DesiredConfig::from_json_str(&content)?;
    tracing::debug!(
        "Loaded {} subscription(s) declaring {} provider(s) from {}",
        config.subscriptions.len(),
        config.provider_count(),
        path.display()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VALID: &str = r#"{
        "subscriptions": [
            {
                "subscriptionId": "sub-1",
                "subscriptionName": "production",
                "providers": {
                    "Microsoft.Storage": true,
                    "Microsoft.Batch": false,
                    "Microsoft.Compute": true
                }
            },
            {
                "subscriptionId": "sub-2",
                "providers": {}
            }
        ]
    }"#;

    #[test]
    fn test_load_valid_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("providers.json");
        fs::write(&path, VALID).unwrap();

        let config = load_desired_state(&path).unwrap();
        assert_eq!(config.subscriptions.len(), 2);
        assert_eq!(config.provider_count(), 3);

        let first = &config.subscriptions[0];
        assert_eq!(first.subscription_id, "sub-1");
        assert_eq!(first.subscription_name, "production");
        assert_eq!(first.providers.get("Microsoft.Batch"), Some(&false));

        let second = &config.subscriptions[1];
        assert!(second.subscription_name.is_empty());
        assert!(second.providers.is_empty());
    }

    #[test]
    fn test_providers_keep_file_order() {
        let config = DesiredConfig::from_json_str(VALID).unwrap();
        let namespaces: Vec<&str> = config.subscriptions[0]
            .providers
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            namespaces,
            ["Microsoft.Storage", "Microsoft.Batch", "Microsoft.Compute"]
        );
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = load_desired_state(temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_malformed_json() {
        let err = DesiredConfig::from_json_str("{ \"subscriptions\": [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("an error occurred parsing the json file"));
    }

    #[test]
    fn test_non_boolean_provider_value_is_a_parse_error() {
        let err = DesiredConfig::from_json_str(
            r#"{"subscriptions":[{"subscriptionId":"a","providers":{"Microsoft.Web":"yes"}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_no_subscriptions() {
        for content in ["null", "{}", r#"{"subscriptions":null}"#, r#"{"subscriptions":[]}"#] {
            let err = DesiredConfig::from_json_str(content).unwrap_err();
            assert!(
                matches!(err, ConfigError::NoSubscriptions),
                "unexpected error for {content}: {err}"
            );
        }
    }

    #[test]
    fn test_missing_subscription_id() {
        let err = DesiredConfig::from_json_str(
            r#"{"subscriptions":[
                {"subscriptionId":"a","providers":{}},
                {"subscriptionId":"","providers":{}}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingSubscriptionId { index: 1 }));
    }

    #[test]
    fn test_missing_providers() {
        let err = DesiredConfig::from_json_str(
            r#"{"subscriptions":[{"subscriptionId":"a","providers":null}]}"#,
        )
        .unwrap_err();
        match err {
            ConfigError::MissingProviders { subscription_id } => assert_eq!(subscription_id, "a"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_first_violation_wins() {
        // Entry 0 lacks providers, entry 1 lacks an id: only the first is reported.
        let err = DesiredConfig::from_json_str(
            r#"{"subscriptions":[{"subscriptionId":"a"},{"providers":{}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingProviders { .. }));
    }

    #[test]
    fn test_label() {
        let config = DesiredConfig::from_json_str(VALID).unwrap();
        assert_eq!(config.subscriptions[0].label(), "production (sub-1)");
        assert_eq!(config.subscriptions[1].label(), "sub-2");
    }
}
