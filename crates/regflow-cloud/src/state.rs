//! Live registration state of resource providers
//!
//! States are read from the cloud on every run and never persisted.

use serde::{Deserialize, Deserializer};

/// Registration status of a provider namespace within one subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationState {
    Registered,
    NotRegistered,
    /// Registration was requested and is still in progress
    Registering,
    /// Unregistration was requested and is still in progress
    Unregistering,
    /// Any state string outside the four above (e.g. `Unregistered`)
    Other(String),
}

impl RegistrationState {
    /// Parse a state string, ignoring case
    pub fn parse(value: &str) -> Self {
        const KNOWN: [(&str, RegistrationState); 4] = [
            ("Registered", RegistrationState::Registered),
            ("NotRegistered", RegistrationState::NotRegistered),
            ("Registering", RegistrationState::Registering),
            ("Unregistering", RegistrationState::Unregistering),
        ];

        KNOWN
            .into_iter()
            .find(|(name, _)| eq_ignore_case(name, value))
            .map(|(_, state)| state)
            .unwrap_or_else(|| RegistrationState::Other(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            RegistrationState::Registered => "Registered",
            RegistrationState::NotRegistered => "NotRegistered",
            RegistrationState::Registering => "Registering",
            RegistrationState::Unregistering => "Unregistering",
            RegistrationState::Other(s) => s,
        }
    }
}

/// A listing entry without a state is treated as an unknown state
impl Default for RegistrationState {
    fn default() -> Self {
        RegistrationState::Other(String::new())
    }
}

impl std::fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RegistrationState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(RegistrationState::parse(&value))
    }
}

/// One entry of a subscription's provider listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudProviderState {
    /// Provider namespace, e.g. `Microsoft.Storage` (case-insensitive identity)
    pub namespace: String,

    #[serde(default)]
    pub registration_state: RegistrationState,
}

impl CloudProviderState {
    pub fn new(namespace: impl Into<String>, registration_state: RegistrationState) -> Self {
        Self {
            namespace: namespace.into(),
            registration_state,
        }
    }

    /// Whether this entry describes `namespace`, ignoring case
    pub fn matches(&self, namespace: &str) -> bool {
        eq_ignore_case(&self.namespace, namespace)
    }
}

/// Full Unicode uppercase comparison, not just ASCII folding
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_uppercase() == b.to_uppercase()
}
