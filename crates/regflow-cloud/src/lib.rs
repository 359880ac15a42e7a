//! regflow cloud core
//!
//! Provider-agnostic reconciliation of resource provider registrations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  regflow CLI                     │
//! │     (one pass per subscription, in file order)   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                regflow-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │      trait ProviderClient { ... }         │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌─────────────────────┐      │
//! │  │ decide (pure)│  │ reconcile_provider  │      │
//! │  └──────────────┘  └─────────────────────┘      │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────────────┐
//! │  regflow-cloud-azure  │
//! │  (ARM REST client)    │
//! └───────────────────────┘
//! ```

pub mod action;
pub mod error;
pub mod provider;
pub mod reconcile;
pub mod state;

// Re-exports
pub use action::{ActionType, Outcome, ReportSummary, SubscriptionReport};
pub use error::{CloudError, Result};
pub use provider::ProviderClient;
pub use reconcile::{decide, find_provider, reconcile_provider, reconcile_subscription};
pub use state::{CloudProviderState, RegistrationState};
