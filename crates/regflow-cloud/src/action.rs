//! Reconciliation actions and their outcomes

/// What the decision table asks for, given actual and desired state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    /// Provider is not registered but should be
    Register,
    /// Provider is registered but should not be
    Unregister,
    /// A registration is already in flight
    AwaitRegistering,
    /// An unregistration is already in flight
    AwaitUnregistering,
    /// Actual state already matches, or is not one we act on
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Register => write!(f, "register"),
            ActionType::Unregister => write!(f, "unregister"),
            ActionType::AwaitRegistering => write!(f, "registering"),
            ActionType::AwaitUnregistering => write!(f, "unregistering"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// Result of reconciling one declared provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Already in the desired state
    InSync,
    /// Dry run: a change was detected but not applied
    WouldApply(ActionType),
    /// The register/unregister call was accepted
    Applied(ActionType),
    /// The register/unregister call failed; the message is the API error
    Failed(ActionType, String),
    /// A transition is already in progress
    Pending(ActionType),
    /// Namespace absent from the cloud listing
    NotFound,
}

/// Tally of outcomes for one subscription
#[derive(Debug, Clone, Default)]
pub struct SubscriptionReport {
    /// (namespace, outcome) in declaration order
    pub outcomes: Vec<(String, Outcome)>,
}

impl SubscriptionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, namespace: impl Into<String>, outcome: Outcome) {
        self.outcomes.push((namespace.into(), outcome));
    }

    pub fn outcome(&self, namespace: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|(ns, _)| ns == namespace)
            .map(|(_, outcome)| outcome)
    }

    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, Outcome::Failed(..)))
            .count()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for (_, outcome) in &self.outcomes {
            match outcome {
                Outcome::InSync => summary.in_sync += 1,
                Outcome::WouldApply(_) | Outcome::Applied(_) => summary.changed += 1,
                Outcome::Failed(..) => summary.failed += 1,
                Outcome::Pending(_) => summary.pending += 1,
                Outcome::NotFound => summary.not_found += 1,
            }
        }
        summary
    }
}

/// Counts per outcome kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub in_sync: usize,
    pub changed: usize,
    pub failed: usize,
    pub pending: usize,
    pub not_found: usize,
}

impl std::fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} in sync, {} changed, {} failed, {} pending, {} not found",
            self.in_sync, self.changed, self.failed, self.pending, self.not_found
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut report = SubscriptionReport::new();
        report.record("A", Outcome::InSync);
        report.record("B", Outcome::WouldApply(ActionType::Register));
        report.record("C", Outcome::Failed(ActionType::Unregister, "boom".into()));
        report.record("D", Outcome::NotFound);
        report.record("E", Outcome::Pending(ActionType::AwaitRegistering));

        let summary = report.summary();
        assert_eq!(
            summary,
            ReportSummary {
                in_sync: 1,
                changed: 1,
                failed: 1,
                pending: 1,
                not_found: 1,
            }
        );
        assert_eq!(report.failures(), 1);
        assert_eq!(report.outcome("D"), Some(&Outcome::NotFound));
        assert_eq!(
            summary.to_string(),
            "1 in sync, 1 changed, 1 failed, 1 pending, 1 not found"
        );
    }
}
