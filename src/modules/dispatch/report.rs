// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;

/// What happened to one recipient. Exactly one outcome is produced per
/// recipient processed, independent of every other recipient.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DispatchOutcome {
    Sent,
    Failed { recipient: String, error: String },
}

/// One entry of the report's failure list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DispatchFailure {
    pub recipient: String,
    pub error: String,
}

/// The caller-facing result of a batch. `sent + failed == total` always.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DispatchReport {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    pub failures: Vec<DispatchFailure>,
}

impl DispatchReport {
    /// Folds outcomes into counts and the failure list, preserving the order
    /// in which the outcomes are given.
    pub fn from_outcomes(outcomes: Vec<DispatchOutcome>) -> Self {
        let mut report = DispatchReport {
            total: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                DispatchOutcome::Sent => report.sent += 1,
                DispatchOutcome::Failed { recipient, error } => {
                    report.failed += 1;
                    report.failures.push(DispatchFailure { recipient, error });
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_always_add_up() {
        let report = DispatchReport::from_outcomes(vec![
            DispatchOutcome::Sent,
            DispatchOutcome::Failed {
                recipient: "a@x.com".into(),
                error: "boom".into(),
            },
            DispatchOutcome::Sent,
        ]);
        assert_eq!(report.total, 3);
        assert_eq!(report.sent + report.failed, report.total);
        assert_eq!(report.failures.len(), report.failed);
    }

    #[test]
    fn failure_list_preserves_encounter_order() {
        let report = DispatchReport::from_outcomes(vec![
            DispatchOutcome::Failed {
                recipient: "first@x.com".into(),
                error: "e1".into(),
            },
            DispatchOutcome::Sent,
            DispatchOutcome::Failed {
                recipient: "second@x.com".into(),
                error: "e2".into(),
            },
        ]);
        let order: Vec<&str> = report
            .failures
            .iter()
            .map(|f| f.recipient.as_str())
            .collect();
        assert_eq!(order, vec!["first@x.com", "second@x.com"]);
    }

    #[test]
    fn empty_batch_reports_all_zero() {
        let report = DispatchReport::from_outcomes(Vec::new());
        assert_eq!(report, DispatchReport::default());
    }
}
