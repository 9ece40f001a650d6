//! Verification report — per-check results, run state, and teardown outcome.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::stack::StackOutputs;

// ── Check identity ────────────────────────────────────────────────────────────

/// The kind of cloud resource a check looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    VirtualMachine,
    NetworkInterface,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VirtualMachine => write!(f, "VM"),
            Self::NetworkInterface => write!(f, "NIC"),
        }
    }
}

/// Every check the verification sequence can record, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    VmExists,
    NicExists,
    NicAttached,
    ImageReference,
    ImagePublisher,
    ImageOffer,
    ImageSku,
    ImageVersion,
}

impl CheckKind {
    /// Human-readable label used by the report renderers.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::VmExists => "virtual machine exists",
            Self::NicExists => "network interface exists",
            Self::NicAttached => "network interface attached to VM",
            Self::ImageReference => "image reference present",
            Self::ImagePublisher => "image publisher",
            Self::ImageOffer => "image offer",
            Self::ImageSku => "image SKU",
            Self::ImageVersion => "image version",
        }
    }
}

// ── Check failures ────────────────────────────────────────────────────────────

/// Why a single check failed. Reported, never thrown: failures land in the
/// report and the run continues to teardown.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckFailure {
    #[error("{kind} '{name}' not found in resource group '{resource_group}'")]
    ResourceMissing {
        kind: ResourceKind,
        name: String,
        resource_group: String,
    },

    #[error("NIC '{nic}' is not attached to VM '{vm}'")]
    AttachmentMismatch { nic: String, vm: String },

    #[error("VM '{vm}' descriptor has no {field}")]
    MalformedDescriptor { vm: String, field: &'static str },

    #[error("{field}: expected '{expected}', got '{actual}'")]
    Mismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },
}

/// One evaluated check, passed or failed.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub check: CheckKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<CheckFailure>,
}

impl CheckResult {
    #[must_use]
    pub fn passed(check: CheckKind) -> Self {
        Self {
            check,
            failure: None,
        }
    }

    #[must_use]
    pub fn failed(check: CheckKind, failure: CheckFailure) -> Self {
        Self {
            check,
            failure: Some(failure),
        }
    }

    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.failure.is_none()
    }
}

// ── Run state ─────────────────────────────────────────────────────────────────

/// Lifecycle position of the run. `Destroyed` is reached from any state
/// after `Provisioned`, whatever the verification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Init,
    Provisioned,
    Verified,
    Destroyed,
}

/// What happened when the stack was torn down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TeardownOutcome {
    Destroyed,
    Failed { error: String },
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Everything a run produced: the stack that was provisioned, each check
/// result, any run-level fault, the final state, and the teardown outcome.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub stack: StackOutputs,
    pub checks: Vec<CheckResult>,
    /// A fatal fault outside the check taxonomy (e.g. the inspector process
    /// could not run). Aborts remaining checks but never teardown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
    pub state: RunState,
    pub teardown: TeardownOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl VerificationReport {
    /// Whether every check passed and no run-level fault was recorded.
    /// Teardown is judged separately.
    #[must_use]
    pub fn verification_passed(&self) -> bool {
        self.fault.is_none() && self.checks.iter().all(CheckResult::is_passed)
    }

    /// Overall run outcome. A clean verification with a failed teardown is
    /// still a failed run: the stack is orphaned and billable.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.verification_passed() && self.teardown == TeardownOutcome::Destroyed
    }

    /// Number of failed checks.
    #[must_use]
    pub fn failed_checks(&self) -> usize {
        self.checks.iter().filter(|c| !c.is_passed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> StackOutputs {
        StackOutputs {
            vm_name: "demo-vm".to_string(),
            resource_group_name: "demo-rg".to_string(),
            nic_name: "demo-nic".to_string(),
        }
    }

    fn report(checks: Vec<CheckResult>, teardown: TeardownOutcome) -> VerificationReport {
        let now = Utc::now();
        VerificationReport {
            stack: stack(),
            checks,
            fault: None,
            state: RunState::Destroyed,
            teardown,
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn all_passing_checks_pass_the_run() {
        let report = report(
            vec![CheckResult::passed(CheckKind::VmExists)],
            TeardownOutcome::Destroyed,
        );
        assert!(report.verification_passed());
        assert!(report.passed());
    }

    #[test]
    fn one_failure_fails_the_run() {
        let report = report(
            vec![
                CheckResult::passed(CheckKind::VmExists),
                CheckResult::failed(
                    CheckKind::ImageOffer,
                    CheckFailure::Mismatch {
                        field: "offer",
                        expected: "a".to_string(),
                        actual: "b".to_string(),
                    },
                ),
            ],
            TeardownOutcome::Destroyed,
        );
        assert!(!report.verification_passed());
        assert_eq!(report.failed_checks(), 1);
    }

    #[test]
    fn failed_teardown_fails_a_clean_run() {
        let report = report(
            vec![CheckResult::passed(CheckKind::VmExists)],
            TeardownOutcome::Failed {
                error: "destroy timed out".to_string(),
            },
        );
        assert!(report.verification_passed());
        assert!(!report.passed());
    }

    #[test]
    fn fault_fails_verification() {
        let mut r = report(vec![], TeardownOutcome::Destroyed);
        r.fault = Some("inspector unavailable".to_string());
        assert!(!r.verification_passed());
    }

    #[test]
    fn failure_messages_name_the_resources() {
        let failure = CheckFailure::ResourceMissing {
            kind: ResourceKind::NetworkInterface,
            name: "demo-nic".to_string(),
            resource_group: "demo-rg".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "NIC 'demo-nic' not found in resource group 'demo-rg'"
        );
    }
}
