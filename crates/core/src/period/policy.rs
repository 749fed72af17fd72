//! Lock policy for mutations against accounting periods.
//!
//! Locking is hard-blocking for regular callers and advisory for privileged
//! ones: a privileged mutation against a locked period succeeds but carries
//! an administrative-override warning for the audit trail.

use thiserror::Error;

/// Mutation rejected because the period is locked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Period {label} is locked, no modifications allowed")]
pub struct PeriodLockError {
    /// Human label of the locked period.
    pub label: String,
}

/// Outcome of a successful lock-policy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationGrant {
    /// The period is open; mutate freely.
    Clear,
    /// The period is locked but the caller is privileged; the mutation
    /// proceeds annotated with this warning.
    LockOverride {
        /// Warning to attach to the result and the audit log.
        warning: String,
    },
}

impl MutationGrant {
    /// The override warning, if any.
    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Clear => None,
            Self::LockOverride { warning } => Some(warning),
        }
    }
}

/// Decides whether a mutation may touch the period.
///
/// - Unlocked periods accept mutations from everyone.
/// - Locked periods reject non-privileged callers outright.
/// - Locked periods accept privileged callers with an override warning.
pub fn authorize_mutation(
    label: &str,
    is_locked: bool,
    privileged: bool,
) -> Result<MutationGrant, PeriodLockError> {
    if !is_locked {
        return Ok(MutationGrant::Clear);
    }

    if privileged {
        Ok(MutationGrant::LockOverride {
            warning: format!("Period {label} is locked - recorded with admin override"),
        })
    } else {
        Err(PeriodLockError {
            label: label.to_string(),
        })
    }
}
