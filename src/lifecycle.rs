//! Workshop lifecycle.
//!
//! ```text
//!              ┌──── cancel ────▶ cancelled
//!   pending ───┤
//!              └──── conduct ───▶ completed | pending for approval
//!                                                │
//!                                   approve ─────┼───── reject
//!                                      ▼                  ▼
//!                                   approved           rejected
//! ```
//!
//! Rescheduling and artefact changes keep the status but are only legal from
//! certain statuses. Every event that the table does not allow is an error;
//! nothing is silently ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::WorkshopStatus;

/// Statuses in which artefacts may be uploaded. Deletion is allowed in
/// exactly the complementary set.
pub const ARTEFACT_UPLOAD_STATUSES: [WorkshopStatus; 4] = [
    WorkshopStatus::Completed,
    WorkshopStatus::PendingForApproval,
    WorkshopStatus::Rejected,
    WorkshopStatus::Approved,
];

/// Statuses a conducted workshop may land in.
pub const CONDUCT_OUTCOMES: [WorkshopStatus; 2] = [
    WorkshopStatus::Completed,
    WorkshopStatus::PendingForApproval,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkshopEvent {
    Cancel,
    Conduct,
    Approve,
    Reject,
    Reschedule,
    UploadArtefact,
    DeleteArtefact,
}

impl WorkshopEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WorkshopEvent::Cancel => "cancel",
            WorkshopEvent::Conduct => "conduct",
            WorkshopEvent::Approve => "approve",
            WorkshopEvent::Reject => "reject",
            WorkshopEvent::Reschedule => "reschedule",
            WorkshopEvent::UploadArtefact => "upload an artefact to",
            WorkshopEvent::DeleteArtefact => "delete an artefact from",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {} a workshop that is {from}", .event.name())]
    InvalidTransition {
        from: WorkshopStatus,
        event: WorkshopEvent,
    },
    #[error("conducting a workshop cannot lead to status {0}")]
    UnsupportedConductOutcome(WorkshopStatus),
}

pub fn accepts_artefact_upload(status: WorkshopStatus) -> bool {
    ARTEFACT_UPLOAD_STATUSES.contains(&status)
}

/// Whether `event` may happen to a workshop currently in `from`.
pub fn ensure_allowed(from: WorkshopStatus, event: WorkshopEvent) -> Result<(), TransitionError> {
    let allowed = match event {
        WorkshopEvent::Cancel | WorkshopEvent::Conduct => from == WorkshopStatus::Pending,
        WorkshopEvent::Approve | WorkshopEvent::Reject => {
            from == WorkshopStatus::PendingForApproval
        }
        WorkshopEvent::Reschedule => from != WorkshopStatus::Cancelled,
        WorkshopEvent::UploadArtefact => accepts_artefact_upload(from),
        WorkshopEvent::DeleteArtefact => !accepts_artefact_upload(from),
    };

    if allowed {
        Ok(())
    } else {
        Err(TransitionError::InvalidTransition { from, event })
    }
}

/// Transition table, parameterised by where conducting a workshop leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    conduct_outcome: WorkshopStatus,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            conduct_outcome: WorkshopStatus::Completed,
        }
    }
}

impl Lifecycle {
    pub fn with_conduct_outcome(outcome: WorkshopStatus) -> Result<Self, TransitionError> {
        if CONDUCT_OUTCOMES.contains(&outcome) {
            Ok(Self {
                conduct_outcome: outcome,
            })
        } else {
            Err(TransitionError::UnsupportedConductOutcome(outcome))
        }
    }

    pub fn conduct_outcome(&self) -> WorkshopStatus {
        self.conduct_outcome
    }

    /// Status a workshop in `from` ends up in after `event`.
    pub fn next_status(
        &self,
        from: WorkshopStatus,
        event: WorkshopEvent,
    ) -> Result<WorkshopStatus, TransitionError> {
        ensure_allowed(from, event)?;
        Ok(match event {
            WorkshopEvent::Cancel => WorkshopStatus::Cancelled,
            WorkshopEvent::Conduct => self.conduct_outcome,
            WorkshopEvent::Approve => WorkshopStatus::Approved,
            WorkshopEvent::Reject => WorkshopStatus::Rejected,
            WorkshopEvent::Reschedule
            | WorkshopEvent::UploadArtefact
            | WorkshopEvent::DeleteArtefact => from,
        })
    }
}
