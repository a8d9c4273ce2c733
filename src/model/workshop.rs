// Workshops run by NC centres and the artefacts uploaded against them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{ArtefactId, InstituteId, NcId, WorkshopId};

/// Lifecycle tag of a workshop. Legal moves between tags live in
/// [`crate::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkshopStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "pending for approval", alias = "pending_for_approval")]
    PendingForApproval,
    #[serde(rename = "approved")]
    Approved,
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl WorkshopStatus {
    pub const ALL: [WorkshopStatus; 6] = [
        WorkshopStatus::Pending,
        WorkshopStatus::PendingForApproval,
        WorkshopStatus::Approved,
        WorkshopStatus::Rejected,
        WorkshopStatus::Completed,
        WorkshopStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkshopStatus::Pending => "pending",
            WorkshopStatus::PendingForApproval => "pending for approval",
            WorkshopStatus::Approved => "approved",
            WorkshopStatus::Rejected => "rejected",
            WorkshopStatus::Completed => "completed",
            WorkshopStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for WorkshopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkshopStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        WorkshopStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| format!("unknown workshop status: {s}"))
    }
}

/// Outreach targets a workshop is expected to meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkshopTarget {
    pub participants: u32,
    pub experiments: u32,
}

impl WorkshopTarget {
    pub fn new(participants: u32, experiments: u32) -> Self {
        Self {
            participants,
            experiments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artefact {
    pub id: ArtefactId,
    pub name: String,
    pub location: String,
}

impl Artefact {
    pub fn new(
        id: impl Into<ArtefactId>,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workshop {
    pub id: WorkshopId,
    pub name: String,
    pub institute: InstituteId,
    pub nc: NcId,
    #[serde(default = "default_status")]
    pub status: WorkshopStatus,
    #[serde(default)]
    pub target: WorkshopTarget,
    pub date: NaiveDate,
    #[serde(default)]
    pub artefacts: Vec<Artefact>,
}

fn default_status() -> WorkshopStatus {
    WorkshopStatus::Pending
}

impl Workshop {
    pub fn new(
        id: impl Into<WorkshopId>,
        name: impl Into<String>,
        institute: InstituteId,
        nc: NcId,
        target: WorkshopTarget,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            institute,
            nc,
            status: WorkshopStatus::Pending,
            target,
            date,
            artefacts: Vec::new(),
        }
    }

    pub fn artefact(&self, id: &ArtefactId) -> Option<&Artefact> {
        self.artefacts.iter().find(|artefact| &artefact.id == id)
    }
}
