// Institutes and the hub (OC) / spoke (NC) centres they host

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ids::{InstituteId, NcId, OcId, WorkshopId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institute {
    pub id: InstituteId,
    pub name: String,
    pub address: String,
}

impl Institute {
    pub fn new(
        id: impl Into<InstituteId>,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Hub centre. Supervises the NC centres listed in `spokes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcCentre {
    pub id: OcId,
    pub institute: InstituteId,
    #[serde(default)]
    pub spokes: BTreeSet<NcId>,
}

impl OcCentre {
    pub fn new(institute: InstituteId) -> Self {
        Self {
            id: OcId::for_institute(&institute),
            institute,
            spokes: BTreeSet::new(),
        }
    }

    pub fn supervises(&self, nc: &NcId) -> bool {
        self.spokes.contains(nc)
    }
}

/// Spoke centre. Runs the workshops listed in `workshops`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NcCentre {
    pub id: NcId,
    pub institute: InstituteId,
    pub hub: OcId,
    #[serde(default)]
    pub workshops: BTreeSet<WorkshopId>,
}

impl NcCentre {
    pub fn new(institute: InstituteId, hub: OcId) -> Self {
        Self {
            id: NcId::for_institute(&institute),
            institute,
            hub,
            workshops: BTreeSet::new(),
        }
    }

    pub fn runs(&self, workshop: &WorkshopId) -> bool {
        self.workshops.contains(workshop)
    }
}
