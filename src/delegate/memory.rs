//! In-memory delegate.
//!
//! Deterministic `BTreeMap` storage for every entity kind, plus the role
//! catalogue used to answer `role_exists`. Mutators re-check their own
//! preconditions and consult the lifecycle table, so the store stays
//! consistent even when driven without the operation pipeline.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use super::Delegate;
use crate::errors::DelegateError;
use crate::lifecycle::{Lifecycle, TransitionError, WorkshopEvent};
use crate::model::{
    Artefact, ArtefactId, Institute, InstituteId, NcCentre, NcId, OcCentre, OcId, Role, User,
    UserId, Workshop, WorkshopId, WorkshopStatus, WorkshopTarget,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryDelegate {
    users: BTreeMap<UserId, User>,
    roles: BTreeSet<Role>,
    institutes: BTreeMap<InstituteId, Institute>,
    ocs: BTreeMap<OcId, OcCentre>,
    ncs: BTreeMap<NcId, NcCentre>,
    workshops: BTreeMap<WorkshopId, Workshop>,
    lifecycle: Lifecycle,
}

impl Default for InMemoryDelegate {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDelegate {
    pub fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            roles: Role::base_roles().into_iter().collect(),
            institutes: BTreeMap::new(),
            ocs: BTreeMap::new(),
            ncs: BTreeMap::new(),
            workshops: BTreeMap::new(),
            lifecycle: Lifecycle::default(),
        }
    }

    /// Choose the status conducted workshops move to.
    pub fn with_conduct_status(mut self, status: WorkshopStatus) -> Result<Self, TransitionError> {
        self.lifecycle = Lifecycle::with_conduct_outcome(status)?;
        Ok(self)
    }

    pub fn conduct_status(&self) -> WorkshopStatus {
        self.lifecycle.conduct_outcome()
    }

    /// Load a previously persisted workshop as-is, status and artefacts
    /// included. The owning NC must already be present.
    pub fn import_workshop(&mut self, workshop: Workshop) -> Result<(), DelegateError> {
        let nc = self
            .ncs
            .get_mut(&workshop.nc)
            .ok_or_else(|| DelegateError::NcNotFound(workshop.nc.clone()))?;
        nc.workshops.insert(workshop.id.clone());
        self.workshops.insert(workshop.id.clone(), workshop);
        Ok(())
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn workshops(&self) -> impl Iterator<Item = &Workshop> {
        self.workshops.values()
    }

    fn transition(
        &mut self,
        id: &WorkshopId,
        event: WorkshopEvent,
    ) -> Result<&mut Workshop, DelegateError> {
        let workshop = self
            .workshops
            .get_mut(id)
            .ok_or_else(|| DelegateError::WorkshopNotFound(id.clone()))?;
        let from = workshop.status;
        let to = self
            .lifecycle
            .next_status(from, event)
            .map_err(|e| DelegateError::IllegalTransition(e.to_string()))?;
        workshop.status = to;
        if from != to {
            info!(workshop = %id, from = %from, to = %to, event = event.name(), "Workshop status changed");
        }
        Ok(workshop)
    }
}

impl Delegate for InMemoryDelegate {
    fn user_exists(&self, user: &UserId) -> bool {
        self.users.contains_key(user)
    }

    fn user(&self, user: &UserId) -> Option<User> {
        self.users.get(user).cloned()
    }

    fn get_active_users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    fn email_set(&self) -> BTreeSet<String> {
        self.users.values().map(|user| user.email.clone()).collect()
    }

    fn add_user(&mut self, user: User) -> Result<User, DelegateError> {
        if self.users.contains_key(&user.id) {
            return Err(DelegateError::UserExists(user.id));
        }
        debug!(user = %user.id, "User stored");
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn delete_user(&mut self, user: &UserId) -> Result<User, DelegateError> {
        self.users
            .remove(user)
            .ok_or_else(|| DelegateError::UserNotFound(user.clone()))
    }

    fn update_user(
        &mut self,
        name: String,
        email: String,
        user: &UserId,
    ) -> Result<User, DelegateError> {
        let stored = self
            .users
            .get_mut(user)
            .ok_or_else(|| DelegateError::UserNotFound(user.clone()))?;
        stored.name = name;
        stored.email = email;
        Ok(stored.clone())
    }

    fn role_exists(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    fn add_role_to_user(&mut self, user: &UserId, role: Role) -> Result<User, DelegateError> {
        let stored = self
            .users
            .get_mut(user)
            .ok_or_else(|| DelegateError::UserNotFound(user.clone()))?;
        if stored.holds(&role) {
            return Err(DelegateError::RoleAlreadyHeld {
                user: user.clone(),
                role,
            });
        }
        stored.roles.push(role);
        Ok(stored.clone())
    }

    fn institute_exists(&self, institute: &InstituteId) -> bool {
        self.institutes.contains_key(institute)
    }

    fn institute(&self, institute: &InstituteId) -> Option<Institute> {
        self.institutes.get(institute).cloned()
    }

    fn add_institute(&mut self, institute: Institute) -> Result<Institute, DelegateError> {
        if self.institutes.contains_key(&institute.id) {
            return Err(DelegateError::InstituteExists(institute.id));
        }
        self.institutes
            .insert(institute.id.clone(), institute.clone());
        Ok(institute)
    }

    fn update_institute(
        &mut self,
        name: String,
        address: String,
        institute: &InstituteId,
    ) -> Result<Institute, DelegateError> {
        let stored = self
            .institutes
            .get_mut(institute)
            .ok_or_else(|| DelegateError::InstituteNotFound(institute.clone()))?;
        stored.name = name;
        stored.address = address;
        Ok(stored.clone())
    }

    fn get_ocs(&self) -> Vec<OcCentre> {
        self.ocs.values().cloned().collect()
    }

    fn oc(&self, oc: &OcId) -> Option<OcCentre> {
        self.ocs.get(oc).cloned()
    }

    fn add_oc(&mut self, institute: &InstituteId) -> Result<OcCentre, DelegateError> {
        if !self.institutes.contains_key(institute) {
            return Err(DelegateError::InstituteNotFound(institute.clone()));
        }
        let oc = OcCentre::new(institute.clone());
        if self.ocs.contains_key(&oc.id) {
            return Err(DelegateError::OcExists(oc.id));
        }
        self.roles.insert(Role::Occ {
            centre_oc: oc.id.clone(),
        });
        self.ocs.insert(oc.id.clone(), oc.clone());
        Ok(oc)
    }

    fn get_ncs(&self) -> Vec<NcCentre> {
        self.ncs.values().cloned().collect()
    }

    fn nc(&self, nc: &NcId) -> Option<NcCentre> {
        self.ncs.get(nc).cloned()
    }

    fn nc_exists(&self, nc: &NcId) -> bool {
        self.ncs.contains_key(nc)
    }

    fn add_nc(&mut self, institute: &InstituteId, hub: &OcId) -> Result<NcCentre, DelegateError> {
        if !self.institutes.contains_key(institute) {
            return Err(DelegateError::InstituteNotFound(institute.clone()));
        }
        let nc = NcCentre::new(institute.clone(), hub.clone());
        if self.ncs.contains_key(&nc.id) {
            return Err(DelegateError::NcExists(nc.id));
        }
        let oc = self
            .ocs
            .get_mut(hub)
            .ok_or_else(|| DelegateError::OcNotFound(hub.clone()))?;
        oc.spokes.insert(nc.id.clone());
        self.roles.insert(Role::Ncc {
            centre_nc: nc.id.clone(),
        });
        self.ncs.insert(nc.id.clone(), nc.clone());
        Ok(nc)
    }

    fn workshop(&self, workshop: &WorkshopId) -> Option<Workshop> {
        self.workshops.get(workshop).cloned()
    }

    fn add_workshop(&mut self, workshop: Workshop) -> Result<Workshop, DelegateError> {
        if self.workshops.contains_key(&workshop.id) {
            return Err(DelegateError::WorkshopExists(workshop.id));
        }
        let nc = self
            .ncs
            .get_mut(&workshop.nc)
            .ok_or_else(|| DelegateError::NcNotFound(workshop.nc.clone()))?;
        nc.workshops.insert(workshop.id.clone());

        let workshop = Workshop {
            status: WorkshopStatus::Pending,
            artefacts: Vec::new(),
            ..workshop
        };
        info!(workshop = %workshop.id, nc = %workshop.nc, "Workshop created");
        self.workshops.insert(workshop.id.clone(), workshop.clone());
        Ok(workshop)
    }

    fn cancel_workshop(&mut self, workshop: &WorkshopId) -> Result<Workshop, DelegateError> {
        self.transition(workshop, WorkshopEvent::Cancel)
            .map(|w| w.clone())
    }

    fn conduct_workshop(&mut self, workshop: &WorkshopId) -> Result<Workshop, DelegateError> {
        self.transition(workshop, WorkshopEvent::Conduct)
            .map(|w| w.clone())
    }

    fn approve_workshop(&mut self, workshop: &WorkshopId) -> Result<Workshop, DelegateError> {
        self.transition(workshop, WorkshopEvent::Approve)
            .map(|w| w.clone())
    }

    fn reject_workshop(&mut self, workshop: &WorkshopId) -> Result<Workshop, DelegateError> {
        self.transition(workshop, WorkshopEvent::Reject)
            .map(|w| w.clone())
    }

    fn reschedule_workshop(
        &mut self,
        workshop: &WorkshopId,
        date: NaiveDate,
        target: WorkshopTarget,
    ) -> Result<Workshop, DelegateError> {
        let stored = self.transition(workshop, WorkshopEvent::Reschedule)?;
        stored.date = date;
        stored.target = target;
        Ok(stored.clone())
    }

    fn upload_artefact(
        &mut self,
        workshop: &WorkshopId,
        artefact: Artefact,
    ) -> Result<Workshop, DelegateError> {
        let stored = self.transition(workshop, WorkshopEvent::UploadArtefact)?;
        if stored.artefact(&artefact.id).is_some() {
            return Err(DelegateError::ArtefactExists {
                workshop: workshop.clone(),
                artefact: artefact.id,
            });
        }
        stored.artefacts.push(artefact);
        Ok(stored.clone())
    }

    fn delete_artefact(
        &mut self,
        workshop: &WorkshopId,
        artefact: &ArtefactId,
    ) -> Result<Workshop, DelegateError> {
        let stored = self.transition(workshop, WorkshopEvent::DeleteArtefact)?;
        let before = stored.artefacts.len();
        stored.artefacts.retain(|a| &a.id != artefact);
        if stored.artefacts.len() == before {
            return Err(DelegateError::ArtefactNotFound {
                workshop: workshop.clone(),
                artefact: artefact.clone(),
            });
        }
        Ok(stored.clone())
    }
}
