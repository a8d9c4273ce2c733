//! Data-access contract the portal core consumes.
//!
//! The core never looks inside a delegate beyond these queries and mutators.
//! Queries return owned snapshots so that checks can never hold a borrow
//! into the store while an action mutates it.

pub mod memory;

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::errors::DelegateError;
use crate::model::{
    Artefact, ArtefactId, Institute, InstituteId, NcCentre, NcId, OcCentre, OcId, Role, User,
    UserId, Workshop, WorkshopId, WorkshopTarget,
};

pub use memory::InMemoryDelegate;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Delegate: Send {
    // ── Users ──
    fn user_exists(&self, user: &UserId) -> bool;
    fn user(&self, user: &UserId) -> Option<User>;
    fn get_active_users(&self) -> Vec<User>;
    /// Every email address currently in use.
    fn email_set(&self) -> BTreeSet<String>;
    fn add_user(&mut self, user: User) -> Result<User, DelegateError>;
    fn delete_user(&mut self, user: &UserId) -> Result<User, DelegateError>;
    fn update_user(
        &mut self,
        name: String,
        email: String,
        user: &UserId,
    ) -> Result<User, DelegateError>;

    // ── Roles ──
    fn role_exists(&self, role: &Role) -> bool;
    fn add_role_to_user(&mut self, user: &UserId, role: Role) -> Result<User, DelegateError>;

    // ── Institutes ──
    fn institute_exists(&self, institute: &InstituteId) -> bool;
    fn institute(&self, institute: &InstituteId) -> Option<Institute>;
    fn add_institute(&mut self, institute: Institute) -> Result<Institute, DelegateError>;
    fn update_institute(
        &mut self,
        name: String,
        address: String,
        institute: &InstituteId,
    ) -> Result<Institute, DelegateError>;

    // ── Centres ──
    fn get_ocs(&self) -> Vec<OcCentre>;
    fn oc(&self, oc: &OcId) -> Option<OcCentre>;
    fn add_oc(&mut self, institute: &InstituteId) -> Result<OcCentre, DelegateError>;
    fn get_ncs(&self) -> Vec<NcCentre>;
    fn nc(&self, nc: &NcId) -> Option<NcCentre>;
    fn nc_exists(&self, nc: &NcId) -> bool;
    fn add_nc(&mut self, institute: &InstituteId, hub: &OcId) -> Result<NcCentre, DelegateError>;

    // ── Workshops ──
    fn workshop(&self, workshop: &WorkshopId) -> Option<Workshop>;
    fn add_workshop(&mut self, workshop: Workshop) -> Result<Workshop, DelegateError>;
    fn cancel_workshop(&mut self, workshop: &WorkshopId) -> Result<Workshop, DelegateError>;
    /// The status a conducted workshop moves to is chosen by the store.
    fn conduct_workshop(&mut self, workshop: &WorkshopId) -> Result<Workshop, DelegateError>;
    fn approve_workshop(&mut self, workshop: &WorkshopId) -> Result<Workshop, DelegateError>;
    fn reject_workshop(&mut self, workshop: &WorkshopId) -> Result<Workshop, DelegateError>;
    fn reschedule_workshop(
        &mut self,
        workshop: &WorkshopId,
        date: NaiveDate,
        target: WorkshopTarget,
    ) -> Result<Workshop, DelegateError>;
    fn upload_artefact(
        &mut self,
        workshop: &WorkshopId,
        artefact: Artefact,
    ) -> Result<Workshop, DelegateError>;
    fn delete_artefact(
        &mut self,
        workshop: &WorkshopId,
        artefact: &ArtefactId,
    ) -> Result<Workshop, DelegateError>;
}
