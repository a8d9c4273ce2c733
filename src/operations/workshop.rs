//! Workshop operations.
//!
//! NCCs create and run the workshops of their own centre; the OCC of the hub
//! reviews them. Which statuses allow which operation is decided by
//! [`crate::lifecycle`]; every state check here goes through it.

use tracing::info;

use super::authz::{authorize_ncc_owner, authorize_supervising_occ, workshop_ready_for};
use crate::dispatch::{ArgType, Args, Operation, Outcome, PortalView, PortalViewMut};
use crate::errors::{OperationError, OperationResult};
use crate::lifecycle::WorkshopEvent;
use crate::model::{Role, Workshop};

const WORKSHOP_AND_SESSION: &[(&str, ArgType)] =
    &[("workshop", ArgType::Workshop), ("session", ArgType::Session)];

/// Open a new workshop at the session's own NC centre.
pub struct CreateWorkshop;

impl Operation for CreateWorkshop {
    fn name(&self) -> &'static str {
        "CreateWorkshop"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        WORKSHOP_AND_SESSION
    }

    fn check_auth(&self, _view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        let session = args.session("session")?;
        let workshop = args.workshop("workshop")?;
        match &session.role {
            Role::Ncc { centre_nc } if centre_nc == &workshop.nc => Ok(()),
            role => Err(OperationError::auth(format!(
                "{role} may not create workshops for {}",
                workshop.nc
            ))),
        }
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        view.require_registered(args.session("session")?)?;
        let workshop = args.workshop("workshop")?;
        let nc = view.delegate.nc(&workshop.nc).ok_or_else(|| {
            OperationError::state(format!("NC centre {} does not exist", workshop.nc))
        })?;
        if !view.delegate.institute_exists(&workshop.institute) {
            return Err(OperationError::state(format!(
                "institute {} does not exist",
                workshop.institute
            )));
        }
        if nc.institute != workshop.institute {
            return Err(OperationError::state(format!(
                "{} is hosted by {}, not {}",
                nc.id, nc.institute, workshop.institute
            )));
        }
        if view.delegate.workshop(&workshop.id).is_some() {
            return Err(OperationError::state(format!(
                "workshop {} already exists",
                workshop.id
            )));
        }
        Ok(())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let workshop = view.delegate.add_workshop(args.workshop("workshop")?.clone())?;
        info!(workshop = %workshop.id, nc = %workshop.nc, date = %workshop.date, "Workshop scheduled");
        Ok(Outcome::Workshop(workshop))
    }
}

/// Who may trigger a status-changing event.
#[derive(Clone, Copy)]
enum Actor {
    OwningNcc,
    SupervisingOcc,
}

fn authorize(actor: Actor, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
    let session = args.session("session")?;
    let workshop = &args.workshop("workshop")?.id;
    match actor {
        Actor::OwningNcc => authorize_ncc_owner(view, session, workshop),
        Actor::SupervisingOcc => authorize_supervising_occ(view, session, workshop),
    }
}

fn ready_for(view: &PortalView<'_>, args: &Args, event: WorkshopEvent) -> OperationResult<Workshop> {
    workshop_ready_for(view, args.session("session")?, args.workshop("workshop")?, event)
}

/// Operations that only move a workshop from one status to another.
macro_rules! status_operation {
    ($(#[$meta:meta])* $ty:ident, $name:literal, $actor:expr, $event:expr, $mutator:ident) => {
        $(#[$meta])*
        pub struct $ty;

        impl Operation for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
                WORKSHOP_AND_SESSION
            }

            fn check_auth(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
                authorize($actor, view, args)
            }

            fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
                ready_for(view, args, $event).map(|_| ())
            }

            fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
                let workshop = view.delegate.$mutator(&args.workshop("workshop")?.id)?;
                Ok(Outcome::Workshop(workshop))
            }
        }
    };
}

status_operation!(
    /// Call off a workshop that has not been held.
    CancelWorkshop,
    "CancelWorkshop",
    Actor::OwningNcc,
    WorkshopEvent::Cancel,
    cancel_workshop
);

status_operation!(
    /// Record that a pending workshop took place.
    ConductWorkshop,
    "ConductWorkshop",
    Actor::OwningNcc,
    WorkshopEvent::Conduct,
    conduct_workshop
);

status_operation!(
    ApproveWorkshop,
    "ApproveWorkshop",
    Actor::SupervisingOcc,
    WorkshopEvent::Approve,
    approve_workshop
);

status_operation!(
    RejectWorkshop,
    "RejectWorkshop",
    Actor::SupervisingOcc,
    WorkshopEvent::Reject,
    reject_workshop
);

/// Move a workshop to a new date and/or target. The status is kept.
pub struct RescheduleWorkshop;

impl Operation for RescheduleWorkshop {
    fn name(&self) -> &'static str {
        "RescheduleWorkshop"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[
            ("workshop", ArgType::Workshop),
            ("date", ArgType::Date),
            ("target", ArgType::Target),
            ("session", ArgType::Session),
        ]
    }

    fn check_auth(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        authorize(Actor::OwningNcc, view, args)
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        ready_for(view, args, WorkshopEvent::Reschedule).map(|_| ())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let date = *args.date("date")?;
        let target = *args.target("target")?;
        let workshop = view
            .delegate
            .reschedule_workshop(&args.workshop("workshop")?.id, date, target)?;
        info!(workshop = %workshop.id, date = %date, "Workshop rescheduled");
        Ok(Outcome::Workshop(workshop))
    }
}

pub struct UploadArtefact;

impl Operation for UploadArtefact {
    fn name(&self) -> &'static str {
        "UploadArtefact"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[
            ("workshop", ArgType::Workshop),
            ("artefact", ArgType::Artefact),
            ("session", ArgType::Session),
        ]
    }

    fn check_auth(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        authorize(Actor::OwningNcc, view, args)
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        let stored = ready_for(view, args, WorkshopEvent::UploadArtefact)?;
        let artefact = args.artefact("artefact")?;
        if stored.artefact(&artefact.id).is_some() {
            return Err(OperationError::state(format!(
                "artefact {} is already attached to workshop {}",
                artefact.id, stored.id
            )));
        }
        Ok(())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let artefact = args.artefact("artefact")?.clone();
        let artefact_id = artefact.id.clone();
        let workshop = view
            .delegate
            .upload_artefact(&args.workshop("workshop")?.id, artefact)?;
        info!(workshop = %workshop.id, artefact = %artefact_id, "Artefact uploaded");
        Ok(Outcome::Workshop(workshop))
    }
}

pub struct DeleteArtefact;

impl Operation for DeleteArtefact {
    fn name(&self) -> &'static str {
        "DeleteArtefact"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[
            ("workshop", ArgType::Workshop),
            ("artefact", ArgType::Artefact),
            ("session", ArgType::Session),
        ]
    }

    fn check_auth(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        authorize(Actor::OwningNcc, view, args)
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        let stored = ready_for(view, args, WorkshopEvent::DeleteArtefact)?;
        let artefact = args.artefact("artefact")?;
        if stored.artefact(&artefact.id).is_none() {
            return Err(OperationError::state(format!(
                "artefact {} is not attached to workshop {}",
                artefact.id, stored.id
            )));
        }
        Ok(())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let artefact = &args.artefact("artefact")?.id;
        let workshop = view
            .delegate
            .delete_artefact(&args.workshop("workshop")?.id, artefact)?;
        info!(workshop = %workshop.id, artefact = %artefact, "Artefact deleted");
        Ok(Outcome::Workshop(workshop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::{Delegate, InMemoryDelegate};
    use crate::dispatch::Portal;
    use crate::errors::ErrorKind;
    use crate::model::{
        Artefact, Institute, InstituteId, NcId, Session, User, WorkshopStatus,
        WorkshopTarget,
    };
    use chrono::NaiveDate;

    struct World {
        portal: Portal,
        ncc: Session,
        occ: Session,
        nc: NcId,
    }

    fn world(conduct_status: WorkshopStatus) -> World {
        let mut store = InMemoryDelegate::new()
            .with_conduct_status(conduct_status)
            .unwrap();
        store.add_institute(Institute::new("hub", "Hub", "Hyderabad")).unwrap();
        store.add_institute(Institute::new("spoke", "Spoke", "Warangal")).unwrap();
        let oc = store.add_oc(&InstituteId::new("hub")).unwrap();
        let nc = store.add_nc(&InstituteId::new("spoke"), &oc.id).unwrap();

        let ncc_role = Role::Ncc { centre_nc: nc.id.clone() };
        let occ_role = Role::Occ { centre_oc: oc.id.clone() };
        let nadia = User::new("nadia", "Nadia", "nadia@spoke.example").with_role(ncc_role.clone());
        let omar = User::new("omar", "Omar", "omar@hub.example").with_role(occ_role.clone());
        store.add_user(nadia.clone()).unwrap();
        store.add_user(omar.clone()).unwrap();

        let mut portal = Portal::init(store);
        for (user, role) in [(nadia, ncc_role.clone()), (omar, occ_role.clone())] {
            portal
                .execute("login", &Args::new().with("user", user).with("role", role))
                .unwrap();
        }

        World {
            portal,
            ncc: Session::new("nadia", ncc_role),
            occ: Session::new("omar", occ_role),
            nc: nc.id,
        }
    }

    fn draft(nc: &NcId) -> Workshop {
        Workshop::new(
            "ws-1",
            "Virtual Labs for Chemistry",
            nc.institute().clone(),
            nc.clone(),
            WorkshopTarget::new(60, 12),
            NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
        )
    }

    fn on(workshop: &Workshop, session: &Session) -> Args {
        Args::new()
            .with("workshop", workshop.clone())
            .with("session", session.clone())
    }

    fn create(world: &mut World) -> Workshop {
        let workshop = draft(&world.nc);
        world
            .portal
            .execute("CreateWorkshop", &on(&workshop, &world.ncc))
            .unwrap()
            .workshop()
            .unwrap()
    }

    #[test]
    fn created_workshops_are_pending() {
        let mut world = world(WorkshopStatus::Completed);
        let mut supplied = draft(&world.nc);
        supplied.status = WorkshopStatus::Approved;
        let created = world
            .portal
            .execute("CreateWorkshop", &on(&supplied, &world.ncc))
            .unwrap()
            .workshop()
            .unwrap();
        assert_eq!(created.status, WorkshopStatus::Pending);
    }

    #[test]
    fn only_the_centres_own_ncc_creates_workshops() {
        let mut world = world(WorkshopStatus::Completed);
        let workshop = draft(&world.nc);
        let stranger = Session::new(
            "nadia",
            Role::Ncc {
                centre_nc: NcId::for_institute(&InstituteId::new("elsewhere")),
            },
        );
        for session in [&stranger, &world.occ] {
            let err = world
                .portal
                .execute("CreateWorkshop", &on(&workshop, session))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Auth);
        }
    }

    #[test]
    fn conduct_follows_the_configured_outcome() {
        let mut world = world(WorkshopStatus::PendingForApproval);
        let workshop = create(&mut world);
        let conducted = world
            .portal
            .execute("ConductWorkshop", &on(&workshop, &world.ncc))
            .unwrap()
            .workshop()
            .unwrap();
        assert_eq!(conducted.status, WorkshopStatus::PendingForApproval);

        let approved = world
            .portal
            .execute("ApproveWorkshop", &on(&workshop, &world.occ))
            .unwrap()
            .workshop()
            .unwrap();
        assert_eq!(approved.status, WorkshopStatus::Approved);
    }

    #[test]
    fn approving_a_pending_workshop_is_a_state_error() {
        let mut world = world(WorkshopStatus::Completed);
        let workshop = create(&mut world);
        let err = world
            .portal
            .execute("ApproveWorkshop", &on(&workshop, &world.occ))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn nccs_cannot_review_their_own_workshops() {
        let mut world = world(WorkshopStatus::PendingForApproval);
        let workshop = create(&mut world);
        world
            .portal
            .execute("ConductWorkshop", &on(&workshop, &world.ncc))
            .unwrap();
        let err = world
            .portal
            .execute("RejectWorkshop", &on(&workshop, &world.ncc))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
    }

    #[test]
    fn cancelled_workshops_cannot_be_rescheduled() {
        let mut world = world(WorkshopStatus::Completed);
        let workshop = create(&mut world);
        let new_date = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        let reschedule = Args::new()
            .with("workshop", workshop.clone())
            .with("date", new_date)
            .with("target", WorkshopTarget::new(80, 15))
            .with("session", world.ncc.clone());

        let moved = world
            .portal
            .execute("RescheduleWorkshop", &reschedule)
            .unwrap()
            .workshop()
            .unwrap();
        assert_eq!(moved.date, new_date);
        assert_eq!(moved.status, WorkshopStatus::Pending);

        world
            .portal
            .execute("CancelWorkshop", &on(&workshop, &world.ncc))
            .unwrap();
        let err = world
            .portal
            .execute("RescheduleWorkshop", &reschedule)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn artefacts_go_up_after_the_workshop_is_held() {
        let mut world = world(WorkshopStatus::Completed);
        let workshop = create(&mut world);
        let report = Artefact::new("report", "Attendance sheet", "s3://outreach/ws-1/attendance.pdf");
        let upload = Args::new()
            .with("workshop", workshop.clone())
            .with("artefact", report.clone())
            .with("session", world.ncc.clone());

        let err = world.portal.execute("UploadArtefact", &upload).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);

        world
            .portal
            .execute("ConductWorkshop", &on(&workshop, &world.ncc))
            .unwrap();
        let stored = world
            .portal
            .execute("UploadArtefact", &upload)
            .unwrap()
            .workshop()
            .unwrap();
        assert_eq!(stored.artefacts, vec![report]);

        let again = world.portal.execute("UploadArtefact", &upload).unwrap_err();
        assert_eq!(again.kind(), ErrorKind::State);
    }

    #[test]
    fn workshop_ops_need_a_logged_in_session() {
        let mut world = world(WorkshopStatus::Completed);
        let workshop = create(&mut world);
        world
            .portal
            .execute("logout", &Args::new().with("session", world.ncc.clone()))
            .unwrap();
        let err = world
            .portal
            .execute("CancelWorkshop", &on(&workshop, &world.ncc))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }
}
