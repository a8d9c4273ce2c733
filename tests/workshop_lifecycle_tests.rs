// Workshop lifecycle driven through the operation pipeline

mod fixtures;

use fixtures::*;
use outreach_portal::delegate::Delegate;
use outreach_portal::lifecycle::{accepts_artefact_upload, Lifecycle, WorkshopEvent};
use outreach_portal::model::{Session, WorkshopStatus, WorkshopTarget};
use outreach_portal::{Args, ErrorKind, Workshop};
use proptest::prelude::*;

fn create(world: &mut World, id: &str) -> Workshop {
    let draft = draft_workshop(id, &world.spoke_a.id);
    let args = on_workshop(&draft, &world.nadia);
    world
        .portal
        .execute("CreateWorkshop", &args)
        .unwrap()
        .workshop()
        .unwrap()
}

fn stored_status(world: &World, workshop: &Workshop) -> WorkshopStatus {
    world.portal.delegate().workshop(&workshop.id).unwrap().status
}

fn with_artefact(workshop: &Workshop, artefact_id: &str, session: &Session) -> Args {
    on_workshop(workshop, session).with("artefact", artefact(artefact_id))
}

#[test]
fn full_review_cycle() {
    let mut world = world_with_conduct_status(WorkshopStatus::PendingForApproval);
    let workshop = create(&mut world, "ws-review");
    assert_eq!(workshop.status, WorkshopStatus::Pending);
    assert!(world.portal.delegate().nc(&world.spoke_a.id).unwrap().runs(&workshop.id));

    let err = world
        .portal
        .execute("ApproveWorkshop", &on_workshop(&workshop, &world.omar))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);

    world
        .portal
        .execute("ConductWorkshop", &on_workshop(&workshop, &world.nadia))
        .unwrap();
    assert_eq!(stored_status(&world, &workshop), WorkshopStatus::PendingForApproval);

    let err = world
        .portal
        .execute("ApproveWorkshop", &on_workshop(&workshop, &world.olga))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);

    let approved = world
        .portal
        .execute("ApproveWorkshop", &on_workshop(&workshop, &world.omar))
        .unwrap()
        .workshop()
        .unwrap();
    assert_eq!(approved.status, WorkshopStatus::Approved);
}

#[test]
fn rejected_workshops_accept_artefacts() {
    let mut world = world_with_conduct_status(WorkshopStatus::PendingForApproval);
    let workshop = create(&mut world, "ws-reject");
    world
        .portal
        .execute("ConductWorkshop", &on_workshop(&workshop, &world.nadia))
        .unwrap();
    world
        .portal
        .execute("RejectWorkshop", &on_workshop(&workshop, &world.omar))
        .unwrap();
    assert_eq!(stored_status(&world, &workshop), WorkshopStatus::Rejected);

    let args = with_artefact(&workshop, "photos", &world.nadia);
    let stored = world
        .portal
        .execute("UploadArtefact", &args)
        .unwrap()
        .workshop()
        .unwrap();
    assert_eq!(stored.artefacts.len(), 1);
    assert_eq!(stored.status, WorkshopStatus::Rejected);
}

#[test]
fn other_centres_cannot_touch_the_workshop() {
    let mut world = world();
    let workshop = create(&mut world, "ws-private");
    let nikhil = login(&mut world.portal, "nikhil", ncc(&world.spoke_b));

    for op in ["CancelWorkshop", "ConductWorkshop"] {
        let err = world
            .portal
            .execute(op, &on_workshop(&workshop, &nikhil))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth, "{op}");
    }
    for session in [&world.admin, &world.noc, &world.guest] {
        let err = world
            .portal
            .execute("CancelWorkshop", &on_workshop(&workshop, session))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
    }
    assert_eq!(stored_status(&world, &workshop), WorkshopStatus::Pending);
}

#[test]
fn workshop_ids_are_unique() {
    let mut world = world();
    let workshop = create(&mut world, "ws-once");
    let err = world
        .portal
        .execute("CreateWorkshop", &on_workshop(&workshop, &world.nadia))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);
}

#[test]
fn artefact_upload_and_delete_partition_the_statuses() {
    for status in WorkshopStatus::ALL {
        let mut world = world();
        let workshop = seed_workshop(&mut world, "ws-seeded", status);

        let upload = world
            .portal
            .execute("UploadArtefact", &with_artefact(&workshop, "fresh", &world.nadia));
        let delete = world
            .portal
            .execute("DeleteArtefact", &with_artefact(&workshop, "seeded", &world.nadia));

        assert_eq!(upload.is_ok(), accepts_artefact_upload(status), "{status}");
        assert_ne!(upload.is_ok(), delete.is_ok(), "{status}");
        for result in [upload, delete] {
            if let Err(err) = result {
                assert_eq!(err.kind(), ErrorKind::State, "{status}");
            }
        }
        assert_eq!(stored_status(&world, &workshop), status);
    }
}

#[test]
fn deleting_a_missing_artefact_is_a_state_error() {
    let mut world = world();
    let workshop = seed_workshop(&mut world, "ws-seeded", WorkshopStatus::Pending);
    let err = world
        .portal
        .execute("DeleteArtefact", &with_artefact(&workshop, "never-uploaded", &world.nadia))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Cancel,
    Conduct,
    Approve,
    Reject,
    Reschedule,
}

impl Step {
    fn event(self) -> WorkshopEvent {
        match self {
            Step::Cancel => WorkshopEvent::Cancel,
            Step::Conduct => WorkshopEvent::Conduct,
            Step::Approve => WorkshopEvent::Approve,
            Step::Reject => WorkshopEvent::Reject,
            Step::Reschedule => WorkshopEvent::Reschedule,
        }
    }

    fn run(self, world: &mut World, workshop: &Workshop) -> Result<Workshop, ErrorKind> {
        let (op, args) = match self {
            Step::Cancel => ("CancelWorkshop", on_workshop(workshop, &world.nadia)),
            Step::Conduct => ("ConductWorkshop", on_workshop(workshop, &world.nadia)),
            Step::Approve => ("ApproveWorkshop", on_workshop(workshop, &world.omar)),
            Step::Reject => ("RejectWorkshop", on_workshop(workshop, &world.omar)),
            Step::Reschedule => (
                "RescheduleWorkshop",
                on_workshop(workshop, &world.nadia)
                    .with("date", workshop_date().succ_opt().unwrap())
                    .with("target", WorkshopTarget::new(75, 20)),
            ),
        };
        world
            .portal
            .execute(op, &args)
            .map(|outcome| outcome.workshop().unwrap())
            .map_err(|err| err.kind())
    }
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Cancel),
        Just(Step::Conduct),
        Just(Step::Approve),
        Just(Step::Reject),
        Just(Step::Reschedule),
    ]
}

proptest! {
    #[test]
    fn status_only_moves_along_lifecycle_edges(
        review_first in any::<bool>(),
        steps in prop::collection::vec(step(), 1..10),
    ) {
        let conduct_status = if review_first {
            WorkshopStatus::PendingForApproval
        } else {
            WorkshopStatus::Completed
        };
        let lifecycle = Lifecycle::with_conduct_outcome(conduct_status).unwrap();
        let mut world = world_with_conduct_status(conduct_status);
        let workshop = create(&mut world, "ws-walk");

        for step in steps {
            let before = stored_status(&world, &workshop);
            let expected = lifecycle.next_status(before, step.event());
            match (step.run(&mut world, &workshop), expected) {
                (Ok(after), Ok(next)) => prop_assert_eq!(after.status, next),
                (Err(kind), Err(_)) => {
                    prop_assert_eq!(kind, ErrorKind::State);
                    prop_assert_eq!(stored_status(&world, &workshop), before);
                }
                (actual, expected) => {
                    prop_assert!(false, "{step:?} from {before}: got {actual:?}, table says {expected:?}");
                }
            }
        }
    }
}

#[test]
fn workshop_institute_must_host_its_nc() {
    let mut world = world();
    let mut draft = draft_workshop("ws-misfiled", &world.spoke_a.id);
    draft.institute = world.hub_b.institute.clone();
    let err = world
        .portal
        .execute("CreateWorkshop", &on_workshop(&draft, &world.nadia))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);
    assert!(world.portal.delegate().workshop(&draft.id).is_none());
    assert!(!world.portal.delegate().nc(&world.spoke_a.id).unwrap().runs(&draft.id));
}
