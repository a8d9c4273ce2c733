//! Shared world for integration tests: two hubs, each with one spoke, and a
//! cast of users logged in under their coordinator roles.
//!
//! ```text
//!   hub-a (omar, OCC) ── spoke-a (nadia, NCC; neha, NCC, not logged in)
//!   hub-b (olga, OCC) ── spoke-b (nikhil, NCC, not logged in)
//! ```
#![allow(dead_code)]

use chrono::NaiveDate;
use outreach_portal::delegate::{Delegate, InMemoryDelegate};
use outreach_portal::model::{
    Artefact, Institute, InstituteId, NcCentre, NcId, OcCentre, Role, Session, User, UserId,
    Workshop, WorkshopStatus, WorkshopTarget,
};
use outreach_portal::{Args, Portal};

pub struct World {
    pub portal: Portal,
    pub hub_a: OcCentre,
    pub hub_b: OcCentre,
    pub spoke_a: NcCentre,
    pub spoke_b: NcCentre,
    pub admin: Session,
    pub noc: Session,
    pub guest: Session,
    /// OCC of hub-a
    pub omar: Session,
    /// OCC of hub-b
    pub olga: Session,
    /// NCC of spoke-a
    pub nadia: Session,
}

pub fn user(id: &str, name: &str) -> User {
    User::new(id, name, format!("{id}@outreach.example"))
}

pub fn institute(id: &str) -> Institute {
    Institute::new(id, format!("Institute {id}"), "Hyderabad")
}

pub fn occ(oc: &OcCentre) -> Role {
    Role::Occ {
        centre_oc: oc.id.clone(),
    }
}

pub fn ncc(nc: &NcCentre) -> Role {
    Role::Ncc {
        centre_nc: nc.id.clone(),
    }
}

pub fn stored_user(portal: &Portal, id: &str) -> User {
    portal
        .delegate()
        .user(&UserId::new(id))
        .unwrap_or_else(|| panic!("user {id} not seeded"))
}

pub fn login(portal: &mut Portal, id: &str, role: Role) -> Session {
    let args = Args::new()
        .with("user", stored_user(portal, id))
        .with("role", role);
    portal
        .execute("login", &args)
        .unwrap_or_else(|err| panic!("login of {id} failed: {err}"))
        .session()
        .expect("login yields a session")
}

pub fn world() -> World {
    world_with_conduct_status(WorkshopStatus::Completed)
}

pub fn world_with_conduct_status(conduct_status: WorkshopStatus) -> World {
    let mut store = InMemoryDelegate::new()
        .with_conduct_status(conduct_status)
        .expect("supported conduct status");

    for id in ["hub-a", "hub-b", "spoke-a", "spoke-b"] {
        store.add_institute(institute(id)).unwrap();
    }
    let hub_a = store.add_oc(&InstituteId::new("hub-a")).unwrap();
    let hub_b = store.add_oc(&InstituteId::new("hub-b")).unwrap();
    let spoke_a = store.add_nc(&InstituteId::new("spoke-a"), &hub_a.id).unwrap();
    let spoke_b = store.add_nc(&InstituteId::new("spoke-b"), &hub_b.id).unwrap();
    let hub_a = store.oc(&hub_a.id).unwrap();
    let hub_b = store.oc(&hub_b.id).unwrap();

    let cast = [
        user("root", "Root").with_role(Role::Admin),
        user("nina", "Nina").with_role(Role::Noc),
        user("gita", "Gita").with_role(Role::Guest),
        user("omar", "Omar").with_role(occ(&hub_a)),
        user("olga", "Olga").with_role(occ(&hub_b)),
        user("nadia", "Nadia").with_role(ncc(&spoke_a)),
        user("neha", "Neha").with_role(ncc(&spoke_a)),
        user("nikhil", "Nikhil").with_role(ncc(&spoke_b)),
    ];
    for member in cast {
        store.add_user(member).unwrap();
    }

    let mut portal = Portal::init(store);
    let admin = login(&mut portal, "root", Role::Admin);
    let noc = login(&mut portal, "nina", Role::Noc);
    let guest = login(&mut portal, "gita", Role::Guest);
    let omar = login(&mut portal, "omar", occ(&hub_a));
    let olga = login(&mut portal, "olga", occ(&hub_b));
    let nadia = login(&mut portal, "nadia", ncc(&spoke_a));

    World {
        portal,
        hub_a,
        hub_b,
        spoke_a,
        spoke_b,
        admin,
        noc,
        guest,
        omar,
        olga,
        nadia,
    }
}

pub fn workshop_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 11, 20).unwrap()
}

pub fn draft_workshop(id: &str, nc: &NcId) -> Workshop {
    Workshop::new(
        id,
        format!("Workshop {id}"),
        nc.institute().clone(),
        nc.clone(),
        WorkshopTarget::new(50, 10),
        workshop_date(),
    )
}

pub fn artefact(id: &str) -> Artefact {
    Artefact::new(id, format!("Artefact {id}"), format!("s3://outreach/{id}"))
}

/// Store a workshop directly in `status`, with one attached artefact `seeded`.
pub fn seed_workshop(world: &mut World, id: &str, status: WorkshopStatus) -> Workshop {
    let mut workshop = draft_workshop(id, &world.spoke_a.id);
    workshop.status = status;
    workshop.artefacts.push(artefact("seeded"));
    world
        .portal
        .delegate_mut()
        .import_workshop(workshop.clone())
        .unwrap();
    workshop
}

pub fn on_workshop(workshop: &Workshop, session: &Session) -> Args {
    Args::new()
        .with("workshop", workshop.clone())
        .with("session", session.clone())
}
