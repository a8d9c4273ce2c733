//! Entities managed by the portal: people and their roles, institutes and the
//! hub/spoke centres they host, and the workshops those centres run.

pub mod ids;
pub mod institute;
pub mod user;
pub mod workshop;

pub use ids::{ArtefactId, InstituteId, NcId, OcId, UserId, WorkshopId};
pub use institute::{Institute, NcCentre, OcCentre};
pub use user::{Role, RoleName, Session, User};
pub use workshop::{Artefact, Workshop, WorkshopStatus, WorkshopTarget};
