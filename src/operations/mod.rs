//! The portal's operations, one type per operation name.

pub mod authz;
pub mod institute;
pub mod session;
pub mod user;
pub mod workshop;

pub use institute::{AddInstitute, AddNc, AddOc, UpdateInstitute};
pub use session::{Login, Logout};
pub use user::{AddRole, AddUser, DeleteUser, UpdateUser};
pub use workshop::{
    ApproveWorkshop, CancelWorkshop, ConductWorkshop, CreateWorkshop, DeleteArtefact,
    RejectWorkshop, RescheduleWorkshop, UploadArtefact,
};
