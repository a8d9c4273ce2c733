//! Operation dispatch: arguments, their predicates, the operation contract,
//! the registry of named operations and the engine that runs them.

pub mod args;
pub mod engine;
pub mod operation;
pub mod predicates;
pub mod registry;

pub use args::{ArgType, ArgValue, Args};
pub use engine::{OperationInfo, Portal, SharedPortal};
pub use operation::{Operation, Outcome, PortalView, PortalViewMut};
pub use registry::OperationRegistry;
