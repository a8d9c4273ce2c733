// Outreach portal library - operation dispatch, authorization and workshop lifecycle
// This exposes the core components for embedding and integration testing

pub mod cli;
pub mod config;
pub mod delegate;
pub mod dispatch;
pub mod errors;
pub mod lifecycle;
pub mod model;
pub mod operations;
pub mod script;
pub mod sessions;
pub mod telemetry;

// Re-export key types for easy access
pub use crate::config::{config, PortalConfig};
pub use delegate::{Delegate, InMemoryDelegate};
pub use dispatch::{ArgValue, Args, Operation, OperationRegistry, Outcome, Portal, SharedPortal};
pub use errors::{DelegateError, ErrorKind, OperationError, OperationResult};
pub use lifecycle::{Lifecycle, WorkshopEvent};
pub use model::{
    Artefact, Institute, NcCentre, OcCentre, Role, Session, User, Workshop, WorkshopStatus,
    WorkshopTarget,
};
pub use script::{Script, ScriptReport};
pub use sessions::SessionRegistry;
pub use telemetry::{create_operation_span, generate_correlation_id, init_telemetry};
