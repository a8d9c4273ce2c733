//! Error types for the operation pipeline and the delegate store.
//!
//! Every validation failure is a *rejection*: nothing in the delegate or the
//! session registry changes. Only [`OperationError::Fatal`] comes from an
//! action, after every check has passed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::{ArtefactId, InstituteId, NcId, OcId, Role, UserId, WorkshopId};

/// Failures raised by a [`crate::delegate::Delegate`] mutator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelegateError {
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    #[error("user already exists: {0}")]
    UserExists(UserId),
    #[error("role {role} already held by {user}")]
    RoleAlreadyHeld { user: UserId, role: Role },
    #[error("institute not found: {0}")]
    InstituteNotFound(InstituteId),
    #[error("institute already exists: {0}")]
    InstituteExists(InstituteId),
    #[error("OC centre not found: {0}")]
    OcNotFound(OcId),
    #[error("OC centre already exists: {0}")]
    OcExists(OcId),
    #[error("NC centre not found: {0}")]
    NcNotFound(NcId),
    #[error("NC centre already exists: {0}")]
    NcExists(NcId),
    #[error("workshop not found: {0}")]
    WorkshopNotFound(WorkshopId),
    #[error("workshop already exists: {0}")]
    WorkshopExists(WorkshopId),
    #[error("artefact {artefact} not attached to workshop {workshop}")]
    ArtefactNotFound {
        workshop: WorkshopId,
        artefact: ArtefactId,
    },
    #[error("artefact {artefact} already attached to workshop {workshop}")]
    ArtefactExists {
        workshop: WorkshopId,
        artefact: ArtefactId,
    },
    #[error("illegal workshop transition: {0}")]
    IllegalTransition(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Why an operation was not carried out.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("operation not found: {0}")]
    NotFound(String),

    #[error("expected {expected} arguments, got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("argument `{argument}` is not a valid {expected}")]
    Type { argument: String, expected: String },

    #[error("not authorized: {0}")]
    Auth(String),

    #[error("rejected by current state: {0}")]
    State(String),

    #[error("action failed: {0}")]
    Fatal(#[from] DelegateError),
}

impl OperationError {
    pub fn auth(message: impl Into<String>) -> Self {
        OperationError::Auth(message.into())
    }

    pub fn state(message: impl Into<String>) -> Self {
        OperationError::State(message.into())
    }

    pub fn type_mismatch(argument: &str, expected: &str) -> Self {
        OperationError::Type {
            argument: argument.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            OperationError::NotFound(_) => ErrorKind::NotFound,
            OperationError::Arity { .. } => ErrorKind::Arity,
            OperationError::Type { .. } => ErrorKind::Type,
            OperationError::Auth(_) => ErrorKind::Auth,
            OperationError::State(_) => ErrorKind::State,
            OperationError::Fatal(_) => ErrorKind::Fatal,
        }
    }

    /// True for the four validation kinds, which guarantee no state change.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Arity | ErrorKind::Type | ErrorKind::Auth | ErrorKind::State
        )
    }
}

/// Classification of [`OperationError`], used by adapters and scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Arity,
    Type,
    Auth,
    State,
    Fatal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Arity => "arity",
            ErrorKind::Type => "type",
            ErrorKind::Auth => "auth",
            ErrorKind::State => "state",
            ErrorKind::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::NotFound,
        ErrorKind::Arity,
        ErrorKind::Type,
        ErrorKind::Auth,
        ErrorKind::State,
        ErrorKind::Fatal,
    ];
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| format!("unknown error kind: {s}"))
    }
}

pub type OperationResult<T> = Result<T, OperationError>;
