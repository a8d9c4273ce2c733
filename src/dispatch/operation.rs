//! The contract every operation implements.

use serde::Serialize;

use super::args::{ArgType, Args};
use crate::delegate::Delegate;
use crate::errors::{OperationError, OperationResult};
use crate::model::{Institute, NcCentre, OcCentre, Session, User, Workshop};
use crate::sessions::SessionRegistry;

/// Read-only view of portal state handed to auth and state checks.
pub struct PortalView<'a> {
    pub sessions: &'a SessionRegistry,
    pub delegate: &'a dyn Delegate,
}

impl PortalView<'_> {
    pub fn require_registered(&self, session: &Session) -> OperationResult<()> {
        if self.sessions.contains(session) {
            Ok(())
        } else {
            Err(OperationError::state(format!(
                "session {session} is not logged in"
            )))
        }
    }
}

/// Mutable view handed to an operation's action.
pub struct PortalViewMut<'a> {
    pub sessions: &'a mut SessionRegistry,
    pub delegate: &'a mut dyn Delegate,
}

/// Value produced by a successful action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    Unit,
    User(User),
    Session(Session),
    Institute(Institute),
    Oc(OcCentre),
    Nc(NcCentre),
    Workshop(Workshop),
}

impl Outcome {
    pub fn user(self) -> Option<User> {
        match self {
            Outcome::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn session(self) -> Option<Session> {
        match self {
            Outcome::Session(session) => Some(session),
            _ => None,
        }
    }

    pub fn workshop(self) -> Option<Workshop> {
        match self {
            Outcome::Workshop(workshop) => Some(workshop),
            _ => None,
        }
    }
}

/// An operation descriptor. The engine calls the four stages in order and
/// stops at the first failure:
///
/// 1. [`check_args`](Operation::check_args) (skipped when
///    [`arity_and_type_checks_needed`](Operation::arity_and_type_checks_needed)
///    is false)
/// 2. [`check_auth`](Operation::check_auth)
/// 3. [`check_state`](Operation::check_state)
/// 4. [`act`](Operation::act)
///
/// Checks only read state. `act` performs the single mutation.
pub trait Operation: Send + Sync {
    fn name(&self) -> &'static str;

    /// Declared arguments and the predicate each must satisfy.
    fn arg_types(&self) -> &'static [(&'static str, ArgType)];

    /// Update operations accept any subset of their declared arguments and
    /// opt out of arity/type checking.
    fn arity_and_type_checks_needed(&self) -> bool {
        true
    }

    /// Arguments callers may leave out. Informational.
    fn optional_args(&self) -> &'static [&'static str] {
        &[]
    }

    fn check_args(&self, args: &Args) -> OperationResult<()> {
        let declared = self.arg_types();
        if args.len() != declared.len() {
            return Err(OperationError::Arity {
                expected: declared.len(),
                actual: args.len(),
            });
        }

        for (name, value) in args.iter() {
            let Some((_, expected)) = declared.iter().find(|(declared, _)| *declared == name)
            else {
                return Err(OperationError::type_mismatch(name, "declared argument"));
            };
            if !expected.accepts(value) {
                return Err(OperationError::type_mismatch(name, expected.as_str()));
            }
        }
        Ok(())
    }

    fn check_auth(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()>;

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()>;

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome>;

    /// Human-readable call signature, e.g. `AddUser(user: user, session: session)`.
    fn signature(&self) -> String {
        let optional = self.optional_args();
        let params: Vec<String> = self
            .arg_types()
            .iter()
            .map(|(name, ty)| {
                let marker = if optional.contains(name) { "?" } else { "" };
                format!("{name}{marker}: {ty}")
            })
            .collect();
        format!("{}({})", self.name(), params.join(", "))
    }
}
