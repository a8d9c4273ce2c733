// login / logout

use tracing::info;

use crate::dispatch::{ArgType, Args, Operation, Outcome, PortalView, PortalViewMut};
use crate::errors::{OperationError, OperationResult};
use crate::model::Session;

/// Start a session for a user under one of the roles they hold.
pub struct Login;

impl Operation for Login {
    fn name(&self) -> &'static str {
        "login"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[("user", ArgType::User), ("role", ArgType::Role)]
    }

    fn check_auth(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        let user = args.user("user")?;
        let role = args.role("role")?;

        let session = Session::new(user.id.clone(), role.clone());
        if view.sessions.contains(&session) {
            return Err(OperationError::auth(format!("{session} is already logged in")));
        }

        let stored = view.delegate.user(&user.id);
        let holds = stored.as_ref().unwrap_or(user).holds(role);
        if !holds {
            return Err(OperationError::auth(format!(
                "user {} does not hold role {role}",
                user.id
            )));
        }
        Ok(())
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        let user = args.user("user")?;
        if !view.delegate.user_exists(&user.id) {
            return Err(OperationError::state(format!("user {} does not exist", user.id)));
        }
        Ok(())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let session = Session::new(args.user("user")?.id.clone(), args.role("role")?.clone());
        view.sessions.register(session.clone());
        info!(session = %session, "Logged in");
        Ok(Outcome::Session(session))
    }
}

/// End an active session.
pub struct Logout;

impl Operation for Logout {
    fn name(&self) -> &'static str {
        "logout"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[("session", ArgType::Session)]
    }

    fn check_auth(&self, _view: &PortalView<'_>, _args: &Args) -> OperationResult<()> {
        Ok(())
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        view.require_registered(args.session("session")?)
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let session = args.session("session")?;
        view.sessions.remove(session);
        info!(session = %session, "Logged out");
        Ok(Outcome::Unit)
    }
}
