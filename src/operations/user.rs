// User management: AddUser, DeleteUser, UpdateUser, AddRole

use tracing::info;

use super::authz::{authorize_user_management, require_role};
use crate::dispatch::{ArgType, Args, Operation, Outcome, PortalView, PortalViewMut};
use crate::errors::{OperationError, OperationResult};
use crate::model::{Role, RoleName, User};

const USER_MANAGERS: &[RoleName] = &[RoleName::Admin, RoleName::Occ, RoleName::Noc];

fn ensure_not_in_session(view: &PortalView<'_>, user: &User) -> OperationResult<()> {
    if view.sessions.references_user(&user.id) {
        Err(OperationError::state(format!(
            "user {} has an active session",
            user.id
        )))
    } else {
        Ok(())
    }
}

/// Whether a session acting as `grantor` may hand out `role`.
///
/// Admins grant any catalogued role, a noc grants OCC roles of existing hubs
/// and an OCC grants NCC roles of its own spokes.
fn may_grant(view: &PortalView<'_>, grantor: &Role, role: &Role) -> bool {
    match grantor {
        Role::Admin => view.delegate.role_exists(role),
        Role::Noc => role.name() == RoleName::Occ && view.delegate.role_exists(role),
        Role::Occ { centre_oc } => role
            .centre_nc()
            .and_then(|nc| view.delegate.nc(nc))
            .is_some_and(|nc| &nc.hub == centre_oc),
        _ => false,
    }
}

pub struct AddUser;

impl Operation for AddUser {
    fn name(&self) -> &'static str {
        "AddUser"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[("user", ArgType::User), ("session", ArgType::Session)]
    }

    fn check_auth(&self, _view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        require_role(args.session("session")?, USER_MANAGERS, "add users")
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        let session = args.session("session")?;
        view.require_registered(session)?;
        let user = args.user("user")?;
        if view.delegate.user_exists(&user.id) {
            return Err(OperationError::state(format!("user {} already exists", user.id)));
        }
        if view.delegate.email_set().contains(&user.email) {
            return Err(OperationError::state(format!(
                "email {} is already in use",
                user.email
            )));
        }
        for (index, role) in user.roles.iter().enumerate() {
            if user.roles[..index].contains(role) {
                return Err(OperationError::state(format!(
                    "user {} lists role {role} twice",
                    user.id
                )));
            }
            if !may_grant(view, &session.role, role) {
                return Err(OperationError::state(format!(
                    "{} cannot grant role {role}",
                    session.role
                )));
            }
        }
        Ok(())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let user = view.delegate.add_user(args.user("user")?.clone())?;
        info!(user = %user.id, "User added");
        Ok(Outcome::User(user))
    }
}

pub struct DeleteUser;

impl Operation for DeleteUser {
    fn name(&self) -> &'static str {
        "DeleteUser"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[("user", ArgType::User), ("session", ArgType::Session)]
    }

    fn check_auth(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        authorize_user_management(view, args.session("session")?, args.user("user")?)
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        let user = args.user("user")?;
        ensure_not_in_session(view, user)?;
        view.require_registered(args.session("session")?)?;
        let active = view
            .delegate
            .get_active_users()
            .iter()
            .any(|candidate| candidate.id == user.id);
        if !active {
            return Err(OperationError::state(format!("user {} does not exist", user.id)));
        }
        Ok(())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let user = view.delegate.delete_user(&args.user("user")?.id)?;
        info!(user = %user.id, "User deleted");
        Ok(Outcome::User(user))
    }
}

/// Change a user's name and/or email. Omitted fields keep their value.
pub struct UpdateUser;

impl Operation for UpdateUser {
    fn name(&self) -> &'static str {
        "UpdateUser"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[
            ("name", ArgType::Text),
            ("email", ArgType::Email),
            ("user", ArgType::User),
            ("session", ArgType::Session),
        ]
    }

    fn arity_and_type_checks_needed(&self) -> bool {
        false
    }

    fn optional_args(&self) -> &'static [&'static str] {
        &["name", "email"]
    }

    fn check_auth(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        authorize_user_management(view, args.session("session")?, args.user("user")?)
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        let user = args.user("user")?;
        ensure_not_in_session(view, user)?;
        view.require_registered(args.session("session")?)?;

        let stored = view
            .delegate
            .user(&user.id)
            .ok_or_else(|| OperationError::state(format!("user {} does not exist", user.id)))?;

        args.optional_text("name")?;
        if let Some(email) = args.optional_email("email")? {
            if email != stored.email && view.delegate.email_set().contains(email) {
                return Err(OperationError::state(format!("email {email} is already in use")));
            }
        }
        Ok(())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let user = args.user("user")?;
        let stored = view.delegate.user(&user.id).unwrap_or_else(|| user.clone());

        let name = args.optional_text("name")?.map_or(stored.name, str::to_string);
        let email = args.optional_email("email")?.map_or(stored.email, str::to_string);

        let updated = view.delegate.update_user(name, email, &user.id)?;
        info!(user = %updated.id, "User updated");
        Ok(Outcome::User(updated))
    }
}

/// Grant a role to an existing user.
pub struct AddRole;

impl Operation for AddRole {
    fn name(&self) -> &'static str {
        "AddRole"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[
            ("user", ArgType::User),
            ("role", ArgType::Role),
            ("session", ArgType::Session),
        ]
    }

    fn check_auth(&self, _view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        require_role(args.session("session")?, USER_MANAGERS, "assign roles")
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        let session = args.session("session")?;
        let role = args.role("role")?;
        let user = args.user("user")?;
        view.require_registered(session)?;

        if !may_grant(view, &session.role, role) {
            return Err(OperationError::state(format!(
                "{} cannot grant role {role}",
                session.role
            )));
        }

        let stored = view
            .delegate
            .user(&user.id)
            .ok_or_else(|| OperationError::state(format!("user {} does not exist", user.id)))?;
        if stored.holds(role) {
            return Err(OperationError::state(format!(
                "user {} already holds role {role}",
                user.id
            )));
        }
        Ok(())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let role = args.role("role")?.clone();
        info!(user = %args.user("user")?.id, role = %role, "Granting role");
        let user = view.delegate.add_role_to_user(&args.user("user")?.id, role)?;
        Ok(Outcome::User(user))
    }
}
