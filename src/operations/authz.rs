//! Authorization rules shared by several operations.
//!
//! Coordinators act within the hub/spoke tree: a noc manages OCCs, an OCC
//! manages the NCCs of its spokes, and an NCC manages the workshops of its own
//! centre. Admins manage everyone.

use crate::dispatch::PortalView;
use crate::errors::{OperationError, OperationResult};
use crate::lifecycle::{self, WorkshopEvent};
use crate::model::{NcId, OcId, Role, RoleName, Session, User, Workshop, WorkshopId};

pub fn require_role(session: &Session, allowed: &[RoleName], action: &str) -> OperationResult<()> {
    let role = session.role.name();
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(OperationError::auth(format!("{role} may not {action}")))
    }
}

pub fn forbid_roles(session: &Session, excluded: &[RoleName], action: &str) -> OperationResult<()> {
    let role = session.role.name();
    if excluded.contains(&role) {
        Err(OperationError::auth(format!("{role} may not {action}")))
    } else {
        Ok(())
    }
}

/// Hub of an NC centre, if the centre is stored.
fn hub_of(view: &PortalView<'_>, nc: &NcId) -> Option<OcId> {
    view.delegate.nc(nc).map(|centre| centre.hub)
}

/// Whether the session may delete or update `target`. Decided on the stored
/// copy of the user when there is one.
pub fn authorize_user_management(
    view: &PortalView<'_>,
    session: &Session,
    target: &User,
) -> OperationResult<()> {
    let stored = view.delegate.user(&target.id);
    let roles = stored.as_ref().map_or(&target.roles, |user| &user.roles);

    let allowed = match &session.role {
        Role::Admin => true,
        Role::Occ { centre_oc } => roles.iter().any(|role| {
            role.centre_nc()
                .and_then(|nc| hub_of(view, nc))
                .is_some_and(|hub| &hub == centre_oc)
        }),
        Role::Noc => roles.iter().any(|role| role.name() == RoleName::Occ),
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(OperationError::auth(format!(
            "{} may not manage user {}",
            session.role, target.id
        )))
    }
}

/// The session must be the NCC of the centre that runs the workshop.
pub fn authorize_ncc_owner(
    view: &PortalView<'_>,
    session: &Session,
    workshop: &WorkshopId,
) -> OperationResult<()> {
    let Role::Ncc { centre_nc } = &session.role else {
        return Err(OperationError::auth(format!(
            "{} may not manage workshops",
            session.role
        )));
    };

    let owns = view
        .delegate
        .nc(centre_nc)
        .is_some_and(|nc| nc.runs(workshop));
    if owns {
        Ok(())
    } else {
        Err(OperationError::auth(format!(
            "workshop {workshop} is not run by {centre_nc}"
        )))
    }
}

/// The session must be the OCC of the hub one of whose spokes runs the
/// workshop.
pub fn authorize_supervising_occ(
    view: &PortalView<'_>,
    session: &Session,
    workshop: &WorkshopId,
) -> OperationResult<()> {
    let Role::Occ { centre_oc } = &session.role else {
        return Err(OperationError::auth(format!(
            "{} may not review workshops",
            session.role
        )));
    };

    let supervises = view.delegate.oc(centre_oc).is_some_and(|oc| {
        oc.spokes
            .iter()
            .filter_map(|spoke| view.delegate.nc(spoke))
            .any(|nc| nc.runs(workshop))
    });
    if supervises {
        Ok(())
    } else {
        Err(OperationError::auth(format!(
            "workshop {workshop} is not run by a spoke of {centre_oc}"
        )))
    }
}

/// Common state check for workshop operations: the session is logged in, the
/// workshop is stored and its status allows `event`. Returns the stored copy.
pub fn workshop_ready_for(
    view: &PortalView<'_>,
    session: &Session,
    workshop: &Workshop,
    event: WorkshopEvent,
) -> OperationResult<Workshop> {
    view.require_registered(session)?;
    let stored = view
        .delegate
        .workshop(&workshop.id)
        .ok_or_else(|| OperationError::state(format!("workshop {} does not exist", workshop.id)))?;
    lifecycle::ensure_allowed(stored.status, event)
        .map_err(|err| OperationError::state(err.to_string()))?;
    Ok(stored)
}
