// Institutes and the OC/NC centres they host

use tracing::info;

use super::authz::{forbid_roles, require_role};
use crate::dispatch::{ArgType, Args, Operation, Outcome, PortalView, PortalViewMut};
use crate::errors::{OperationError, OperationResult};
use crate::model::{Institute, Role, RoleName};

const NOT_INSTITUTE_EDITORS: &[RoleName] = &[RoleName::Guest, RoleName::Reviewer];

fn require_institute(view: &PortalView<'_>, institute: &Institute) -> OperationResult<Institute> {
    view.delegate
        .institute(&institute.id)
        .ok_or_else(|| OperationError::state(format!("institute {} does not exist", institute.id)))
}

pub struct AddInstitute;

impl Operation for AddInstitute {
    fn name(&self) -> &'static str {
        "AddInstitute"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[("institute", ArgType::Institute), ("session", ArgType::Session)]
    }

    fn check_auth(&self, _view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        forbid_roles(args.session("session")?, NOT_INSTITUTE_EDITORS, "add institutes")
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        view.require_registered(args.session("session")?)?;
        let institute = args.institute("institute")?;
        if view.delegate.institute_exists(&institute.id) {
            return Err(OperationError::state(format!(
                "institute {} already exists",
                institute.id
            )));
        }
        Ok(())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let institute = view
            .delegate
            .add_institute(args.institute("institute")?.clone())?;
        info!(institute = %institute.id, "Institute added");
        Ok(Outcome::Institute(institute))
    }
}

/// Change an institute's name and/or address. Omitted fields keep their value.
pub struct UpdateInstitute;

impl Operation for UpdateInstitute {
    fn name(&self) -> &'static str {
        "UpdateInstitute"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[
            ("name", ArgType::Text),
            ("address", ArgType::Text),
            ("institute", ArgType::Institute),
            ("session", ArgType::Session),
        ]
    }

    fn arity_and_type_checks_needed(&self) -> bool {
        false
    }

    fn optional_args(&self) -> &'static [&'static str] {
        &["name", "address"]
    }

    fn check_auth(&self, _view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        forbid_roles(args.session("session")?, NOT_INSTITUTE_EDITORS, "update institutes")
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        view.require_registered(args.session("session")?)?;
        require_institute(view, args.institute("institute")?)?;
        args.optional_text("name")?;
        args.optional_text("address")?;
        Ok(())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let institute = args.institute("institute")?;
        let stored = view
            .delegate
            .institute(&institute.id)
            .unwrap_or_else(|| institute.clone());

        let name = args.optional_text("name")?.map_or(stored.name, str::to_string);
        let address = args
            .optional_text("address")?
            .map_or(stored.address, str::to_string);

        let updated = view.delegate.update_institute(name, address, &institute.id)?;
        info!(institute = %updated.id, "Institute updated");
        Ok(Outcome::Institute(updated))
    }
}

/// Make an institute a hub.
pub struct AddOc;

impl Operation for AddOc {
    fn name(&self) -> &'static str {
        "AddOC"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[("institute", ArgType::Institute), ("session", ArgType::Session)]
    }

    fn check_auth(&self, _view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        require_role(
            args.session("session")?,
            &[RoleName::Admin, RoleName::Noc],
            "create OC centres",
        )
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        view.require_registered(args.session("session")?)?;
        let institute = require_institute(view, args.institute("institute")?)?;
        if view
            .delegate
            .get_ocs()
            .iter()
            .any(|oc| oc.institute == institute.id)
        {
            return Err(OperationError::state(format!(
                "institute {} already hosts an OC centre",
                institute.id
            )));
        }
        Ok(())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let oc = view.delegate.add_oc(&args.institute("institute")?.id)?;
        info!(oc = %oc.id, "OC centre created");
        Ok(Outcome::Oc(oc))
    }
}

/// Make an institute a spoke of `hub`.
pub struct AddNc;

impl Operation for AddNc {
    fn name(&self) -> &'static str {
        "AddNC"
    }

    fn arg_types(&self) -> &'static [(&'static str, ArgType)] {
        &[
            ("institute", ArgType::Institute),
            ("hub", ArgType::Oc),
            ("session", ArgType::Session),
        ]
    }

    fn check_auth(&self, _view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        let session = args.session("session")?;
        require_role(session, &[RoleName::Admin, RoleName::Occ], "create NC centres")?;

        let hub = args.oc("hub")?;
        match &session.role {
            Role::Occ { centre_oc } if centre_oc != &hub.id => Err(OperationError::auth(format!(
                "{} may not add spokes to {}",
                session.role, hub.id
            ))),
            _ => Ok(()),
        }
    }

    fn check_state(&self, view: &PortalView<'_>, args: &Args) -> OperationResult<()> {
        view.require_registered(args.session("session")?)?;
        let institute = require_institute(view, args.institute("institute")?)?;
        if view
            .delegate
            .get_ncs()
            .iter()
            .any(|nc| nc.institute == institute.id)
        {
            return Err(OperationError::state(format!(
                "institute {} already hosts an NC centre",
                institute.id
            )));
        }

        let hub = args.oc("hub")?;
        if view.delegate.oc(&hub.id).is_none() {
            return Err(OperationError::state(format!("OC centre {} does not exist", hub.id)));
        }
        Ok(())
    }

    fn act(&self, view: &mut PortalViewMut<'_>, args: &Args) -> OperationResult<Outcome> {
        let hub = &args.oc("hub")?.id;
        let nc = view
            .delegate
            .add_nc(&args.institute("institute")?.id, hub)?;
        info!(nc = %nc.id, hub = %hub, "NC centre created");
        Ok(Outcome::Nc(nc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::{Delegate, InMemoryDelegate};
    use crate::dispatch::Portal;
    use crate::errors::ErrorKind;
    use crate::model::{InstituteId, OcCentre, Session, User};

    fn portal_as(role: Role) -> (Portal, Session) {
        let mut store = InMemoryDelegate::new();
        store
            .add_user(User::new("u", "Someone", "u@lab.example").with_role(role.clone()))
            .unwrap();
        store
            .add_institute(Institute::new("hub", "Hub Institute", "Hyderabad"))
            .unwrap();
        store
            .add_institute(Institute::new("spoke", "Spoke College", "Warangal"))
            .unwrap();
        let mut portal = Portal::init(store);
        let session = Session::new("u", role);
        let login = Args::new()
            .with("user", User::new("u", "Someone", "u@lab.example"))
            .with("role", session.role.clone());
        portal.execute("login", &login).unwrap();
        (portal, session)
    }

    fn hub_institute() -> Institute {
        Institute::new("hub", "Hub Institute", "Hyderabad")
    }

    fn spoke_institute() -> Institute {
        Institute::new("spoke", "Spoke College", "Warangal")
    }

    #[test]
    fn reviewers_cannot_add_institutes() {
        let (mut portal, session) = portal_as(Role::Reviewer);
        let args = Args::new()
            .with("institute", Institute::new("new", "New", "Pune"))
            .with("session", session);
        assert_eq!(
            portal.execute("AddInstitute", &args).unwrap_err().kind(),
            ErrorKind::Auth
        );
    }

    #[test]
    fn existing_institute_cannot_be_added_again() {
        let (mut portal, session) = portal_as(Role::Noc);
        let args = Args::new()
            .with("institute", hub_institute())
            .with("session", session);
        assert_eq!(
            portal.execute("AddInstitute", &args).unwrap_err().kind(),
            ErrorKind::State
        );
    }

    #[test]
    fn update_institute_keeps_omitted_fields() {
        let (mut portal, session) = portal_as(Role::Admin);
        let args = Args::new()
            .with("address", "Secunderabad")
            .with("institute", hub_institute())
            .with("session", session);
        let Outcome::Institute(updated) = portal.execute("UpdateInstitute", &args).unwrap() else {
            panic!("expected an institute");
        };
        assert_eq!(updated.name, "Hub Institute");
        assert_eq!(updated.address, "Secunderabad");
    }

    #[test]
    fn one_oc_per_institute() {
        let (mut portal, session) = portal_as(Role::Noc);
        let args = Args::new()
            .with("institute", hub_institute())
            .with("session", session);
        let Outcome::Oc(oc) = portal.execute("AddOC", &args).unwrap() else {
            panic!("expected an OC centre");
        };
        assert_eq!(oc.institute, InstituteId::new("hub"));
        assert_eq!(
            portal.execute("AddOC", &args).unwrap_err().kind(),
            ErrorKind::State
        );
    }

    #[test]
    fn occ_only_adds_spokes_to_its_own_hub() {
        let hub = OcCentre::new(InstituteId::new("hub"));
        let (mut portal, session) = portal_as(Role::Occ {
            centre_oc: hub.id.clone(),
        });
        portal.delegate_mut().add_oc(&hub.institute).unwrap();

        let elsewhere = OcCentre::new(InstituteId::new("spoke"));
        let args = Args::new()
            .with("institute", spoke_institute())
            .with("hub", elsewhere)
            .with("session", session.clone());
        assert_eq!(
            portal.execute("AddNC", &args).unwrap_err().kind(),
            ErrorKind::Auth
        );

        let args = Args::new()
            .with("institute", spoke_institute())
            .with("hub", hub.clone())
            .with("session", session);
        let Outcome::Nc(nc) = portal.execute("AddNC", &args).unwrap() else {
            panic!("expected an NC centre");
        };
        assert_eq!(nc.hub, hub.id);
        assert!(portal.delegate().oc(&hub.id).unwrap().supervises(&nc.id));
        assert_eq!(
            portal.execute("AddNC", &args).unwrap_err().kind(),
            ErrorKind::State
        );
    }

    #[test]
    fn nc_needs_a_stored_hub() {
        let (mut portal, session) = portal_as(Role::Admin);
        let args = Args::new()
            .with("institute", spoke_institute())
            .with("hub", OcCentre::new(InstituteId::new("hub")))
            .with("session", session);
        assert_eq!(
            portal.execute("AddNC", &args).unwrap_err().kind(),
            ErrorKind::State
        );
    }
}
