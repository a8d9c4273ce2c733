// Users, the roles they hold, and the sessions they act through

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{NcId, OcId, UserId};

/// Payload-free tag of a [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoleName {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "OCC")]
    Occ,
    #[serde(rename = "NCC")]
    Ncc,
    #[serde(rename = "reviewer")]
    Reviewer,
    #[serde(rename = "guest")]
    Guest,
    #[serde(rename = "noc")]
    Noc,
}

impl RoleName {
    pub fn as_str(self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Occ => "OCC",
            RoleName::Ncc => "NCC",
            RoleName::Reviewer => "reviewer",
            RoleName::Guest => "guest",
            RoleName::Noc => "noc",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role a user may hold. Coordinator roles are bound to the centre they
/// coordinate; two roles are the same role only if name and centre agree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "OCC")]
    Occ { centre_oc: OcId },
    #[serde(rename = "NCC")]
    Ncc { centre_nc: NcId },
    #[serde(rename = "reviewer")]
    Reviewer,
    #[serde(rename = "guest")]
    Guest,
    #[serde(rename = "noc")]
    Noc,
}

impl Role {
    pub fn name(&self) -> RoleName {
        match self {
            Role::Admin => RoleName::Admin,
            Role::Occ { .. } => RoleName::Occ,
            Role::Ncc { .. } => RoleName::Ncc,
            Role::Reviewer => RoleName::Reviewer,
            Role::Guest => RoleName::Guest,
            Role::Noc => RoleName::Noc,
        }
    }

    pub fn centre_oc(&self) -> Option<&OcId> {
        match self {
            Role::Occ { centre_oc } => Some(centre_oc),
            _ => None,
        }
    }

    pub fn centre_nc(&self) -> Option<&NcId> {
        match self {
            Role::Ncc { centre_nc } => Some(centre_nc),
            _ => None,
        }
    }

    /// Roles that exist without any centre being created first.
    pub fn base_roles() -> [Role; 4] {
        [Role::Admin, Role::Noc, Role::Reviewer, Role::Guest]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Occ { centre_oc } => write!(f, "OCC({centre_oc})"),
            Role::Ncc { centre_nc } => write!(f, "NCC({centre_nc})"),
            other => f.write_str(other.name().as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    pub fn holds(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}

/// An acting identity: one user logged in under one of their roles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Session {
    pub user: UserId,
    pub role: Role,
}

impl Session {
    pub fn new(user: impl Into<UserId>, role: Role) -> Self {
        Self {
            user: user.into(),
            role,
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} as {}", self.user, self.role)
    }
}
