// Identifier newtypes shared by every entity

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// Identity of a portal user. Stable across name/email updates.
    UserId
);
string_id!(InstituteId);
string_id!(WorkshopId);
string_id!(ArtefactId);

/// Identity of an OC (hub) centre.
///
/// An institute hosts at most one OC, so the centre is keyed by the institute
/// that hosts it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OcId(InstituteId);

impl OcId {
    pub fn for_institute(institute: &InstituteId) -> Self {
        Self(institute.clone())
    }

    pub fn institute(&self) -> &InstituteId {
        &self.0
    }
}

impl fmt::Display for OcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oc:{}", self.0)
    }
}

/// Identity of an NC (spoke) centre, keyed by its host institute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NcId(InstituteId);

impl NcId {
    pub fn for_institute(institute: &InstituteId) -> Self {
        Self(institute.clone())
    }

    pub fn institute(&self) -> &InstituteId {
        &self.0
    }
}

impl fmt::Display for NcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nc:{}", self.0)
    }
}
