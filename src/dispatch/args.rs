//! Keyword arguments passed to operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::predicates;
use crate::errors::{OperationError, OperationResult};
use crate::model::{
    Artefact, Institute, NcCentre, OcCentre, Role, Session, User, Workshop, WorkshopTarget,
};

/// One argument value. Entity arguments carry a record; operations resolve
/// the stored copy by id before deciding anything from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ArgValue {
    User(User),
    Role(Role),
    Session(Session),
    Institute(Institute),
    Oc(OcCentre),
    Nc(NcCentre),
    Workshop(Workshop),
    Artefact(Artefact),
    Text(String),
    Date(NaiveDate),
    Target(WorkshopTarget),
}

macro_rules! arg_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for ArgValue {
            fn from(value: $ty) -> Self {
                ArgValue::$variant(value)
            }
        })*
    };
}

arg_from! {
    User => User,
    Role => Role,
    Session => Session,
    Institute => Institute,
    OcCentre => Oc,
    NcCentre => Nc,
    Workshop => Workshop,
    Artefact => Artefact,
    String => Text,
    NaiveDate => Date,
    WorkshopTarget => Target,
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

/// The predicate an argument slot is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgType {
    User,
    Role,
    Session,
    Institute,
    Oc,
    Nc,
    Workshop,
    Artefact,
    Text,
    Email,
    Date,
    Target,
}

impl ArgType {
    pub fn accepts(self, value: &ArgValue) -> bool {
        match self {
            ArgType::User => predicates::is_user(value),
            ArgType::Role => predicates::is_role(value),
            ArgType::Session => predicates::is_session(value),
            ArgType::Institute => predicates::is_institute(value),
            ArgType::Oc => predicates::is_oc(value),
            ArgType::Nc => predicates::is_nc(value),
            ArgType::Workshop => predicates::is_workshop(value),
            ArgType::Artefact => predicates::is_artefact(value),
            ArgType::Text => predicates::is_text(value),
            ArgType::Email => predicates::is_email(value),
            ArgType::Date => predicates::is_date(value),
            ArgType::Target => predicates::is_target(value),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArgType::User => "user",
            ArgType::Role => "role",
            ArgType::Session => "session",
            ArgType::Institute => "institute",
            ArgType::Oc => "OC centre",
            ArgType::Nc => "NC centre",
            ArgType::Workshop => "workshop",
            ArgType::Artefact => "artefact",
            ArgType::Text => "text",
            ArgType::Email => "email",
            ArgType::Date => "date",
            ArgType::Target => "target",
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named arguments for one operation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args(BTreeMap<String, ArgValue>);

macro_rules! required_accessor {
    ($(#[$meta:meta])* $fn_name:ident, $variant:ident, $ty:ty, $expected:expr) => {
        $(#[$meta])*
        pub fn $fn_name(&self, name: &str) -> OperationResult<&$ty> {
            match self.0.get(name) {
                Some(ArgValue::$variant(value)) => Ok(value),
                _ => Err(OperationError::type_mismatch(name, $expected)),
            }
        }
    };
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<ArgValue>) -> Option<ArgValue> {
        self.0.insert(name.to_string(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    required_accessor!(user, User, User, "user");
    required_accessor!(role, Role, Role, "role");
    required_accessor!(session, Session, Session, "session");
    required_accessor!(institute, Institute, Institute, "institute");
    required_accessor!(oc, Oc, OcCentre, "OC centre");
    required_accessor!(workshop, Workshop, Workshop, "workshop");
    required_accessor!(artefact, Artefact, Artefact, "artefact");
    required_accessor!(date, Date, NaiveDate, "date");
    required_accessor!(target, Target, WorkshopTarget, "target");

    /// Optional free-text field. Absent means "keep the current value".
    pub fn optional_text(&self, name: &str) -> OperationResult<Option<&str>> {
        match self.0.get(name) {
            None => Ok(None),
            Some(ArgValue::Text(text)) if !text.trim().is_empty() => Ok(Some(text.as_str())),
            Some(_) => Err(OperationError::type_mismatch(name, "text")),
        }
    }

    pub fn optional_email(&self, name: &str) -> OperationResult<Option<&str>> {
        match self.0.get(name) {
            None => Ok(None),
            Some(ArgValue::Text(text)) if predicates::is_email_address(text) => Ok(Some(text.as_str())),
            Some(_) => Err(OperationError::type_mismatch(name, "email")),
        }
    }
}

impl FromIterator<(String, ArgValue)> for Args {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
