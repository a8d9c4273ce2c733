//! Predicate library used by the type-check stage.
//!
//! Each predicate answers whether a value has the shape an argument slot
//! expects. They never consult the delegate: existence and ownership are
//! questions for the auth and state stages.

use regex::Regex;
use std::sync::LazyLock;

use super::args::ArgValue;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

pub fn is_email_address(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text)
}

pub fn is_user(value: &ArgValue) -> bool {
    match value {
        ArgValue::User(user) => {
            !is_blank(user.id.as_str()) && !is_blank(&user.name) && is_email_address(&user.email)
        }
        _ => false,
    }
}

pub fn is_role(value: &ArgValue) -> bool {
    matches!(value, ArgValue::Role(_))
}

pub fn is_session(value: &ArgValue) -> bool {
    matches!(value, ArgValue::Session(session) if !is_blank(session.user.as_str()))
}

pub fn is_institute(value: &ArgValue) -> bool {
    match value {
        ArgValue::Institute(institute) => {
            !is_blank(institute.id.as_str()) && !is_blank(&institute.name)
        }
        _ => false,
    }
}

pub fn is_oc(value: &ArgValue) -> bool {
    matches!(value, ArgValue::Oc(oc) if oc.id.institute() == &oc.institute)
}

pub fn is_nc(value: &ArgValue) -> bool {
    matches!(value, ArgValue::Nc(nc) if nc.id.institute() == &nc.institute)
}

pub fn is_workshop(value: &ArgValue) -> bool {
    match value {
        ArgValue::Workshop(workshop) => {
            !is_blank(workshop.id.as_str()) && !is_blank(&workshop.name)
        }
        _ => false,
    }
}

pub fn is_artefact(value: &ArgValue) -> bool {
    match value {
        ArgValue::Artefact(artefact) => {
            !is_blank(artefact.id.as_str()) && !is_blank(&artefact.location)
        }
        _ => false,
    }
}

pub fn is_text(value: &ArgValue) -> bool {
    matches!(value, ArgValue::Text(text) if !is_blank(text))
}

pub fn is_email(value: &ArgValue) -> bool {
    matches!(value, ArgValue::Text(text) if is_email_address(text))
}

pub fn is_date(value: &ArgValue) -> bool {
    matches!(value, ArgValue::Date(_))
}

pub fn is_target(value: &ArgValue) -> bool {
    matches!(value, ArgValue::Target(_))
}
