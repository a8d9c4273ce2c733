// Registry of active (user, role) sessions

use std::collections::BTreeSet;

use crate::model::{Session, UserId};

/// The set of sessions currently logged in. A given (user, role) pair is
/// registered at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRegistry {
    sessions: BTreeSet<Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, session: &Session) -> bool {
        self.sessions.contains(session)
    }

    /// Returns false if the session was already registered.
    pub fn register(&mut self, session: Session) -> bool {
        self.sessions.insert(session)
    }

    /// Returns false if the session was not registered.
    pub fn remove(&mut self, session: &Session) -> bool {
        self.sessions.remove(session)
    }

    /// Whether any active session acts as `user`.
    pub fn references_user(&self, user: &UserId) -> bool {
        self.sessions.iter().any(|session| &session.user == user)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    #[test]
    fn same_user_and_role_registers_once() {
        let mut registry = SessionRegistry::new();
        assert!(registry.register(Session::new("asha", Role::Admin)));
        assert!(!registry.register(Session::new("asha", Role::Admin)));
        assert!(registry.register(Session::new("asha", Role::Noc)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn tracks_which_users_are_logged_in() {
        let mut registry = SessionRegistry::new();
        let session = Session::new("ravi", Role::Guest);
        registry.register(session.clone());
        assert!(registry.references_user(&UserId::new("ravi")));
        assert!(!registry.references_user(&UserId::new("asha")));

        assert!(registry.remove(&session));
        assert!(!registry.remove(&session));
        assert!(registry.is_empty());
    }
}
