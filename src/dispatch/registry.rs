// Operation registry: name -> descriptor

use std::collections::BTreeMap;

use super::operation::Operation;
use crate::operations::{institute, session, user, workshop};

#[derive(Default)]
pub struct OperationRegistry {
    operations: BTreeMap<&'static str, Box<dyn Operation>>,
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.operations.keys()).finish()
    }
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every portal operation.
    pub fn standard() -> Self {
        let mut registry = Self::new();

        registry.register(session::Login);
        registry.register(session::Logout);

        registry.register(user::AddUser);
        registry.register(user::DeleteUser);
        registry.register(user::UpdateUser);
        registry.register(user::AddRole);

        registry.register(institute::AddInstitute);
        registry.register(institute::UpdateInstitute);
        registry.register(institute::AddOc);
        registry.register(institute::AddNc);

        registry.register(workshop::CreateWorkshop);
        registry.register(workshop::CancelWorkshop);
        registry.register(workshop::ConductWorkshop);
        registry.register(workshop::ApproveWorkshop);
        registry.register(workshop::RejectWorkshop);
        registry.register(workshop::RescheduleWorkshop);
        registry.register(workshop::UploadArtefact);
        registry.register(workshop::DeleteArtefact);

        registry
    }

    /// Adds or replaces an operation, returning the one it replaced.
    pub fn register(&mut self, operation: impl Operation + 'static) -> Option<Box<dyn Operation>> {
        self.operations.insert(operation.name(), Box::new(operation))
    }

    pub fn get(&self, name: &str) -> Option<&dyn Operation> {
        self.operations.get(name).map(|operation| operation.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.operations.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Operation> {
        self.operations.values().map(|operation| operation.as_ref())
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
