//! The invocation surface: look up an operation, run its checks in order,
//! then its action.

use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::args::Args;
use super::operation::{Operation, Outcome, PortalView, PortalViewMut};
use super::registry::OperationRegistry;
use crate::config::PortalConfig;
use crate::delegate::{Delegate, InMemoryDelegate};
use crate::errors::{OperationError, OperationResult};
use crate::model::{Role, User};
use crate::sessions::SessionRegistry;
use crate::telemetry::{create_operation_span, generate_correlation_id};

/// Description of a registered operation, for adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationInfo {
    pub name: &'static str,
    pub signature: String,
    pub checks_arguments: bool,
}

/// One running portal: the operation registry, the active sessions and the
/// delegate store. All state changes go through [`Portal::execute`].
pub struct Portal<D: Delegate = InMemoryDelegate> {
    registry: OperationRegistry,
    sessions: SessionRegistry,
    delegate: D,
}

impl<D: Delegate> Portal<D> {
    /// Portal with the standard operations and no active sessions.
    pub fn init(delegate: D) -> Self {
        Self::with_registry(delegate, OperationRegistry::standard())
    }

    pub fn with_registry(delegate: D, registry: OperationRegistry) -> Self {
        Self {
            registry,
            sessions: SessionRegistry::new(),
            delegate,
        }
    }

    /// Drop every session and hand the store back.
    pub fn teardown(self) -> D {
        debug!(sessions = self.sessions.len(), "Portal torn down");
        self.delegate
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// Direct store access for seeding. Bypasses every check.
    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn operations(&self) -> Vec<OperationInfo> {
        self.registry
            .iter()
            .map(|operation| OperationInfo {
                name: operation.name(),
                signature: operation.signature(),
                checks_arguments: operation.arity_and_type_checks_needed(),
            })
            .collect()
    }

    /// Run `name` with `args`. Returns the action's outcome or the error of
    /// the first stage that failed.
    pub fn execute(&mut self, name: &str, args: &Args) -> OperationResult<Outcome> {
        let correlation_id = generate_correlation_id();
        let span = create_operation_span(name, &correlation_id);
        let _guard = span.enter();

        let Some(operation) = self.registry.get(name) else {
            warn!("Unknown operation");
            return Err(OperationError::NotFound(name.to_string()));
        };

        let result = run_pipeline(operation, &mut self.sessions, &mut self.delegate, args);
        match &result {
            Ok(_) => info!(sessions = self.sessions.len(), "Operation succeeded"),
            Err(err @ OperationError::Fatal(_)) => {
                error!(kind = %err.kind(), error = %err, "Operation action failed")
            }
            Err(err) => warn!(kind = %err.kind(), error = %err, "Operation rejected"),
        }
        result
    }
}

impl Portal<InMemoryDelegate> {
    /// In-memory portal set up from configuration, with the bootstrap
    /// administrator already stored.
    pub fn from_config(config: &PortalConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let mut delegate = InMemoryDelegate::new()
            .with_conduct_status(config.workshops.conduct_status)
            .context("Invalid workshop configuration")?;

        let bootstrap = &config.bootstrap;
        let admin = User::new(
            bootstrap.admin_id.as_str(),
            bootstrap.admin_name.as_str(),
            bootstrap.admin_email.as_str(),
        )
        .with_role(Role::Admin);
        delegate
            .add_user(admin)
            .context("Failed to seed bootstrap administrator")?;

        info!(
            admin = %bootstrap.admin_id,
            conduct_status = %config.workshops.conduct_status,
            "Portal initialized from configuration"
        );
        Ok(Self::init(delegate))
    }
}

fn run_pipeline(
    operation: &dyn Operation,
    sessions: &mut SessionRegistry,
    delegate: &mut dyn Delegate,
    args: &Args,
) -> OperationResult<Outcome> {
    if operation.arity_and_type_checks_needed() {
        debug!("Checking arity and types");
        operation.check_args(args)?;
    } else {
        debug!("Arity and type checks not needed");
    }

    {
        let view = PortalView {
            sessions: &*sessions,
            delegate: &*delegate,
        };
        debug!("Checking authorization");
        operation.check_auth(&view, args)?;
        debug!("Checking state");
        operation.check_state(&view, args)?;
    }

    debug!("Running action");
    let mut view = PortalViewMut { sessions, delegate };
    operation.act(&mut view, args)
}

/// A [`Portal`] shared between tasks. Each call holds the lock for the whole
/// pipeline, so no other call can change state between a check and the
/// action it guards.
pub struct SharedPortal<D: Delegate = InMemoryDelegate> {
    inner: Arc<Mutex<Portal<D>>>,
}

impl<D: Delegate> Clone for SharedPortal<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Delegate> SharedPortal<D> {
    pub fn new(portal: Portal<D>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(portal)),
        }
    }

    pub async fn execute(&self, name: &str, args: &Args) -> OperationResult<Outcome> {
        let mut portal = self.inner.lock().await;
        portal.execute(name, args)
    }

    /// Exclusive access, e.g. to inspect the store between calls.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Portal<D>> {
        self.inner.lock().await
    }
}
