//! Controllers and their factory registry.
//!
//! Controller actions are named on routes as `{controller, action}` string
//! pairs and resolved here through an explicit name-to-factory registry,
//! not reflection. The optional before/after hooks are narrow capability
//! traits; dispatch checks capability membership, not method existence.

use std::collections::HashMap;
use std::sync::Arc;

use viaduct_router::{PathParams, Request, Response, Result, RouterError};

use crate::inject::Injector;

/// Capability: a controller-level hook run before the action.
///
/// A `Some` return short-circuits the pipeline: the value becomes the
/// response body and the action never runs.
pub trait BeforeHook {
    /// Runs before the action.
    fn before(&mut self, req: &Request, res: &mut Response) -> Result<Option<Vec<u8>>>;
}

/// Capability: a controller-level hook run after the action, for side
/// effects only.
pub trait AfterHook {
    /// Runs after the action.
    fn after(&mut self, req: &Request, res: &mut Response);
}

/// A request controller.
///
/// One instance is constructed per dispatch and serves the hooks and the
/// action together.
pub trait Controller: Send {
    /// Invokes the named action with the captured parameters.
    ///
    /// # Errors
    ///
    /// Implementations return [`RouterError::UnknownAction`] for action
    /// names they do not expose and [`RouterError::MissingParameter`] when
    /// a parameter the action requires was not captured; both are
    /// routing-configuration errors the outer layer surfaces as NotFound.
    fn call(
        &mut self,
        action: &str,
        req: &Request,
        res: &mut Response,
        params: &PathParams,
    ) -> Result<Option<Vec<u8>>>;

    /// Exposes the before-hook capability, if this controller has one.
    fn before_hook(&mut self) -> Option<&mut dyn BeforeHook> {
        None
    }

    /// Exposes the after-hook capability, if this controller has one.
    fn after_hook(&mut self) -> Option<&mut dyn AfterHook> {
        None
    }
}

/// Constructs one controller instance from the boot-time dependency map.
pub type ControllerFactory = Arc<dyn Fn(&Injector) -> Box<dyn Controller> + Send + Sync>;

/// Name → controller factory registry. Populated at boot.
#[derive(Default)]
pub struct Controllers {
    factories: HashMap<String, ControllerFactory>,
}

impl Controllers {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a (namespace-qualified) controller name.
    /// Re-registration overwrites.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Injector) -> Box<dyn Controller> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Constructs a controller by name.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownController`] when no factory is
    /// registered under the name.
    pub fn construct(&self, name: &str, injector: &Injector) -> Result<Box<dyn Controller>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RouterError::UnknownController(name.to_string()))?;
        Ok(factory(injector))
    }
}

impl std::fmt::Debug for Controllers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controllers")
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
