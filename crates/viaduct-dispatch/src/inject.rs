//! Type-keyed dependency map for controller construction.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// A type-keyed map of shared dependencies.
///
/// Populated at boot, handed by reference to controller factories so a
/// controller can pull whatever collaborators it was built to need (a
/// connection pool, a clock, a config handle) without ambient globals.
#[derive(Default)]
pub struct Injector {
    values: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Injector {
    /// Creates an empty injector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provides a dependency. One value per type; later calls overwrite.
    pub fn provide<T: Send + Sync + 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Resolves a dependency by type.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.values
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("entries", &self.values.len())
            .finish()
    }
}
