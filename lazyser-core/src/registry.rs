//! Component registry (service locator) boundary.

use crate::{component::Component, error::ResolutionError};
use std::sync::Arc;

/// Resolves string identifiers to constructed components.
///
/// The dispatcher never constructs components itself; it hands identifiers
/// from its configuration to a registry. Whether `get` builds a fresh
/// instance or returns a shared one is up to the registry.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `ComponentRegistry`",
    label = "missing `ComponentRegistry` implementation",
    note = "Registries must implement `has` and `get`."
)]
pub trait ComponentRegistry: Send + Sync {
    /// Whether `id` can be resolved. Must not construct anything.
    fn has(&self, id: &str) -> bool;

    /// Resolve `id`, constructing the component if needed.
    fn get(&self, id: &str) -> Result<Component, ResolutionError>;
}

impl<R: ComponentRegistry + ?Sized> ComponentRegistry for Arc<R> {
    fn has(&self, id: &str) -> bool {
        (**self).has(id)
    }

    fn get(&self, id: &str) -> Result<Component, ResolutionError> {
        (**self).get(id)
    }
}

impl<R: ComponentRegistry + ?Sized> ComponentRegistry for Box<R> {
    fn has(&self, id: &str) -> bool {
        (**self).has(id)
    }

    fn get(&self, id: &str) -> Result<Component, ResolutionError> {
        (**self).get(id)
    }
}

impl<R: ComponentRegistry + ?Sized> ComponentRegistry for &R {
    fn has(&self, id: &str) -> bool {
        (**self).has(id)
    }

    fn get(&self, id: &str) -> Result<Component, ResolutionError> {
        (**self).get(id)
    }
}
