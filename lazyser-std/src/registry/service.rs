//! Factory-backed service registry.

use lazyser_core::{BoxError, Component, ComponentRegistry, Encoder, Normalizer, ResolutionError};
use std::{collections::HashMap, sync::OnceLock};

type Factory = Box<dyn Fn() -> Result<Component, BoxError> + Send + Sync>;

/// How often a service's factory runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Built on first `get`, then reused.
    Shared,
    /// Built on every `get`.
    Prototype,
}

struct Service {
    factory: Factory,
    scope: Scope,
    instance: OnceLock<Component>,
}

impl Service {
    fn new(factory: Factory, scope: Scope) -> Self {
        Self {
            factory,
            scope,
            instance: OnceLock::new(),
        }
    }

    fn resolve(&self, id: &str) -> Result<Component, ResolutionError> {
        if let Some(instance) = self.instance.get() {
            return Ok(instance.clone());
        }

        let built = (self.factory)().map_err(|source| ResolutionError::Construction {
            id: id.to_string(),
            source,
        })?;

        match self.scope {
            Scope::Prototype => Ok(built),
            // A concurrent first `get` may build twice; only one instance is published.
            Scope::Shared => Ok(self.instance.get_or_init(|| built).clone()),
        }
    }
}

/// An immutable identifier → component registry.
///
/// Created by calling [`ServiceRegistryBuilder::build`]. `has` only checks
/// that a factory exists; nothing is constructed until `get`.
///
/// # Example
/// ```ignore
/// let registry = ServiceRegistry::builder()
///     .encoder("svc.json_encoder", JsonEncoder::new)
///     .normalizer("svc.user_normalizer", SerdeNormalizer::<User>::new)
///     .build();
/// ```
pub struct ServiceRegistry {
    services: HashMap<String, Service>,
}

impl ServiceRegistry {
    /// Start building a registry.
    pub fn builder() -> ServiceRegistryBuilder {
        ServiceRegistryBuilder::new()
    }

    /// Registered identifiers, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Get the number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ComponentRegistry for ServiceRegistry {
    fn has(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    fn get(&self, id: &str) -> Result<Component, ResolutionError> {
        self.services
            .get(id)
            .ok_or_else(|| ResolutionError::UnknownIdentifier(id.to_string()))?
            .resolve(id)
    }
}

// ============================================================================
// ServiceRegistryBuilder
// ============================================================================

/// Builder for constructing a [`ServiceRegistry`].
///
/// Registering an identifier twice replaces the earlier definition.
pub struct ServiceRegistryBuilder {
    services: HashMap<String, Service>,
}

impl ServiceRegistryBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Register a shared service built by a fallible factory.
    pub fn service<F>(self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Component, BoxError> + Send + Sync + 'static,
    {
        self.insert(id.into(), Service::new(Box::new(factory), Scope::Shared))
    }

    /// Register a service whose factory runs on every `get`.
    pub fn prototype<F>(self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Component, BoxError> + Send + Sync + 'static,
    {
        self.insert(id.into(), Service::new(Box::new(factory), Scope::Prototype))
    }

    /// Register a shared normalizer.
    pub fn normalizer<N, F>(self, id: impl Into<String>, factory: F) -> Self
    where
        N: Normalizer,
        F: Fn() -> N + Send + Sync + 'static,
    {
        self.service(id, move || Ok(Component::normalizer(factory())))
    }

    /// Register a shared encoder.
    pub fn encoder<E, F>(self, id: impl Into<String>, factory: F) -> Self
    where
        E: Encoder,
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.service(id, move || Ok(Component::encoder(factory())))
    }

    /// Register an already constructed component.
    pub fn instance(self, id: impl Into<String>, component: Component) -> Self {
        let seeded = component.clone();
        self.insert(
            id.into(),
            Service {
                factory: Box::new(move || Ok(component.clone())),
                scope: Scope::Shared,
                instance: OnceLock::from(seeded),
            },
        )
    }

    /// Register every component submitted through `inventory`.
    #[cfg(feature = "inventory")]
    pub fn collected(mut self) -> Self {
        for registration in super::collected::registrations() {
            let factory = registration.factory;
            self = self.service(registration.id, move || Ok(factory()));
        }
        self
    }

    /// Get the number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Check if the builder has no services.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Build the immutable registry.
    pub fn build(self) -> ServiceRegistry {
        ServiceRegistry {
            services: self.services,
        }
    }

    fn insert(mut self, id: String, service: Service) -> Self {
        #[cfg(feature = "tracing")]
        if self.services.contains_key(&id) {
            tracing::warn!(%id, "replacing previously registered service");
        }
        self.services.insert(id, service);
        self
    }
}

impl Default for ServiceRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingNormalizer, StubEncoder};
    use lazyser_core::ComponentKind;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn counting_factory(
        builds: Arc<AtomicUsize>,
    ) -> impl Fn() -> Result<Component, BoxError> + Send + Sync + 'static {
        move || {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(Component::encoder(StubEncoder::new("stub")))
        }
    }

    #[test]
    fn test_has_does_not_construct() {
        let builds = Arc::new(AtomicUsize::new(0));
        let registry = ServiceRegistry::builder()
            .service("svc.stub", counting_factory(builds.clone()))
            .build();

        assert!(registry.has("svc.stub"));
        assert!(!registry.has("svc.other"));
        assert_eq!(builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_shared_service_is_built_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let registry = ServiceRegistry::builder()
            .service("svc.stub", counting_factory(builds.clone()))
            .build();

        let first = registry.get("svc.stub").unwrap().into_encoder("svc.stub").unwrap();
        let second = registry.get("svc.stub").unwrap().into_encoder("svc.stub").unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_prototype_service_is_built_every_time() {
        let builds = Arc::new(AtomicUsize::new(0));
        let registry = ServiceRegistry::builder()
            .prototype("svc.stub", counting_factory(builds.clone()))
            .build();

        registry.get("svc.stub").unwrap();
        registry.get("svc.stub").unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unknown_identifier() {
        let registry = ServiceRegistry::builder().build();
        assert!(matches!(
            registry.get("svc.missing"),
            Err(ResolutionError::UnknownIdentifier(id)) if id == "svc.missing"
        ));
    }

    #[test]
    fn test_factory_failure_is_construction_error() {
        let registry = ServiceRegistry::builder()
            .service("svc.broken", || Err("no database".into()))
            .build();

        match registry.get("svc.broken") {
            Err(ResolutionError::Construction { id, source }) => {
                assert_eq!(id, "svc.broken");
                assert_eq!(source.to_string(), "no database");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(component) => panic!("unexpected component: {component:?}"),
        }
    }

    #[test]
    fn test_instance_is_returned_as_is() {
        let normalizer: Arc<dyn Normalizer> = Arc::new(RecordingNormalizer::any("given"));
        let registry = ServiceRegistry::builder()
            .instance("svc.given", Component::Normalizer(normalizer.clone()))
            .build();

        let resolved = registry.get("svc.given").unwrap();
        assert_eq!(resolved.kind(), ComponentKind::Normalizer);
        assert!(Arc::ptr_eq(
            &resolved.into_normalizer("svc.given").unwrap(),
            &normalizer
        ));
    }

    #[test]
    fn test_later_registration_replaces_earlier() {
        let registry = ServiceRegistry::builder()
            .encoder("svc.x", || StubEncoder::new("a"))
            .normalizer("svc.x", || RecordingNormalizer::any("b"))
            .build();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.ids().collect::<Vec<_>>(), ["svc.x"]);
        assert_eq!(
            registry.get("svc.x").unwrap().kind(),
            ComponentKind::Normalizer
        );
    }
}
