//! # Lazy Dispatcher
//!
//! [`LazySerializer`] sits in front of a [`SerializerBackend`] and decides,
//! per call, which components the backend needs before it can do the work.
//! Components are named by identifier in a [`DispatcherConfig`] and are only
//! pulled from the [`ComponentRegistry`] the first time they are needed.
//!
//! # Resolution order
//!
//! Normalizing an object of type `T` for format `F` (and, symmetrically,
//! denormalizing into `T`):
//!
//! 1. **Resolved cache**: a normalizer already resolved for `(T, F)` is called
//!    directly.
//! 2. **Type mapping**: if `T` has an identifier, it is resolved, registered
//!    into the backend, cached under `(T, F)` and called. Its `supports_*`
//!    probes are never consulted.
//! 3. **Defaults**: the default identifiers are resolved and registered once,
//!    then the backend's generic probe runs over everything registered.
//!
//! The cache is shared by both directions: a normalizer resolved while
//! normalizing `(T, F)` also serves denormalizing into `(T, F)`.
//!
//! # Encoders
//!
//! Before `encode`, `decode` and `encoder`, the format's encoder is activated
//! if the backend has none, the format is mapped, and the registry `has` the
//! identifier. Otherwise the call proceeds unchanged and the backend reports
//! its own "no encoder" error if it still cannot serve the format.

use crate::{backend::BaseSerializer, config::DispatcherConfig};
use lazyser_core::{
    ComponentRegistry, Encoder, Normalizer, Object, PropertyFilter, SerializerBackend,
    SerializerError, Value,
};
use std::{
    any::Any,
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Outcome of lazy encoder activation for one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EncoderActivation {
    /// The backend already had an encoder for the format.
    AlreadyActive,
    /// The mapped encoder was resolved and set on the backend.
    Activated,
    /// No mapping, or the registry does not have the mapped identifier.
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    type_name: String,
    format: Option<String>,
}

impl CacheKey {
    fn new(type_name: &str, format: Option<&str>) -> Self {
        Self {
            type_name: type_name.to_string(),
            format: format.map(str::to_string),
        }
    }
}

/// A serializer that resolves its normalizers and encoders on first use.
///
/// All operations take `&self`; the resolved cache, the defaults flag and the
/// backend are lock-guarded so that concurrent first use of the same
/// `(type, format)` pair still resolves it from the registry only once.
/// No lock is held while a normalizer or encoder runs, so components may call
/// back into the serializer.
///
/// # Example
///
/// ```rust,ignore
/// let config = DispatcherConfig::builder()
///     .encoder("json", "svc.json_encoder")
///     .normalizer_for::<User>("svc.user_normalizer")
///     .build()?;
/// let registry = ServiceRegistry::builder()
///     .encoder("svc.json_encoder", JsonEncoder::new)
///     .normalizer("svc.user_normalizer", SerdeNormalizer::<User>::new)
///     .build();
///
/// let serializer = LazySerializer::new(config, registry);
/// let text = serializer.serialize(&user, "json")?;
/// ```
pub struct LazySerializer<R, B = BaseSerializer> {
    config: DispatcherConfig,
    registry: R,
    backend: RwLock<B>,
    resolved: RwLock<HashMap<CacheKey, Arc<dyn Normalizer>>>,
    defaults_loaded: Mutex<bool>,
}

impl<R: ComponentRegistry> LazySerializer<R, BaseSerializer> {
    /// Create a serializer over an empty [`BaseSerializer`].
    pub fn new(config: DispatcherConfig, registry: R) -> Self {
        Self::with_backend(config, registry, BaseSerializer::new())
    }

    /// Start building a serializer that resolves from `registry`.
    pub fn builder(registry: R) -> LazySerializerBuilder<R> {
        LazySerializerBuilder::new(registry)
    }
}

impl<R, B> LazySerializer<R, B>
where
    R: ComponentRegistry,
    B: SerializerBackend,
{
    /// Create a serializer over an existing backend.
    ///
    /// Components already registered on `backend` stay active; nothing is
    /// resolved until the first call.
    pub fn with_backend(config: DispatcherConfig, registry: R, backend: B) -> Self {
        Self {
            config,
            registry,
            backend: RwLock::new(backend),
            resolved: RwLock::new(HashMap::new()),
            defaults_loaded: Mutex::new(false),
        }
    }

    /// Normalize `object` for `format`.
    ///
    /// # Errors
    ///
    /// - [`SerializerError::Resolution`] if the mapped identifier cannot be supplied
    /// - [`SerializerError::UnsupportedType`] if no active normalizer supports the type
    /// - [`SerializerError::Component`] if the normalizer itself fails
    pub fn normalize_for_type(
        &self,
        object: &dyn Object,
        format: &str,
        properties: Option<&PropertyFilter>,
    ) -> Result<Value, SerializerError> {
        let format = Some(format);
        if let Some(normalizer) = self.resolve_mapped(object.type_name(), format)? {
            return normalizer
                .normalize(object, format, properties)
                .map_err(SerializerError::Component);
        }

        self.load_default_normalizers()?;
        let normalizer = self.backend().find_normalizer(object, format)?;
        normalizer
            .normalize(object, format, properties)
            .map_err(SerializerError::Component)
    }

    /// Rebuild an instance of `type_name` from `data`.
    ///
    /// Same resolution order and errors as [`normalize_for_type`](Self::normalize_for_type).
    pub fn denormalize_for_type(
        &self,
        data: &Value,
        type_name: &str,
        format: Option<&str>,
    ) -> Result<Box<dyn Any + Send>, SerializerError> {
        if let Some(normalizer) = self.resolve_mapped(type_name, format)? {
            return normalizer
                .denormalize(data, type_name, format)
                .map_err(SerializerError::Component);
        }

        self.load_default_normalizers()?;
        let normalizer = self.backend().find_denormalizer(data, type_name, format)?;
        normalizer
            .denormalize(data, type_name, format)
            .map_err(SerializerError::Component)
    }

    /// Denormalize into `T`, keyed by `T`'s type name.
    ///
    /// # Errors
    ///
    /// As [`denormalize_for_type`](Self::denormalize_for_type), plus
    /// [`SerializerError::TypeMismatch`] if the normalizer produced something else.
    pub fn denormalize_into<T: Any>(
        &self,
        data: &Value,
        format: Option<&str>,
    ) -> Result<T, SerializerError> {
        let boxed = self.denormalize_for_type(data, std::any::type_name::<T>(), format)?;
        downcast(boxed)
    }

    /// Encode `data` as `format`.
    ///
    /// # Errors
    ///
    /// [`SerializerError::NoEncoder`] if no encoder is active after lazy activation.
    pub fn encode(&self, data: &Value, format: &str) -> Result<String, SerializerError> {
        let encoder = self.encoder(format)?;
        encoder
            .encode(data, format)
            .map_err(SerializerError::Component)
    }

    /// Decode `data`, which is in `format`.
    ///
    /// # Errors
    ///
    /// [`SerializerError::NoDecoder`] if no active encoder for `format` can decode.
    pub fn decode(&self, data: &str, format: &str) -> Result<Value, SerializerError> {
        self.activate_encoder(format)?;
        let no_decoder = || SerializerError::NoDecoder(format.to_string());
        let encoder = self.backend().encoder(format).map_err(|_| no_decoder())?;
        encoder
            .as_decoder()
            .ok_or_else(no_decoder)?
            .decode(data, format)
            .map_err(SerializerError::Component)
    }

    /// The active encoder for `format`, activating it first if needed.
    pub fn encoder(&self, format: &str) -> Result<Arc<dyn Encoder>, SerializerError> {
        self.activate_encoder(format)?;
        self.backend().encoder(format)
    }

    /// Normalize then encode.
    pub fn serialize(&self, object: &dyn Object, format: &str) -> Result<String, SerializerError> {
        let value = self.normalize_for_type(object, format, None)?;
        self.encode(&value, format)
    }

    /// Decode then denormalize into `type_name`.
    pub fn deserialize(
        &self,
        data: &str,
        type_name: &str,
        format: &str,
    ) -> Result<Box<dyn Any + Send>, SerializerError> {
        let value = self.decode(data, format)?;
        self.denormalize_for_type(&value, type_name, Some(format))
    }

    /// Decode then denormalize into `T`.
    pub fn deserialize_into<T: Any>(&self, data: &str, format: &str) -> Result<T, SerializerError> {
        let boxed = self.deserialize(data, std::any::type_name::<T>(), format)?;
        downcast(boxed)
    }

    /// Whether `format` can be encoded, activating its encoder if possible.
    pub fn supports_encoding(&self, format: &str) -> bool {
        self.activate_encoder(format).is_ok() && self.backend().supports_encoding(format)
    }

    /// Whether `format` can be decoded, activating its encoder if possible.
    pub fn supports_decoding(&self, format: &str) -> bool {
        self.activate_encoder(format).is_ok() && self.backend().supports_decoding(format)
    }

    /// Pre-populate the resolved cache for `(type_name, format)`.
    ///
    /// A seeded entry takes precedence over the type mapping. An existing
    /// entry is kept, so the cache stays bind-once.
    pub fn seed_resolved(
        &self,
        type_name: &str,
        format: Option<&str>,
        normalizer: Arc<dyn Normalizer>,
    ) {
        write(&self.resolved)
            .entry(CacheKey::new(type_name, format))
            .or_insert(normalizer);
    }

    /// Number of `(type, format)` pairs in the resolved cache.
    pub fn resolved_count(&self) -> usize {
        read(&self.resolved).len()
    }

    /// Whether the default normalizers have been activated.
    pub fn defaults_loaded(&self) -> bool {
        *lock(&self.defaults_loaded)
    }

    /// The configuration tables.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The component registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Read access to the backend.
    pub fn backend(&self) -> RwLockReadGuard<'_, B> {
        read(&self.backend)
    }

    /// Tiers 1 and 2: the cached normalizer, or the freshly resolved mapped one.
    ///
    /// `Ok(None)` means neither applies and the caller falls through to defaults.
    fn resolve_mapped(
        &self,
        type_name: &str,
        format: Option<&str>,
    ) -> Result<Option<Arc<dyn Normalizer>>, SerializerError> {
        let key = CacheKey::new(type_name, format);
        if let Some(normalizer) = read(&self.resolved).get(&key) {
            return Ok(Some(normalizer.clone()));
        }

        let Some(id) = self.config.normalizer_for(type_name) else {
            return Ok(None);
        };

        let mut resolved = write(&self.resolved);
        // Another caller may have resolved the pair while we waited.
        if let Some(normalizer) = resolved.get(&key) {
            return Ok(Some(normalizer.clone()));
        }

        let normalizer = self.registry.get(id)?.into_normalizer(id)?;
        write(&self.backend).register_normalizer(normalizer.clone());
        resolved.insert(key, normalizer.clone());

        #[cfg(feature = "tracing")]
        tracing::debug!(%id, type_name, ?format, "resolved mapped normalizer");

        Ok(Some(normalizer))
    }

    /// Tier 3 setup: register the default normalizers, once.
    ///
    /// Identifiers are all resolved before any is registered. The flag is set
    /// whether or not resolution succeeded.
    fn load_default_normalizers(&self) -> Result<(), SerializerError> {
        let mut loaded = lock(&self.defaults_loaded);
        if *loaded || self.config.default_normalizers().is_empty() {
            return Ok(());
        }
        *loaded = true;

        let normalizers = self
            .config
            .default_normalizers()
            .iter()
            .map(|id| self.registry.get(id)?.into_normalizer(id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut backend = write(&self.backend);
        for normalizer in normalizers {
            backend.register_normalizer(normalizer);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            count = self.config.default_normalizers().len(),
            "activated default normalizers"
        );

        Ok(())
    }

    fn activate_encoder(&self, format: &str) -> Result<EncoderActivation, SerializerError> {
        if read(&self.backend).has_encoder(format) {
            return Ok(EncoderActivation::AlreadyActive);
        }

        let Some(id) = self.config.encoder_for(format) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(format, "no encoder mapped for format");
            return Ok(EncoderActivation::Unresolved);
        };
        if !self.registry.has(id) {
            #[cfg(feature = "tracing")]
            tracing::trace!(format, %id, "mapped encoder not in registry");
            return Ok(EncoderActivation::Unresolved);
        }

        let mut backend = write(&self.backend);
        if backend.has_encoder(format) {
            return Ok(EncoderActivation::AlreadyActive);
        }
        let encoder = self.registry.get(id)?.into_encoder(id)?;
        backend.set_encoder(format, encoder);

        #[cfg(feature = "tracing")]
        tracing::debug!(format, %id, "activated encoder");

        Ok(EncoderActivation::Activated)
    }
}

// ============================================================================
// LazySerializerBuilder
// ============================================================================

/// Builder for constructing a [`LazySerializer`].
///
/// Starts with an empty configuration and an empty [`BaseSerializer`].
///
/// # Example
/// ```ignore
/// let serializer = LazySerializer::builder(registry)
///     .config(config)
///     .backend(BaseSerializer::new().with_encoder("yaml", YamlEncoder::new()))
///     .seed::<User>(Some("json"), Arc::new(SerdeNormalizer::<User>::new()))
///     .build();
/// ```
pub struct LazySerializerBuilder<R, B = BaseSerializer> {
    config: DispatcherConfig,
    registry: R,
    backend: B,
    seeds: Vec<(CacheKey, Arc<dyn Normalizer>)>,
}

impl<R> LazySerializerBuilder<R, BaseSerializer> {
    /// Create a builder over `registry`.
    pub fn new(registry: R) -> Self {
        Self {
            config: DispatcherConfig::default(),
            registry,
            backend: BaseSerializer::new(),
            seeds: Vec::new(),
        }
    }
}

impl<R, B> LazySerializerBuilder<R, B> {
    /// Use `config` for the identifier tables.
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the backend.
    pub fn backend<B2>(self, backend: B2) -> LazySerializerBuilder<R, B2> {
        LazySerializerBuilder {
            config: self.config,
            registry: self.registry,
            backend,
            seeds: self.seeds,
        }
    }

    /// Pre-populate the resolved cache for `T` and `format`.
    ///
    /// The first seed for a pair wins, as with [`LazySerializer::seed_resolved`].
    pub fn seed<T: ?Sized>(mut self, format: Option<&str>, normalizer: Arc<dyn Normalizer>) -> Self {
        self.seeds
            .push((CacheKey::new(std::any::type_name::<T>(), format), normalizer));
        self
    }
}

impl<R, B> LazySerializerBuilder<R, B>
where
    R: ComponentRegistry,
    B: SerializerBackend,
{
    /// Build the serializer. Nothing is resolved yet.
    pub fn build(self) -> LazySerializer<R, B> {
        let serializer = LazySerializer::with_backend(self.config, self.registry, self.backend);
        {
            let mut resolved = write(&serializer.resolved);
            for (key, normalizer) in self.seeds {
                resolved.entry(key).or_insert(normalizer);
            }
        }
        serializer
    }
}

fn downcast<T: Any>(boxed: Box<dyn Any + Send>) -> Result<T, SerializerError> {
    boxed
        .downcast::<T>()
        .map(|value| *value)
        .map_err(|_| SerializerError::TypeMismatch {
            expected: std::any::type_name::<T>(),
        })
}

// Guarded state is append-only, so a poisoned lock is still consistent.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
