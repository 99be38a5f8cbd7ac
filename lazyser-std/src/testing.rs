//! Testing utilities for lazyser.
//!
//! This module provides utilities to make testing dispatchers, registries and
//! components easier.
//!
//! # Features
//!
//! - [`CountingRegistry`]: wraps a registry and counts `has` / `get` calls per identifier
//! - [`RecordingNormalizer`]: a normalizer that records what it handled
//! - [`StubEncoder`]: a trivially inspectable encoder / decoder

use lazyser_core::{
    BoxError, Component, ComponentRegistry, Decoder, Encoder, Normalizer, Object, PropertyFilter,
    ResolutionError, Value,
};
use serde_json::json;
use std::{
    any::Any,
    collections::HashMap,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Counting Registry
// ============================================================================

/// A registry wrapper that counts calls.
///
/// Clones share their counters, so a clone can be handed to the dispatcher
/// while the test keeps another for inspection.
///
/// # Example
///
/// ```rust,ignore
/// let registry = CountingRegistry::new(services);
/// let serializer = LazySerializer::new(config, registry.clone());
///
/// serializer.encode(&value, "json")?;
/// serializer.encode(&value, "json")?;
/// assert_eq!(registry.get_count("svc.json_encoder"), 1);
/// ```
pub struct CountingRegistry<R> {
    inner: Arc<R>,
    counters: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    has: Mutex<HashMap<String, usize>>,
    get: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
}

impl Counters {
    fn bump(map: &Mutex<HashMap<String, usize>>, id: &str) {
        let mut map = map.lock().unwrap_or_else(PoisonError::into_inner);
        *map.entry(id.to_string()).or_default() += 1;
    }

    fn read(map: &Mutex<HashMap<String, usize>>, id: &str) -> usize {
        map.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .copied()
            .unwrap_or(0)
    }
}

impl<R> CountingRegistry<R> {
    /// Wrap `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner: Arc::new(inner),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Number of `has(id)` calls.
    pub fn has_count(&self, id: &str) -> usize {
        Counters::read(&self.counters.has, id)
    }

    /// Number of `get(id)` calls.
    pub fn get_count(&self, id: &str) -> usize {
        Counters::read(&self.counters.get, id)
    }

    /// Number of calls of either kind, for any identifier.
    pub fn total_calls(&self) -> usize {
        self.counters.total.load(Ordering::SeqCst)
    }
}

impl<R> Clone for CountingRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            counters: self.counters.clone(),
        }
    }
}

impl<R: ComponentRegistry> ComponentRegistry for CountingRegistry<R> {
    fn has(&self, id: &str) -> bool {
        self.counters.total.fetch_add(1, Ordering::SeqCst);
        Counters::bump(&self.counters.has, id);
        self.inner.has(id)
    }

    fn get(&self, id: &str) -> Result<Component, ResolutionError> {
        self.counters.total.fetch_add(1, Ordering::SeqCst);
        Counters::bump(&self.counters.get, id);
        self.inner.get(id)
    }
}

// ============================================================================
// Recording Normalizer
// ============================================================================

/// A normalizer that records the type names it handled.
///
/// Normalizing yields `{"normalizer": <label>, "type": <type name>}`, so tests
/// can tell which instance did the work. Denormalizing yields the label as a
/// boxed `String`.
pub struct RecordingNormalizer {
    label: &'static str,
    supports: Option<&'static str>,
    normalized: Arc<Mutex<Vec<String>>>,
    denormalized: Arc<Mutex<Vec<String>>>,
}

impl RecordingNormalizer {
    /// A normalizer whose probes accept every type.
    pub fn any(label: &'static str) -> Self {
        Self {
            label,
            supports: None,
            normalized: Arc::default(),
            denormalized: Arc::default(),
        }
    }

    /// A normalizer whose probes accept only `T`.
    pub fn for_type<T: Any>(label: &'static str) -> Self {
        Self {
            supports: Some(std::any::type_name::<T>()),
            ..Self::any(label)
        }
    }

    /// The label reported in normalized output.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Type names normalized so far.
    pub fn normalized(&self) -> Vec<String> {
        self.normalized
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Type names denormalized so far.
    pub fn denormalized(&self) -> Vec<String> {
        self.denormalized
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn accepts(&self, type_name: &str) -> bool {
        self.supports.is_none_or(|supported| supported == type_name)
    }
}

impl Clone for RecordingNormalizer {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            supports: self.supports,
            normalized: self.normalized.clone(),
            denormalized: self.denormalized.clone(),
        }
    }
}

impl Normalizer for RecordingNormalizer {
    fn supports_normalization(&self, object: &dyn Object, _format: Option<&str>) -> bool {
        self.accepts(object.type_name())
    }

    fn normalize(
        &self,
        object: &dyn Object,
        _format: Option<&str>,
        properties: Option<&PropertyFilter>,
    ) -> Result<Value, BoxError> {
        self.normalized
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(object.type_name().to_string());
        let value = json!({ "normalizer": self.label, "type": object.type_name() });
        Ok(match properties {
            Some(filter) => filter.apply(value),
            None => value,
        })
    }

    fn supports_denormalization(
        &self,
        _data: &Value,
        type_name: &str,
        _format: Option<&str>,
    ) -> bool {
        self.accepts(type_name)
    }

    fn denormalize(
        &self,
        _data: &Value,
        type_name: &str,
        _format: Option<&str>,
    ) -> Result<Box<dyn Any + Send>, BoxError> {
        self.denormalized
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(type_name.to_string());
        Ok(Box::new(self.label.to_string()))
    }
}

// ============================================================================
// Stub Encoder
// ============================================================================

/// An encoder writing `<label>:<compact json>`.
///
/// Its decoder strips the `<label>:` prefix and parses the rest as JSON.
#[derive(Debug, Clone)]
pub struct StubEncoder {
    label: &'static str,
    decodes: bool,
}

impl StubEncoder {
    /// An encoder that can also decode.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            decodes: true,
        }
    }

    /// An encoder without a decoding half.
    pub fn encode_only(label: &'static str) -> Self {
        Self {
            label,
            decodes: false,
        }
    }
}

impl Encoder for StubEncoder {
    fn encode(&self, data: &Value, _format: &str) -> Result<String, BoxError> {
        Ok(format!("{}:{}", self.label, data))
    }

    fn as_decoder(&self) -> Option<&dyn Decoder> {
        self.decodes.then_some(self as &dyn Decoder)
    }
}

impl Decoder for StubEncoder {
    fn decode(&self, data: &str, _format: &str) -> Result<Value, BoxError> {
        let body = data
            .strip_prefix(self.label)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| format!("input is not prefixed with `{}:`", self.label))?;
        Ok(serde_json::from_str(body)?)
    }
}
