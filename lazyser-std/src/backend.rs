//! The base serializer: active component storage and generic dispatch.

use lazyser_core::{Encoder, Normalizer, Object, SerializerBackend, SerializerError, Value};
use std::{collections::HashMap, sync::Arc};

/// Default [`SerializerBackend`].
///
/// Normalizers are probed linearly in registration order, so earlier
/// registrations win. Encoders are keyed by format, one per format.
#[derive(Default)]
pub struct BaseSerializer {
    normalizers: Vec<Arc<dyn Normalizer>>,
    encoders: HashMap<String, Arc<dyn Encoder>>,
}

impl BaseSerializer {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a normalizer up front.
    pub fn with_normalizer<N: Normalizer>(mut self, normalizer: N) -> Self {
        self.register_normalizer(Arc::new(normalizer));
        self
    }

    /// Register an encoder for `format` up front.
    pub fn with_encoder<E: Encoder>(mut self, format: &str, encoder: E) -> Self {
        self.set_encoder(format, Arc::new(encoder));
        self
    }

    /// The active normalizers in probe order.
    pub fn normalizers(&self) -> &[Arc<dyn Normalizer>] {
        &self.normalizers
    }

    /// Formats that currently have an encoder.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }
}

impl SerializerBackend for BaseSerializer {
    fn register_normalizer(&mut self, normalizer: Arc<dyn Normalizer>) {
        if self
            .normalizers
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &normalizer))
        {
            return;
        }
        self.normalizers.push(normalizer);
    }

    fn has_encoder(&self, format: &str) -> bool {
        self.encoders.contains_key(format)
    }

    fn set_encoder(&mut self, format: &str, encoder: Arc<dyn Encoder>) {
        self.encoders.insert(format.to_string(), encoder);
    }

    fn encoder(&self, format: &str) -> Result<Arc<dyn Encoder>, SerializerError> {
        self.encoders
            .get(format)
            .cloned()
            .ok_or_else(|| SerializerError::NoEncoder(format.to_string()))
    }

    fn encode(&self, data: &Value, format: &str) -> Result<String, SerializerError> {
        let encoder = self.encoder(format)?;
        encoder
            .encode(data, format)
            .map_err(SerializerError::Component)
    }

    fn decode(&self, data: &str, format: &str) -> Result<Value, SerializerError> {
        let encoder = self
            .encoders
            .get(format)
            .ok_or_else(|| SerializerError::NoDecoder(format.to_string()))?;
        let decoder = encoder
            .as_decoder()
            .ok_or_else(|| SerializerError::NoDecoder(format.to_string()))?;
        decoder
            .decode(data, format)
            .map_err(SerializerError::Component)
    }

    fn find_normalizer(
        &self,
        object: &dyn Object,
        format: Option<&str>,
    ) -> Result<Arc<dyn Normalizer>, SerializerError> {
        self.normalizers
            .iter()
            .find(|normalizer| normalizer.supports_normalization(object, format))
            .cloned()
            .ok_or_else(|| SerializerError::UnsupportedType {
                type_name: object.type_name().to_string(),
                format: format.map(str::to_string),
            })
    }

    fn find_denormalizer(
        &self,
        data: &Value,
        type_name: &str,
        format: Option<&str>,
    ) -> Result<Arc<dyn Normalizer>, SerializerError> {
        self.normalizers
            .iter()
            .find(|normalizer| normalizer.supports_denormalization(data, type_name, format))
            .cloned()
            .ok_or_else(|| SerializerError::UnsupportedType {
                type_name: type_name.to_string(),
                format: format.map(str::to_string),
            })
    }
}
