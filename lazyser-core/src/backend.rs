//! Base dispatch mechanism boundary.

use crate::{
    Value,
    encoder::Encoder,
    error::SerializerError,
    normalizer::{Normalizer, PropertyFilter},
    object::Object,
};
use std::{any::Any, sync::Arc};

/// The base serializer that owns the active component set.
///
/// The backend holds the live list of registered normalizers (probed in
/// registration order) and one encoder per format. Its generic algorithms
/// are what the lazy dispatcher falls back to once it has registered
/// whatever components its configuration calls for.
pub trait SerializerBackend: Send + Sync {
    /// Append a normalizer to the active list.
    ///
    /// Registering the same instance twice must be harmless.
    fn register_normalizer(&mut self, normalizer: Arc<dyn Normalizer>);

    /// Whether an encoder is active for `format`.
    fn has_encoder(&self, format: &str) -> bool;

    /// Make `encoder` the active encoder for `format`.
    fn set_encoder(&mut self, format: &str, encoder: Arc<dyn Encoder>);

    /// The active encoder for `format`.
    ///
    /// # Errors
    ///
    /// [`SerializerError::NoEncoder`] if none is active.
    fn encoder(&self, format: &str) -> Result<Arc<dyn Encoder>, SerializerError>;

    /// Encode with the active encoder for `format`.
    fn encode(&self, data: &Value, format: &str) -> Result<String, SerializerError>;

    /// Decode with the active encoder for `format`.
    ///
    /// # Errors
    ///
    /// [`SerializerError::NoDecoder`] if no encoder is active or it cannot decode.
    fn decode(&self, data: &str, format: &str) -> Result<Value, SerializerError>;

    /// The first registered normalizer that supports `object`.
    ///
    /// # Errors
    ///
    /// [`SerializerError::UnsupportedType`] if none does.
    fn find_normalizer(
        &self,
        object: &dyn Object,
        format: Option<&str>,
    ) -> Result<Arc<dyn Normalizer>, SerializerError>;

    /// The first registered normalizer that can rebuild `type_name` from `data`.
    ///
    /// # Errors
    ///
    /// [`SerializerError::UnsupportedType`] if none does.
    fn find_denormalizer(
        &self,
        data: &Value,
        type_name: &str,
        format: Option<&str>,
    ) -> Result<Arc<dyn Normalizer>, SerializerError>;

    /// Normalize with the first registered normalizer that supports `object`.
    fn normalize(
        &self,
        object: &dyn Object,
        format: Option<&str>,
        properties: Option<&PropertyFilter>,
    ) -> Result<Value, SerializerError> {
        self.find_normalizer(object, format)?
            .normalize(object, format, properties)
            .map_err(SerializerError::Component)
    }

    /// Denormalize with the first registered normalizer that supports `type_name`.
    fn denormalize(
        &self,
        data: &Value,
        type_name: &str,
        format: Option<&str>,
    ) -> Result<Box<dyn Any + Send>, SerializerError> {
        self.find_denormalizer(data, type_name, format)?
            .denormalize(data, type_name, format)
            .map_err(SerializerError::Component)
    }

    /// Whether `format` can currently be encoded.
    fn supports_encoding(&self, format: &str) -> bool {
        self.has_encoder(format)
    }

    /// Whether `format` can currently be decoded.
    fn supports_decoding(&self, format: &str) -> bool {
        self.encoder(format)
            .map(|encoder| encoder.as_decoder().is_some())
            .unwrap_or(false)
    }
}
