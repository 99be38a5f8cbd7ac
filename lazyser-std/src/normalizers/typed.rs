//! A normalizer for one `serde`-enabled type.

use lazyser_core::{BoxError, Normalizer, Object, PropertyFilter, Value};
use serde::{Serialize, de::DeserializeOwned};
use std::{any::Any, marker::PhantomData};
use thiserror::Error;

/// Errors raised by [`SerdeNormalizer`].
#[derive(Error, Debug)]
pub enum SerdeNormalizerError {
    /// The object or target type is not the normalizer's type.
    #[error("expected `{expected}`, got `{found}`")]
    UnexpectedType {
        /// The type this normalizer handles.
        expected: &'static str,
        /// The type it was handed.
        found: String,
    },
}

/// Normalizes `T` through its `Serialize` / `Deserialize` implementations.
///
/// Only `T` passes the `supports_*` probes. Property filters apply to the
/// top-level keys of the serialized object.
pub struct SerdeNormalizer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeNormalizer<T> {
    /// Create a normalizer for `T`.
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeNormalizer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Normalizer for SerdeNormalizer<T>
where
    T: Serialize + DeserializeOwned + Any + Send + Sync,
{
    fn supports_normalization(&self, object: &dyn Object, _format: Option<&str>) -> bool {
        object.as_any().is::<T>()
    }

    fn normalize(
        &self,
        object: &dyn Object,
        _format: Option<&str>,
        properties: Option<&PropertyFilter>,
    ) -> Result<Value, BoxError> {
        let value = object
            .downcast_ref::<T>()
            .ok_or_else(|| SerdeNormalizerError::UnexpectedType {
                expected: std::any::type_name::<T>(),
                found: object.type_name().to_string(),
            })?;
        let normalized = serde_json::to_value(value)?;
        Ok(match properties {
            Some(filter) => filter.apply(normalized),
            None => normalized,
        })
    }

    fn supports_denormalization(
        &self,
        _data: &Value,
        type_name: &str,
        _format: Option<&str>,
    ) -> bool {
        type_name == std::any::type_name::<T>()
    }

    fn denormalize(
        &self,
        data: &Value,
        type_name: &str,
        _format: Option<&str>,
    ) -> Result<Box<dyn Any + Send>, BoxError> {
        if type_name != std::any::type_name::<T>() {
            return Err(SerdeNormalizerError::UnexpectedType {
                expected: std::any::type_name::<T>(),
                found: type_name.to_string(),
            }
            .into());
        }
        let value: T = T::deserialize(data)?;
        Ok(Box::new(value))
    }
}
