//! Normalizer trait and property filtering.

use crate::{Value, error::BoxError, object::Object};
use std::{any::Any, collections::BTreeSet};

/// Converts between runtime objects and the intermediate [`Value`].
///
/// The `supports_*` probes are only consulted by the backend's generic
/// algorithm. A normalizer reached through an explicit type mapping is trusted
/// to handle that type and is called without probing.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Normalizer`",
    label = "missing `Normalizer` implementation",
    note = "Normalizers must implement both normalization directions and their probes."
)]
pub trait Normalizer: Send + Sync + 'static {
    /// Whether this normalizer can normalize `object` for `format`.
    fn supports_normalization(&self, object: &dyn Object, format: Option<&str>) -> bool;

    /// Converts `object` into the intermediate representation.
    ///
    /// `properties`, when given, restricts which fields appear in the output.
    fn normalize(
        &self,
        object: &dyn Object,
        format: Option<&str>,
        properties: Option<&PropertyFilter>,
    ) -> Result<Value, BoxError>;

    /// Whether this normalizer can rebuild a `type_name` from `data`.
    fn supports_denormalization(&self, data: &Value, type_name: &str, format: Option<&str>)
    -> bool;

    /// Rebuilds an instance of `type_name` from `data`.
    fn denormalize(
        &self,
        data: &Value,
        type_name: &str,
        format: Option<&str>,
    ) -> Result<Box<dyn Any + Send>, BoxError>;
}

/// A set of property names that normalization should keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    names: BTreeSet<String>,
}

impl PropertyFilter {
    /// Create a filter keeping exactly the given properties.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the property named `name` is kept.
    pub fn allows(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Iterate over the kept property names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Drops every key of a JSON object that the filter does not keep.
    ///
    /// Non-object values are returned unchanged.
    pub fn apply(&self, value: Value) -> Value {
        match value {
            Value::Object(mut map) => {
                map.retain(|key, _| self.allows(key));
                Value::Object(map)
            }
            other => other,
        }
    }
}

impl<S: Into<String>> FromIterator<S> for PropertyFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
