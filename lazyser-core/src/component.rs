//! Components produced by a registry.

use crate::{encoder::Encoder, error::ResolutionError, normalizer::Normalizer};
use std::{fmt, sync::Arc};

/// A constructed component handle.
///
/// Handles are reference counted: once registered the backend owns the
/// component, and the dispatcher keeps a clone for fast re-lookup.
#[derive(Clone)]
pub enum Component {
    /// A normalizer instance.
    Normalizer(Arc<dyn Normalizer>),
    /// An encoder instance.
    Encoder(Arc<dyn Encoder>),
}

/// The kind of a [`Component`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// See [`Component::Normalizer`].
    Normalizer,
    /// See [`Component::Encoder`].
    Encoder,
}

impl Component {
    /// Wrap a normalizer.
    pub fn normalizer<N: Normalizer>(normalizer: N) -> Self {
        Component::Normalizer(Arc::new(normalizer))
    }

    /// Wrap an encoder.
    pub fn encoder<E: Encoder>(encoder: E) -> Self {
        Component::Encoder(Arc::new(encoder))
    }

    /// The kind of this component.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Normalizer(_) => ComponentKind::Normalizer,
            Component::Encoder(_) => ComponentKind::Encoder,
        }
    }

    /// Unwrap a normalizer resolved under `id`.
    pub fn into_normalizer(self, id: &str) -> Result<Arc<dyn Normalizer>, ResolutionError> {
        match self {
            Component::Normalizer(normalizer) => Ok(normalizer),
            other => Err(ResolutionError::WrongKind {
                id: id.to_string(),
                expected: ComponentKind::Normalizer,
                found: other.kind(),
            }),
        }
    }

    /// Unwrap an encoder resolved under `id`.
    pub fn into_encoder(self, id: &str) -> Result<Arc<dyn Encoder>, ResolutionError> {
        match self {
            Component::Encoder(encoder) => Ok(encoder),
            other => Err(ResolutionError::WrongKind {
                id: id.to_string(),
                expected: ComponentKind::Encoder,
                found: other.kind(),
            }),
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.kind()).finish()
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Normalizer => f.write_str("normalizer"),
            ComponentKind::Encoder => f.write_str("encoder"),
        }
    }
}

impl From<Arc<dyn Normalizer>> for Component {
    fn from(normalizer: Arc<dyn Normalizer>) -> Self {
        Component::Normalizer(normalizer)
    }
}

impl From<Arc<dyn Encoder>> for Component {
    fn from(encoder: Arc<dyn Encoder>) -> Self {
        Component::Encoder(encoder)
    }
}
