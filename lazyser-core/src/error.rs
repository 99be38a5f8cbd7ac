//! Error types for lazyser.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`SerializerError`] - Top-level error type for every dispatcher operation
//! - [`ResolutionError`] - A configured identifier could not be supplied by the registry

use crate::component::ComponentKind;
use thiserror::Error;

/// A boxed error type for component-level failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all serializer operations.
#[derive(Error, Debug)]
pub enum SerializerError {
    /// A mapped identifier could not be resolved into a component.
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// No active normalizer supports the type.
    #[error("no normalizer supports type `{type_name}` for format {}", display_format(.format))]
    UnsupportedType {
        /// Fully-qualified type name of the object or target type.
        type_name: String,
        /// Requested format, if any.
        format: Option<String>,
    },

    /// No encoder is active for the format.
    #[error("no encoder found for format `{0}`")]
    NoEncoder(String),

    /// The active encoder for the format cannot decode, or none is active.
    #[error("no decoder found for format `{0}`")]
    NoDecoder(String),

    /// A denormalized value was not of the requested Rust type.
    #[error("denormalized value is not a `{expected}`")]
    TypeMismatch {
        /// The type the caller asked for.
        expected: &'static str,
    },

    /// A component failed while doing its work.
    #[error("component error")]
    Component(#[source] BoxError),
}

/// Errors raised while turning an identifier into a component.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The registry has no component under this identifier.
    #[error("no component registered under identifier `{0}`")]
    UnknownIdentifier(String),

    /// The identifier resolved to the wrong kind of component.
    #[error("component `{id}` resolved to {found}, expected {expected}")]
    WrongKind {
        /// The identifier that was resolved.
        id: String,
        /// What the caller needed.
        expected: ComponentKind,
        /// What the registry produced.
        found: ComponentKind,
    },

    /// The registry knows the identifier but failed to build it.
    #[error("failed to construct component `{id}`")]
    Construction {
        /// The identifier being constructed.
        id: String,
        /// The factory error.
        #[source]
        source: BoxError,
    },
}

fn display_format(format: &Option<String>) -> String {
    match format {
        Some(format) => format!("`{format}`"),
        None => "<none>".to_string(),
    }
}
