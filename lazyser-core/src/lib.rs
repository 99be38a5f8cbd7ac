//! # lazyser-core
//!
//! Core traits for the lazyser lazy-loading serializer.
//!
//! This crate has minimal dependencies and is meant to be imported by crates
//! that provide normalizers, encoders or registries without pulling in the
//! dispatcher from `lazyser-std`.
//!
//! # Layers
//!
//! ## Components ([`Normalizer`], [`Encoder`], [`Decoder`])
//!
//! A normalizer converts between a runtime [`Object`] and the format-agnostic
//! intermediate [`Value`]. An encoder converts that value into the text of one
//! wire format; if it can also parse that format it exposes a [`Decoder`].
//!
//! ## Registry ([`ComponentRegistry`])
//!
//! Maps opaque string identifiers to constructed [`Component`]s. The
//! dispatcher only ever sees identifiers in its configuration; the registry
//! decides how (and how often) the instance behind an identifier is built.
//!
//! ## Backend ([`SerializerBackend`])
//!
//! Owns the live list of active normalizers and the per-format encoder map,
//! and runs the generic "try each registered component" algorithms.
//!
//! # Error Types
//!
//! - [`SerializerError`] - Top-level error type
//! - [`ResolutionError`] - An identifier could not be turned into a component

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod backend;
mod component;
mod encoder;
mod error;
mod normalizer;
mod object;
mod registry;

// Re-exports
pub use backend::SerializerBackend;
pub use component::{Component, ComponentKind};
pub use encoder::{Decoder, Encoder};
pub use error::{BoxError, ResolutionError, SerializerError};
pub use normalizer::{Normalizer, PropertyFilter};
pub use object::Object;
pub use registry::ComponentRegistry;

/// The format-agnostic intermediate representation produced by normalizers.
pub use serde_json::Value;
