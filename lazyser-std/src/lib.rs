//! # lazyser-std
//!
//! Standard implementations for the lazyser lazy-loading serializer.
//!
//! This crate provides:
//! - **Lazy dispatch**: [`LazySerializer`](dispatcher::LazySerializer), the
//!   facade that resolves normalizers and encoders on first use
//! - **Base mechanism**: [`BaseSerializer`](backend::BaseSerializer)
//! - **Configuration**: [`DispatcherConfig`](config::DispatcherConfig)
//! - **Registries**: [`ServiceRegistry`](registry::ServiceRegistry), plus
//!   `inventory`-collected components behind the `inventory` feature
//! - **Standard components**: JSON encoder, serde-backed normalizer
//! - **Testing utilities**: call-counting registry, recording components

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use lazyser_core;

// Modules
pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod encoders;
pub mod normalizers;
pub mod registry;
pub mod testing;

#[cfg(feature = "inventory")]
pub use inventory;
