//! Component registries.
//!
//! [`ServiceRegistry`] is a small container: identifiers map to factories,
//! and shared services are built on first request. With the `inventory`
//! feature, components can also be declared next to their definition and
//! gathered with [`ServiceRegistryBuilder::collected`].

#[cfg(feature = "inventory")]
pub mod collected;
pub mod service;

#[cfg(feature = "inventory")]
pub use collected::ComponentRegistration;
pub use service::{ServiceRegistry, ServiceRegistryBuilder};
