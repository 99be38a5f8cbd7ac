//! # lazyser - Lazy-Loading Serializer
//!
//! `lazyser` is a serialization dispatcher whose normalizers and encoders are
//! named by identifier in configuration and resolved from a component
//! registry only when first needed. Each decision is remembered, so a given
//! `(type, format)` pair or format is resolved at most once.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lazyser::prelude::*;
//!
//! let config = DispatcherConfig::builder()
//!     .encoder("json", "svc.json_encoder")
//!     .normalizer_for::<User>("svc.user_normalizer")
//!     .build()?;
//!
//! let registry = ServiceRegistry::builder()
//!     .encoder("svc.json_encoder", JsonEncoder::new)
//!     .normalizer("svc.user_normalizer", SerdeNormalizer::<User>::new)
//!     .build();
//!
//! let serializer = LazySerializer::new(config, registry);
//! let text = serializer.serialize(&user, "json")?;
//! let back: User = serializer.deserialize_into(&text, "json")?;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use lazyser_core::{
    // Error types
    BoxError,
    // Components
    Component,
    ComponentKind,
    // Registry
    ComponentRegistry,
    Decoder,
    Encoder,
    Normalizer,
    // Objects
    Object,
    PropertyFilter,
    ResolutionError,
    // Backend
    SerializerBackend,
    SerializerError,
    Value,
};

pub use lazyser_std::{
    backend::BaseSerializer,
    config::{ConfigError, DispatcherConfig, DispatcherConfigBuilder},
    dispatcher::{LazySerializer, LazySerializerBuilder},
};

/// Component registries.
pub mod registry {
    #[cfg(feature = "inventory")]
    pub use lazyser_std::registry::ComponentRegistration;
    pub use lazyser_std::registry::{ServiceRegistry, ServiceRegistryBuilder};
}

/// Standard encoder implementations.
pub mod encoders {
    pub use lazyser_std::encoders::JsonEncoder;
}

/// Standard normalizer implementations.
pub mod normalizers {
    pub use lazyser_std::normalizers::{SerdeNormalizer, SerdeNormalizerError};
}

/// Testing utilities.
pub mod testing {
    pub use lazyser_std::testing::{CountingRegistry, RecordingNormalizer, StubEncoder};
}

/// Prelude module - common imports for lazyser.
///
/// # Usage
///
/// ```rust,ignore
/// use lazyser::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Component,
        ComponentRegistry,
        DispatcherConfig,
        Encoder,
        LazySerializer,
        Normalizer,
        Object,
        PropertyFilter,
        SerializerError,
        Value,
        encoders::JsonEncoder,
        normalizers::SerdeNormalizer,
        registry::ServiceRegistry,
    };
}

#[cfg(feature = "macros")]
pub use lazyser_macros::component;

#[cfg(feature = "inventory")]
pub use inventory;
