//! Standard normalizer implementations.

pub mod typed;

pub use typed::{SerdeNormalizer, SerdeNormalizerError};
