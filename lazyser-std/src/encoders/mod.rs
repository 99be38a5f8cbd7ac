//! Standard encoder implementations.

pub mod json;

pub use json::JsonEncoder;
