//! Shared fixtures for integration tests.

#![allow(dead_code)]

use lazyser::{
    encoders::JsonEncoder,
    normalizers::SerdeNormalizer,
    registry::ServiceRegistry,
    testing::{CountingRegistry, RecordingNormalizer, StubEncoder},
};
use serde::{Deserialize, Serialize};

pub const JSON_ENCODER: &str = "svc.json_encoder";
pub const STUB_ENCODER: &str = "svc.stub_encoder";
pub const USER_NORMALIZER: &str = "svc.user_normalizer";
pub const ORDER_NORMALIZER: &str = "svc.order_normalizer";
pub const GENERIC_NORMALIZER: &str = "svc.generic_normalizer";
pub const TEXT_NORMALIZER: &str = "svc.text_normalizer";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn ada() -> Self {
        Self {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub number: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub total: u64,
}

/// A registry with every fixture component, wrapped for call counting.
pub fn services() -> CountingRegistry<ServiceRegistry> {
    CountingRegistry::new(
        ServiceRegistry::builder()
            .encoder(JSON_ENCODER, JsonEncoder::new)
            .encoder(STUB_ENCODER, || StubEncoder::new("stub"))
            .normalizer(USER_NORMALIZER, SerdeNormalizer::<User>::new)
            .normalizer(ORDER_NORMALIZER, || RecordingNormalizer::any("order"))
            .normalizer(GENERIC_NORMALIZER, || RecordingNormalizer::any("generic"))
            .normalizer(TEXT_NORMALIZER, || {
                RecordingNormalizer::for_type::<String>("text")
            })
            .build(),
    )
}

pub fn type_name<T>() -> &'static str {
    std::any::type_name::<T>()
}
