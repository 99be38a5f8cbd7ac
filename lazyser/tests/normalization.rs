//! Lazy normalizer resolution through the public API.

use lazyser::{
    DispatcherConfig, LazySerializer, PropertyFilter, SerializerError, testing::RecordingNormalizer,
};
use serde_json::json;
use std::sync::Arc;

mod common;
use common::{
    GENERIC_NORMALIZER, ORDER_NORMALIZER, Invoice, Order, TEXT_NORMALIZER, USER_NORMALIZER, User,
    services, type_name,
};

fn mapped_config() -> DispatcherConfig {
    DispatcherConfig::builder()
        .normalizer_for::<User>(USER_NORMALIZER)
        .normalizer_for::<Order>(ORDER_NORMALIZER)
        .build()
        .unwrap()
}

#[test]
fn test_mapped_normalizer_resolved_once() {
    let registry = services();
    let serializer = LazySerializer::new(mapped_config(), registry.clone());

    let first = serializer
        .normalize_for_type(&User::ada(), "json", None)
        .unwrap();
    let second = serializer
        .normalize_for_type(&User::ada(), "json", None)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first["email"], json!("ada@example.com"));
    assert_eq!(registry.get_count(USER_NORMALIZER), 1);
    assert_eq!(serializer.backend().normalizers().len(), 1);
}

#[test]
fn test_mapped_denormalizer_resolved_once() {
    let registry = services();
    let serializer = LazySerializer::new(mapped_config(), registry.clone());
    let data = json!({ "id": 1, "name": "Ada", "email": "ada@example.com" });

    let user: User = serializer.denormalize_into(&data, Some("json")).unwrap();
    let again: User = serializer.denormalize_into(&data, Some("json")).unwrap();

    assert_eq!(user, User::ada());
    assert_eq!(again, User::ada());
    assert_eq!(registry.get_count(USER_NORMALIZER), 1);
}

#[test]
fn test_mapping_is_trusted_without_probing() {
    // The recording normalizer's probe only accepts `String`, but the
    // explicit mapping for `Order` bypasses the probe.
    let registry = lazyser::testing::CountingRegistry::new(
        lazyser::registry::ServiceRegistry::builder()
            .normalizer(TEXT_NORMALIZER, || {
                RecordingNormalizer::for_type::<String>("text")
            })
            .build(),
    );
    let config = DispatcherConfig::builder()
        .normalizer_for::<Order>(TEXT_NORMALIZER)
        .build()
        .unwrap();
    let serializer = LazySerializer::new(config, registry);

    let value = serializer
        .normalize_for_type(&Order { number: 3 }, "json", None)
        .unwrap();
    assert_eq!(value["normalizer"], json!("text"));
}

#[test]
fn test_cache_takes_precedence_over_mapping() {
    let registry = services();
    let serializer = LazySerializer::new(mapped_config(), registry.clone());
    let sentinel = RecordingNormalizer::any("sentinel");

    serializer.seed_resolved(type_name::<Order>(), Some("json"), Arc::new(sentinel.clone()));
    let value = serializer
        .normalize_for_type(&Order { number: 7 }, "json", None)
        .unwrap();

    assert_eq!(value["normalizer"], json!("sentinel"));
    assert_eq!(sentinel.normalized(), vec![type_name::<Order>().to_string()]);
    assert_eq!(registry.get_count(ORDER_NORMALIZER), 0);
}

#[test]
fn test_defaults_activate_once_in_order() {
    let registry = services();
    let config = DispatcherConfig::builder()
        .default_normalizer(TEXT_NORMALIZER)
        .default_normalizer(GENERIC_NORMALIZER)
        .build()
        .unwrap();
    let serializer = LazySerializer::new(config, registry.clone());

    // `Invoice` is refused by the text normalizer's probe and falls to the second default.
    let invoice = serializer
        .normalize_for_type(&Invoice { total: 10 }, "json", None)
        .unwrap();
    assert_eq!(invoice["normalizer"], json!("generic"));

    // A `String` matches both; the earlier default wins.
    let text = serializer
        .normalize_for_type(&"hello".to_string(), "json", None)
        .unwrap();
    assert_eq!(text["normalizer"], json!("text"));

    assert!(serializer.defaults_loaded());
    assert_eq!(registry.get_count(TEXT_NORMALIZER), 1);
    assert_eq!(registry.get_count(GENERIC_NORMALIZER), 1);
    assert_eq!(serializer.backend().normalizers().len(), 2);
}

#[test]
fn test_defaults_only_scenario() {
    let registry = services();
    let config = DispatcherConfig::builder()
        .default_normalizer(GENERIC_NORMALIZER)
        .build()
        .unwrap();
    let serializer = LazySerializer::new(config, registry.clone());

    let value = serializer
        .normalize_for_type(&Order { number: 1 }, "json", None)
        .unwrap();

    assert_eq!(
        value,
        json!({ "normalizer": "generic", "type": type_name::<Order>() })
    );
    assert_eq!(serializer.resolved_count(), 0);
}

#[test]
fn test_mapped_type_does_not_activate_defaults() {
    let registry = services();
    let config = DispatcherConfig::builder()
        .normalizer_for::<User>(USER_NORMALIZER)
        .default_normalizer(GENERIC_NORMALIZER)
        .build()
        .unwrap();
    let serializer = LazySerializer::new(config, registry.clone());

    serializer
        .normalize_for_type(&User::ada(), "json", None)
        .unwrap();

    assert!(!serializer.defaults_loaded());
    assert_eq!(registry.get_count(GENERIC_NORMALIZER), 0);
}

#[test]
fn test_empty_configuration_is_unsupported() {
    let registry = services();
    let serializer = LazySerializer::new(DispatcherConfig::default(), registry.clone());

    let err = serializer
        .normalize_for_type(&Order { number: 1 }, "json", None)
        .unwrap_err();

    assert!(matches!(err, SerializerError::UnsupportedType { .. }));
    assert!(!serializer.defaults_loaded());
    assert_eq!(registry.total_calls(), 0);
}

#[test]
fn test_unknown_mapped_identifier_is_resolution_error() {
    let config = DispatcherConfig::builder()
        .normalizer_for::<Order>("svc.does_not_exist")
        .build()
        .unwrap();
    let serializer = LazySerializer::new(config, services());

    let err = serializer
        .normalize_for_type(&Order { number: 1 }, "json", None)
        .unwrap_err();
    assert!(matches!(
        err,
        SerializerError::Resolution(lazyser::ResolutionError::UnknownIdentifier(ref id))
            if id == "svc.does_not_exist"
    ));
    assert_eq!(serializer.resolved_count(), 0);
}

#[test]
fn test_mapping_to_encoder_is_wrong_kind() {
    let config = DispatcherConfig::builder()
        .normalizer_for::<Order>(common::JSON_ENCODER)
        .build()
        .unwrap();
    let serializer = LazySerializer::new(config, services());

    let err = serializer
        .normalize_for_type(&Order { number: 1 }, "json", None)
        .unwrap_err();
    assert!(matches!(
        err,
        SerializerError::Resolution(lazyser::ResolutionError::WrongKind { .. })
    ));
}

#[test]
fn test_property_filter_reaches_normalizer() {
    let serializer = LazySerializer::new(mapped_config(), services());
    let filter = PropertyFilter::new(["id", "name"]);

    let value = serializer
        .normalize_for_type(&User::ada(), "json", Some(&filter))
        .unwrap();
    assert_eq!(value, json!({ "id": 1, "name": "Ada" }));
}
