//! Components declared next to their definition and collected via `inventory`.

use lazyser_core::Component;

/// A component factory submitted to a distributed collection.
///
/// Use `inventory::submit!` directly, or the `#[component("id")]` attribute
/// from `lazyser-macros`:
///
/// ```rust,ignore
/// inventory::submit! {
///     ComponentRegistration::new("svc.json_encoder", || Component::encoder(JsonEncoder::new()))
/// }
/// ```
pub struct ComponentRegistration {
    /// The identifier the component is registered under.
    pub id: &'static str,
    /// Builds the component. Called at most once per built registry.
    pub factory: fn() -> Component,
}

impl ComponentRegistration {
    /// Create a new registration entry.
    pub const fn new(id: &'static str, factory: fn() -> Component) -> Self {
        Self { id, factory }
    }
}

inventory::collect!(ComponentRegistration);

/// All submitted registrations, sorted by identifier.
///
/// Link order decides `inventory`'s iteration order; sorting keeps the
/// result stable across builds.
pub fn registrations() -> Vec<&'static ComponentRegistration> {
    let mut entries: Vec<&'static ComponentRegistration> =
        inventory::iter::<ComponentRegistration>.into_iter().collect();
    entries.sort_by_key(|entry| entry.id);
    entries
}
