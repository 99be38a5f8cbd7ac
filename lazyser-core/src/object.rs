//! Object trait for values that can be normalized.

use std::any::Any;

/// A runtime value with a discoverable type name.
///
/// Every `Send + Sync + 'static` type is an `Object` through the blanket
/// implementation. The type name is [`std::any::type_name`] of the concrete
/// type, which is also the key used by type-to-identifier mappings.
///
/// Beware of boxed values: a `Box<dyn Object>` is itself an `Object` whose
/// type name is the box's. Pass `&*boxed` to normalize the inner value.
///
/// # Example
///
/// ```rust,ignore
/// struct User { id: u64 }
///
/// let user = User { id: 7 };
/// assert_eq!(user.type_name(), std::any::type_name::<User>());
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be normalized",
    label = "must be `Send + Sync + 'static`",
    note = "Objects passed to the serializer must be thread-safe and static."
)]
pub trait Object: Any + Send + Sync + 'static {
    /// The fully-qualified type name of the concrete value.
    fn type_name(&self) -> &'static str;

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> Object for T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn Object {
    /// Returns a reference to the concrete value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
