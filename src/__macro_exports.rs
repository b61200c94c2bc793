//! Items referenced by generated derive code. Not public API; every item
//! in here may change without notice.

use core::any::Any;

use crate::HydrateError;

/// Downcasts the erased write target back to the struct a setter was
/// generated for.
pub fn downcast_target<T: Any>(target: &mut dyn Any) -> Result<&mut T, HydrateError> {
    target
        .downcast_mut::<T>()
        .ok_or(HydrateError::TargetMismatch {
            expected: core::any::type_name::<T>(),
        })
}

#[cfg(feature = "auto_register")]
pub use inventory;

/// One auto-registration submission: a function returning the metadata
/// to collect into [`EnumRegistry::with_registered`].
///
/// [`EnumRegistry::with_registered`]: crate::registry::EnumRegistry::with_registered
#[cfg(feature = "auto_register")]
pub struct EnumRegistration(pub fn() -> &'static crate::registry::EnumMeta);

#[cfg(feature = "auto_register")]
inventory::collect!(EnumRegistration);
