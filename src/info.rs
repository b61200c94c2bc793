//! Compile-time field tables: the write capability behind
//! [`Hydrator::set`](crate::Hydrator::set).
//!
//! There is no runtime reflection here. [`#[derive(Hydrate)]`](crate::derive::Hydrate)
//! generates one [`FieldInfo`] per named field, each carrying a setter
//! that lives in the defining module and therefore reaches the field no
//! matter its declared visibility.

use core::any::Any;

use crate::{CastValue, HydrateError};

// -----------------------------------------------------------------------------
// FieldInfo

/// The setter signature stored in a [`FieldInfo`].
///
/// The erased target is downcast back to the concrete struct, then the
/// field is assigned through
/// [`HydrateValue::from_cast`](crate::HydrateValue::from_cast).
pub type FieldSetter = fn(&mut dyn Any, CastValue) -> Result<(), HydrateError>;

/// A writable handle on one named field of one struct type.
///
/// # Examples
///
/// ```
/// use simple_hydrator::{CastValue, Hydrate, derive::Hydrate};
///
/// #[derive(Hydrate, Default)]
/// struct Counter {
///     count: i64,
/// }
///
/// let info = Counter::struct_info().field("count").unwrap();
/// assert_eq!(info.name(), "count");
///
/// let mut counter = Counter::default();
/// info.set(&mut counter, CastValue::Int(3)).unwrap();
/// assert_eq!(counter.count, 3);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FieldInfo {
    name: &'static str,
    setter: FieldSetter,
}

impl FieldInfo {
    /// Creates a new `FieldInfo` for the field named `name`.
    #[inline]
    pub const fn new(name: &'static str, setter: FieldSetter) -> Self {
        Self { name, setter }
    }

    /// Returns the field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Writes `value` into this field of `target`.
    ///
    /// Fails with [`HydrateError::TargetMismatch`] if `target` is not an
    /// instance of the type this handle was generated for, or with a
    /// conversion error if the value does not fit the field.
    #[inline]
    pub fn set(&self, target: &mut dyn Any, value: CastValue) -> Result<(), HydrateError> {
        (self.setter)(target, value)
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// A container for compile-time named struct info.
///
/// Fields keep their declaration order; [`field`](StructInfo::field) is a
/// linear scan, which is why the [`Hydrator`](crate::Hydrator) memoizes
/// resolved handles instead of scanning on every write.
///
/// # Examples
///
/// ```
/// use simple_hydrator::{Hydrate, derive::Hydrate};
///
/// #[derive(Hydrate)]
/// struct Pair {
///     left: i64,
///     right: i64,
/// }
///
/// let info = Pair::struct_info();
/// assert_eq!(info.type_name(), "Pair");
/// assert_eq!(info.field_len(), 2);
/// assert_eq!(info.index_of("right"), Some(1));
/// assert!(info.field("middle").is_none());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct StructInfo {
    type_path: &'static str,
    type_name: &'static str,
    fields: &'static [FieldInfo],
}

impl StructInfo {
    /// Creates a new [`StructInfo`].
    ///
    /// The order of internal fields is fixed, depends on the input order.
    #[inline]
    pub const fn new(
        type_path: &'static str,
        type_name: &'static str,
        fields: &'static [FieldInfo],
    ) -> Self {
        Self {
            type_path,
            type_name,
            fields,
        }
    }

    /// Returns the full path of the struct type, e.g. `demo::Person`.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Returns the bare name of the struct type, e.g. `Person`.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the [`FieldInfo`] for the given `name`, if present.
    pub fn field(&self, name: &str) -> Option<&'static FieldInfo> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns the [`FieldInfo`] at the given index, if present.
    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&'static FieldInfo> {
        self.fields.get(index)
    }

    /// Gets the index of the field with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    /// Returns the number of fields in the struct.
    #[inline]
    pub const fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Returns an iterator over the fields in declaration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static FieldInfo> {
        self.fields.iter()
    }
}

// -----------------------------------------------------------------------------
// Hydrate

/// A struct type whose fields a [`Hydrator`](crate::Hydrator) can set.
///
/// Implemented by [`#[derive(Hydrate)]`](crate::derive::Hydrate) on
/// structs with named fields; the derive builds the [`StructInfo`] table
/// once, as `'static` data.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be hydrated",
    note = "consider annotating `{Self}` with `#[derive(Hydrate)]`"
)]
pub trait Hydrate: Any {
    /// Returns the field table of this type.
    fn struct_info() -> &'static StructInfo;
}

// -----------------------------------------------------------------------------
// Tests
