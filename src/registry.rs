//! A registry of hydratable enum types.
//!
//! [`Type::Enum`](crate::Type::Enum) conversions name their target type
//! at the call site, so the [`Hydrator`](crate::Hydrator) needs a way to
//! go from a name to "the enum member whose underlying value equals the
//! raw value". [`#[derive(HydrateEnum)]`](crate::derive::HydrateEnum)
//! produces that lookup as a [`EnumMeta`]; this module stores and finds
//! them.

use core::any::Any;

use serde_json::Value;

use crate::hash::{HashMap, HashSet};
use crate::{CastValue, HydrateError};

// -----------------------------------------------------------------------------
// EnumMeta

/// Runtime metadata for one hydratable enum type.
///
/// Usually generated by [`#[derive(HydrateEnum)]`](crate::derive::HydrateEnum);
/// `new` is public for hand-written implementations.
#[derive(Clone, Copy)]
pub struct EnumMeta {
    type_path: &'static str,
    type_name: &'static str,
    from_value: fn(&Value) -> Result<CastValue, HydrateError>,
}

impl EnumMeta {
    /// Creates a new `EnumMeta`.
    #[inline]
    pub const fn new(
        type_path: &'static str,
        type_name: &'static str,
        from_value: fn(&Value) -> Result<CastValue, HydrateError>,
    ) -> Self {
        Self {
            type_path,
            type_name,
            from_value,
        }
    }

    /// Returns the full path of the enum type, e.g. `demo::Status`.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Returns the bare name of the enum type, e.g. `Status`.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the member whose underlying value equals `value`, boxed in
    /// a [`CastValue`].
    ///
    /// Matching is exact and type-sensitive: integer raw values match
    /// discriminants, string raw values match member names, nothing else
    /// matches. Fails with [`HydrateError::UnknownEnumMember`] otherwise.
    #[inline]
    pub fn from_value(&self, value: &Value) -> Result<CastValue, HydrateError> {
        (self.from_value)(value)
    }
}

impl core::fmt::Debug for EnumMeta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EnumMeta")
            .field("type_path", &self.type_path)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// HydrateEnum

/// An enum type whose members a [`Hydrator`](crate::Hydrator) can look up
/// by underlying value.
///
/// Implemented by [`#[derive(HydrateEnum)]`](crate::derive::HydrateEnum)
/// on enums with unit variants.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a hydratable enum",
    note = "consider annotating `{Self}` with `#[derive(HydrateEnum)]`"
)]
pub trait HydrateEnum: Any {
    /// Returns the registration metadata of this type.
    fn enum_meta() -> &'static EnumMeta;
}

// -----------------------------------------------------------------------------
// EnumRegistry

/// The store of registered enum types, indexed by full path and by bare
/// name.
///
/// Bare names are only usable while unambiguous: registering two enums
/// that share a name disables the short form for both, and lookups must
/// use the full path.
///
/// # Examples
///
/// ```
/// use simple_hydrator::derive::HydrateEnum;
/// use simple_hydrator::registry::EnumRegistry;
///
/// #[derive(HydrateEnum)]
/// enum Color {
///     Red = 1,
///     Green = 2,
/// }
///
/// let mut registry = EnumRegistry::empty();
/// registry.register::<Color>();
///
/// assert!(registry.find("Color").is_some());
/// assert!(registry.find("Colour").is_none());
/// ```
#[derive(Default, Debug)]
pub struct EnumRegistry {
    path_to_meta: HashMap<&'static str, &'static EnumMeta>,
    name_to_path: HashMap<&'static str, &'static str>,
    ambiguous_names: HashSet<&'static str>,
}

impl EnumRegistry {
    /// Creates an empty `EnumRegistry`.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            path_to_meta: HashMap::with_hasher(crate::hash::FixedHashState),
            name_to_path: HashMap::with_hasher(crate::hash::FixedHashState),
            ambiguous_names: HashSet::with_hasher(crate::hash::FixedHashState),
        }
    }

    /// Creates a registry holding every auto-registered enum type.
    ///
    /// With the `auto_register` feature disabled this is equivalent to
    /// [`empty`](EnumRegistry::empty).
    pub fn with_registered() -> Self {
        let mut registry = Self::empty();
        registry.auto_register();
        registry
    }

    /// Registers every `#[derive(HydrateEnum)]` type submitted through
    /// `inventory`. Repeated calls are cheap and insert no duplicates.
    ///
    /// Returns `true` when automatic registration is available.
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&mut self) -> bool {
        for registration in inventory::iter::<crate::__macro_exports::EnumRegistration> {
            self.register_meta((registration.0)());
        }
        true
    }

    /// Registers every `#[derive(HydrateEnum)]` type submitted through
    /// `inventory`. Repeated calls are cheap and insert no duplicates.
    ///
    /// Returns `true` when automatic registration is available.
    #[cfg(not(feature = "auto_register"))]
    #[inline(always)]
    pub fn auto_register(&mut self) -> bool {
        false
    }

    /// Registers the enum type `T` if it has not been registered already.
    #[inline]
    pub fn register<T: HydrateEnum>(&mut self) {
        self.register_meta(T::enum_meta());
    }

    /// Registers `meta` under its path and name.
    ///
    /// Returns `false`, changing nothing, if the path is already present.
    pub fn register_meta(&mut self, meta: &'static EnumMeta) -> bool {
        if self.path_to_meta.contains_key(meta.type_path()) {
            return false;
        }
        self.path_to_meta.insert(meta.type_path(), meta);

        let name = meta.type_name();
        if !self.ambiguous_names.contains(name) {
            if self.name_to_path.contains_key(name) {
                log::warn!("enum name `{name}` is ambiguous, lookup by bare name disabled");
                self.name_to_path.remove(name);
                self.ambiguous_names.insert(name);
            } else {
                self.name_to_path.insert(name, meta.type_path());
            }
        }
        true
    }

    /// Finds a registered enum by full path, then by bare name.
    ///
    /// Returns `None` for unknown names and for bare names that have
    /// become ambiguous.
    pub fn find(&self, name: &str) -> Option<&'static EnumMeta> {
        if let Some(meta) = self.path_to_meta.get(name).copied() {
            return Some(meta);
        }
        let path = self.name_to_path.get(name)?;
        self.path_to_meta.get(path).copied()
    }

    /// Whether a type with the given full path has been registered.
    #[inline]
    pub fn contains_path(&self, type_path: &str) -> bool {
        self.path_to_meta.contains_key(type_path)
    }

    /// Returns `true` if the given bare name matches multiple registered
    /// types.
    #[inline]
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.ambiguous_names.contains(name)
    }

    /// Returns the number of registered enum types.
    #[inline]
    pub fn len(&self) -> usize {
        self.path_to_meta.len()
    }

    /// Returns `true` if no enum type has been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path_to_meta.is_empty()
    }

    /// Returns an iterator over the registered [`EnumMeta`]s.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static EnumMeta> {
        self.path_to_meta.values().copied()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::EnumRegistry;
    use crate::derive::HydrateEnum;
    use crate::{CastValue, HydrateError};

    mod first {
        use crate::derive::HydrateEnum;

        #[derive(HydrateEnum, Debug, PartialEq)]
        pub enum Flag {
            Off = 0,
            On = 1,
        }
    }

    mod second {
        use crate::derive::HydrateEnum;

        #[derive(HydrateEnum, Debug, PartialEq)]
        pub enum Flag {
            No = 0,
            Yes = 1,
        }
    }

    #[test]
    fn members_match_by_discriminant_and_name() {
        let mut registry = EnumRegistry::empty();
        registry.register::<first::Flag>();

        let meta = registry.find("Flag").unwrap();
        let member = meta.from_value(&json!(1)).unwrap();
        assert_eq!(member.take::<first::Flag>().unwrap(), first::Flag::On);

        let member = meta.from_value(&json!("Off")).unwrap();
        assert_eq!(member.take::<first::Flag>().unwrap(), first::Flag::Off);

        assert!(matches!(
            meta.from_value(&json!(9)),
            Err(HydrateError::UnknownEnumMember { .. })
        ));
        // Matching is type-sensitive: a float never matches an integer
        // discriminant.
        assert!(meta.from_value(&json!(1.0)).is_err());
    }

    #[test]
    fn duplicate_bare_names_fall_back_to_paths() {
        let mut registry = EnumRegistry::empty();
        registry.register::<first::Flag>();
        registry.register::<second::Flag>();

        assert_eq!(registry.len(), 2);
        assert!(registry.is_ambiguous("Flag"));
        assert!(registry.find("Flag").is_none());

        let path = <first::Flag as crate::registry::HydrateEnum>::enum_meta().type_path();
        let meta = registry.find(path).unwrap();
        let member = meta.from_value(&json!(0)).unwrap();
        assert_eq!(member.take::<first::Flag>().unwrap(), first::Flag::Off);
    }

    #[test]
    fn repeated_registration_is_a_no_op() {
        let mut registry = EnumRegistry::empty();
        registry.register::<first::Flag>();
        registry.register::<first::Flag>();
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_ambiguous("Flag"));
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn derived_enums_are_collected_automatically() {
        let registry = EnumRegistry::with_registered();
        let path = <first::Flag as crate::registry::HydrateEnum>::enum_meta().type_path();
        assert!(registry.contains_path(path));
    }

    #[test]
    fn unknown_members_keep_the_raw_value_in_the_error() {
        let mut registry = EnumRegistry::empty();
        registry.register::<first::Flag>();

        let err = registry
            .find("Flag")
            .unwrap()
            .from_value(&json!("Maybe"))
            .unwrap_err();
        match err {
            HydrateError::UnknownEnumMember { type_path, value } => {
                assert!(type_path.ends_with("::Flag"));
                assert_eq!(value, json!("Maybe"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn derived_enums_absorb_cast_values_directly() {
        use crate::HydrateValue;

        let member = first::Flag::from_cast(CastValue::Int(1)).unwrap();
        assert_eq!(member, first::Flag::On);

        let member = first::Flag::from_cast(CastValue::Str("No".into()));
        assert!(member.is_err(), "wrong enum's member name must not match");

        let member = second::Flag::from_cast(CastValue::Str("No".into())).unwrap();
        assert_eq!(member, second::Flag::No);

        assert!(matches!(
            first::Flag::from_cast(CastValue::Bool(true)),
            Err(HydrateError::MismatchedTypes { .. })
        ));
    }
}
