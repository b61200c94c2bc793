use core::any::TypeId;

use crate::hash::{HashMap, TypeIdMap};
use crate::info::{FieldInfo, StructInfo};
use crate::registry::{EnumRegistry, HydrateEnum};
use crate::{CastValue, DataMap, Hydrate, HydrateError, Param, Type, cast};

// -----------------------------------------------------------------------------
// AccessCache

/// Memoized field-handle resolution.
///
/// Keyed first by the target's [`TypeId`], then by field name within that
/// type's entry. `TypeId` is a stable type descriptor: unlike a
/// recyclable object-identity token, it cannot alias a different type
/// later, so entries stay valid for the cache's whole lifetime. Entries
/// are never evicted; the cache lives and dies with its [`Hydrator`].
#[derive(Default, Debug)]
pub(crate) struct AccessCache {
    types: TypeIdMap<TypeEntry>,
}

#[derive(Debug)]
struct TypeEntry {
    info: &'static StructInfo,
    fields: HashMap<&'static str, &'static FieldInfo>,
}

impl AccessCache {
    /// Resolves the writable handle for field `name` of type `T`.
    ///
    /// The scan through the field table runs at most once per
    /// `(type, field)` pair; later calls return the memoized handle.
    fn resolve<T: Hydrate>(&mut self, name: &str) -> Result<&'static FieldInfo, HydrateError> {
        let entry = self.types.get_or_insert(TypeId::of::<T>(), || TypeEntry {
            info: T::struct_info(),
            fields: HashMap::default(),
        });

        if let Some(field) = entry.fields.get(name).copied() {
            return Ok(field);
        }

        let Some(field) = entry.info.field(name) else {
            return Err(HydrateError::PropertyNotFound {
                name: name.to_owned(),
                type_path: entry.info.type_path(),
            });
        };
        entry.fields.insert(field.name(), field);
        Ok(field)
    }

    #[cfg(test)]
    fn type_len(&self) -> usize {
        self.types.len()
    }

    #[cfg(test)]
    fn field_len<T: Hydrate>(&self) -> usize {
        self.types
            .get_type::<T>()
            .map_or(0, |entry| entry.fields.len())
    }
}

// -----------------------------------------------------------------------------
// Hydrator

/// The field-setting engine.
///
/// One [`set`](Hydrator::set) call populates one field of an existing
/// object from an untyped source map, applying the declared [`Type`]
/// conversion. Calls chain through the returned `&mut Self`.
///
/// A `Hydrator` owns two pieces of state: the access cache (resolved
/// field handles, populated lazily, append-only) and the enum registry
/// consulted by [`Type::Enum`] conversions. Neither is shared between
/// instances, and a `Hydrator` is not meant to be shared across threads.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use simple_hydrator::{Hydrator, Param, Type, derive::Hydrate};
///
/// #[derive(Hydrate, Default)]
/// struct Article {
///     title: String,
///     views: i64,
/// }
///
/// # fn main() -> Result<(), simple_hydrator::HydrateError> {
/// let doc = json!({ "title": "On Hydration", "hits": "128" });
/// let data = doc.as_object().unwrap();
///
/// let mut article = Article::default();
/// Hydrator::new()
///     .set(&mut article, "title", data, "title", Type::String, true, Param::None)?
///     .set(&mut article, "views", data, "hits", Type::Integer, true, Param::None)?;
///
/// assert_eq!(article.title, "On Hydration");
/// assert_eq!(article.views, 128);
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug)]
pub struct Hydrator {
    cache: AccessCache,
    enums: EnumRegistry,
}

impl Hydrator {
    /// Creates a `Hydrator` whose enum registry holds every
    /// auto-registered [`HydrateEnum`] type.
    ///
    /// With the `auto_register` feature disabled this is equivalent to
    /// [`empty`](Hydrator::empty).
    pub fn new() -> Self {
        Self {
            cache: AccessCache::default(),
            enums: EnumRegistry::with_registered(),
        }
    }

    /// Creates a `Hydrator` with an empty enum registry.
    pub fn empty() -> Self {
        Self {
            cache: AccessCache::default(),
            enums: EnumRegistry::empty(),
        }
    }

    /// Registers the enum type `T` for [`Type::Enum`] conversions.
    pub fn register_enum<T: HydrateEnum>(&mut self) -> &mut Self {
        self.enums.register::<T>();
        self
    }

    /// Returns the enum registry this hydrator consults.
    pub fn enums(&self) -> &EnumRegistry {
        &self.enums
    }

    /// Sets one field of `target` from the source map.
    ///
    /// - If `key` is absent from `data`: fails with
    ///   [`HydrateError::RequiredFieldMissing`] when `required`, returns
    ///   untouched otherwise.
    /// - If the value at `key` is null, the field receives the null
    ///   sentinel directly and no conversion runs (the field type must
    ///   absorb it, which in practice means an `Option`).
    /// - Otherwise the raw value goes through the `ty` conversion, with
    ///   `param` where the conversion calls for one.
    /// - The converted value is written into the field named `name`,
    ///   resolved through the access cache;
    ///   [`HydrateError::PropertyNotFound`] if `T` has no such field.
    ///
    /// Returns `&mut Self`, so calls chain with `?`. Any failure aborts
    /// this call only; the addressed field is either fully set or left
    /// untouched, while fields from earlier calls in a chain keep their
    /// new values.
    pub fn set<T: Hydrate>(
        &mut self,
        target: &mut T,
        name: &str,
        data: &DataMap,
        key: &str,
        ty: Type,
        required: bool,
        param: Param<'_>,
    ) -> Result<&mut Self, HydrateError> {
        let Some(raw) = data.get(key) else {
            if required {
                return Err(HydrateError::RequiredFieldMissing(key.to_owned()));
            }
            return Ok(self);
        };

        let value = if raw.is_null() {
            CastValue::Null
        } else {
            cast::cast(raw, ty, param, &self.enums)?
        };

        self.cache.resolve::<T>(name)?.set(target, value)?;

        Ok(self)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{Value, json};

    use crate::derive::{Hydrate, HydrateEnum};
    use crate::{CastValue, DataMap, HydrateError, Hydrator, Param, Type};

    // Fields stay private to the module; the generated setters reach
    // them anyway.
    #[derive(Hydrate, Default)]
    struct Person {
        age: i64,
        nickname: Option<String>,
        created_at: Option<DateTime<Utc>>,
        payload: Option<Value>,
    }

    #[derive(HydrateEnum, Debug, PartialEq)]
    enum Priority {
        Low = 1,
        Medium = 2,
        High = 3,
    }

    #[derive(Hydrate, Default)]
    struct Ticket {
        priority: Option<Priority>,
    }

    fn map(value: Value) -> DataMap {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn sets_a_private_field_with_conversion() {
        let data = map(json!({ "age": "42" }));
        let mut person = Person::default();

        Hydrator::new()
            .set(&mut person, "age", &data, "age", Type::Integer, true, Param::None)
            .unwrap();

        assert_eq!(person.age, 42);
    }

    #[test]
    fn missing_required_key_fails_and_leaves_target_alone() {
        let data = map(json!({ "other": 1 }));
        let mut person = Person::default();
        person.age = 7;

        let err = Hydrator::new()
            .set(&mut person, "age", &data, "age", Type::Integer, true, Param::None)
            .unwrap_err();

        assert!(matches!(err, HydrateError::RequiredFieldMissing(key) if key == "age"));
        assert_eq!(person.age, 7);
    }

    #[test]
    fn missing_optional_key_is_a_no_op() {
        let data = map(json!({}));
        let mut person = Person::default();
        person.age = 7;

        Hydrator::new()
            .set(&mut person, "age", &data, "age", Type::Integer, false, Param::None)
            .unwrap();

        assert_eq!(person.age, 7);
    }

    #[test]
    fn null_short_circuits_every_conversion() {
        let data = map(json!({ "nickname": null }));
        let mut person = Person::default();
        person.nickname = Some("set".into());

        // A null value never reaches the conversion, so even an enum
        // declaration with a nonsense param succeeds.
        Hydrator::new()
            .set(&mut person, "nickname", &data, "nickname", Type::Enum, true, Param::None)
            .unwrap();

        assert_eq!(person.nickname, None);
    }

    #[test]
    fn datetime_field_from_epoch_seconds() {
        let data = map(json!({ "created": 1_700_000_000 }));
        let mut person = Person::default();

        Hydrator::new()
            .set(&mut person, "created_at", &data, "created", Type::DateTime, true, Param::None)
            .unwrap();

        assert_eq!(
            person.created_at,
            Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
        );
    }

    #[test]
    fn malformed_json_fails_and_leaves_the_field_untouched() {
        let data = map(json!({ "payload": "not valid json" }));
        let mut person = Person::default();

        let err = Hydrator::new()
            .set(&mut person, "payload", &data, "payload", Type::Json, true, Param::None)
            .unwrap_err();

        assert!(matches!(err, HydrateError::Json(_)));
        assert_eq!(person.payload, None);
    }

    #[test]
    fn callback_result_is_written_unchanged() {
        let data = map(json!({ "age": 21 }));
        let mut person = Person::default();

        let doubler = |value: &Value| -> Result<CastValue, HydrateError> {
            Ok(CastValue::Int(value.as_i64().unwrap_or(0) * 2))
        };
        Hydrator::new()
            .set(&mut person, "age", &data, "age", Type::Callback, true, Param::Callback(&doubler))
            .unwrap();

        assert_eq!(person.age, 42);
    }

    #[test]
    fn enum_member_is_matched_by_underlying_value() {
        let data = map(json!({ "priority": 2 }));
        let mut ticket = Ticket::default();

        Hydrator::new()
            .set(&mut ticket, "priority", &data, "priority", Type::Enum, true, Param::Name("Priority"))
            .unwrap();
        assert_eq!(ticket.priority, Some(Priority::Medium));

        let data = map(json!({ "priority": 5 }));
        let err = Hydrator::new()
            .set(&mut ticket, "priority", &data, "priority", Type::Enum, true, Param::Name("Priority"))
            .unwrap_err();
        assert!(matches!(err, HydrateError::UnknownEnumMember { .. }));
        assert_eq!(ticket.priority, Some(Priority::Medium));
    }

    #[test]
    fn unknown_field_names_the_target_type() {
        let data = map(json!({ "age": 1 }));
        let mut person = Person::default();

        let err = Hydrator::new()
            .set(&mut person, "ages", &data, "age", Type::Integer, true, Param::None)
            .unwrap_err();

        match err {
            HydrateError::PropertyNotFound { name, type_path } => {
                assert_eq!(name, "ages");
                assert!(type_path.ends_with("::Person"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn repeated_sets_reuse_the_cache() {
        let data = map(json!({ "age": "42" }));
        let mut hydrator = Hydrator::new();

        let mut person = Person::default();
        hydrator
            .set(&mut person, "age", &data, "age", Type::Integer, true, Param::None)
            .unwrap();
        assert_eq!(hydrator.cache.type_len(), 1);
        assert_eq!(hydrator.cache.field_len::<Person>(), 1);

        // Same arguments again: same value, same cache state.
        hydrator
            .set(&mut person, "age", &data, "age", Type::Integer, true, Param::None)
            .unwrap();
        assert_eq!(person.age, 42);
        assert_eq!(hydrator.cache.type_len(), 1);
        assert_eq!(hydrator.cache.field_len::<Person>(), 1);

        // A second instance of the same type shares the entry.
        let mut another = Person::default();
        hydrator
            .set(&mut another, "age", &data, "age", Type::Integer, true, Param::None)
            .unwrap();
        assert_eq!(another.age, 42);
        assert_eq!(hydrator.cache.type_len(), 1);
    }

    #[test]
    fn calls_chain_fluently() {
        let doc = json!({
            "age": 30,
            "nickname": "ada",
            "created": "2023-11-14T22:13:20Z",
        });
        let data = doc.as_object().unwrap();
        let mut person = Person::default();

        Hydrator::new()
            .set(&mut person, "age", data, "age", Type::Integer, true, Param::None)
            .unwrap()
            .set(&mut person, "nickname", data, "nickname", Type::String, true, Param::None)
            .unwrap()
            .set(&mut person, "created_at", data, "created", Type::DateTime, false, Param::None)
            .unwrap();

        assert_eq!(person.age, 30);
        assert_eq!(person.nickname.as_deref(), Some("ada"));
        assert_eq!(
            person.created_at,
            Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
        );
    }

    #[test]
    fn failure_mid_chain_keeps_earlier_fields() {
        let doc = json!({ "age": 30 });
        let data = doc.as_object().unwrap();
        let mut person = Person::default();

        let mut hydrator = Hydrator::new();
        let result = hydrator
            .set(&mut person, "age", data, "age", Type::Integer, true, Param::None)
            .and_then(|h| {
                h.set(&mut person, "nickname", data, "nickname", Type::String, true, Param::None)
            });

        assert!(matches!(
            result,
            Err(HydrateError::RequiredFieldMissing(key)) if key == "nickname"
        ));
        assert_eq!(person.age, 30);
    }
}
