use core::any::Any;
use core::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::HydrateError;

// -----------------------------------------------------------------------------
// DataMap

/// The source data a [`Hydrator`](crate::Hydrator) reads from: string keys
/// mapped to already-decoded dynamic values.
///
/// The hydrator never mutates a `DataMap` and never retains it beyond the
/// current call.
pub type DataMap = serde_json::Map<String, Value>;

// -----------------------------------------------------------------------------
// CastValue

/// The output of a conversion; the value a field setter receives.
///
/// Scalar conversions produce the canonical variants. Enum members and
/// callback results travel type-erased in [`CastValue::Boxed`] and are
/// recovered by the receiving field through [`CastValue::take`].
///
/// # Examples
///
/// ```
/// use simple_hydrator::CastValue;
///
/// let value = CastValue::from(42_i64);
/// assert_eq!(value.kind(), "integer");
///
/// let value = CastValue::boxed(vec![1_u8, 2, 3]);
/// assert_eq!(value.take::<Vec<u8>>().unwrap(), vec![1, 2, 3]);
/// ```
pub enum CastValue {
    /// The data model's null sentinel; written as-is, no conversion ran.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    DateTime(DateTime<Utc>),
    /// A dynamic JSON value, produced by the JSON and raw conversions.
    Json(Value),
    /// A type-erased value; enum members and callback outputs.
    Boxed(Box<dyn Any>),
}

impl CastValue {
    /// Boxes an arbitrary value into [`CastValue::Boxed`].
    #[inline]
    pub fn boxed<T: Any>(value: T) -> Self {
        CastValue::Boxed(Box::new(value))
    }

    /// Recovers a `T` out of [`CastValue::Boxed`].
    ///
    /// Returns the value back unchanged if it is not boxed, or boxes a
    /// different type.
    pub fn take<T: Any>(self) -> Result<T, Self> {
        match self {
            CastValue::Boxed(boxed) => match boxed.downcast::<T>() {
                Ok(boxed) => Ok(*boxed),
                Err(boxed) => Err(CastValue::Boxed(boxed)),
            },
            other => Err(other),
        }
    }

    /// A static name for the variant, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            CastValue::Null => "null",
            CastValue::Bool(_) => "boolean",
            CastValue::Int(_) => "integer",
            CastValue::Float(_) => "float",
            CastValue::Str(_) => "string",
            CastValue::DateTime(_) => "date-time",
            CastValue::Json(_) => "json",
            CastValue::Boxed(_) => "boxed",
        }
    }
}

impl fmt::Debug for CastValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastValue::Null => f.write_str("Null"),
            CastValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            CastValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
            CastValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
            CastValue::Str(v) => f.debug_tuple("Str").field(v).finish(),
            CastValue::DateTime(v) => f.debug_tuple("DateTime").field(v).finish(),
            CastValue::Json(v) => f.debug_tuple("Json").field(v).finish(),
            CastValue::Boxed(_) => f.write_str("Boxed(..)"),
        }
    }
}

impl From<bool> for CastValue {
    #[inline]
    fn from(value: bool) -> Self {
        CastValue::Bool(value)
    }
}

impl From<i64> for CastValue {
    #[inline]
    fn from(value: i64) -> Self {
        CastValue::Int(value)
    }
}

impl From<f64> for CastValue {
    #[inline]
    fn from(value: f64) -> Self {
        CastValue::Float(value)
    }
}

impl From<&str> for CastValue {
    #[inline]
    fn from(value: &str) -> Self {
        CastValue::Str(value.to_owned())
    }
}

impl From<String> for CastValue {
    #[inline]
    fn from(value: String) -> Self {
        CastValue::Str(value)
    }
}

impl From<Value> for CastValue {
    #[inline]
    fn from(value: Value) -> Self {
        CastValue::Json(value)
    }
}

impl From<DateTime<Utc>> for CastValue {
    #[inline]
    fn from(value: DateTime<Utc>) -> Self {
        CastValue::DateTime(value)
    }
}

// -----------------------------------------------------------------------------
// HydrateValue

/// A type a field setter can build out of a [`CastValue`].
///
/// This is the typed end of the write path: the setter generated by
/// [`#[derive(Hydrate)]`](crate::derive::Hydrate) calls `from_cast` for
/// the field's declared type and assigns the result. A shape the type
/// cannot absorb fails with [`HydrateError::MismatchedTypes`].
///
/// Implementations exist for the scalar primitives, `String`,
/// [`serde_json::Value`], [`DateTime<Utc>`], `Option<T>` (absorbing
/// [`CastValue::Null`] as `None`), and every
/// [`#[derive(HydrateEnum)]`](crate::derive::HydrateEnum) type.
pub trait HydrateValue: Sized + 'static {
    /// Builds `Self` from a converted value.
    fn from_cast(value: CastValue) -> Result<Self, HydrateError>;
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::CastValue;

    #[test]
    fn take_recovers_boxed_values_only() {
        let value = CastValue::boxed(7_u16);
        assert_eq!(value.take::<u16>().unwrap(), 7);

        let value = CastValue::boxed(7_u16);
        assert!(value.take::<u32>().is_err());

        assert!(CastValue::Int(7).take::<i64>().is_err());
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(CastValue::Null.kind(), "null");
        assert_eq!(CastValue::from("x").kind(), "string");
        assert_eq!(CastValue::boxed(1_u8).kind(), "boxed");
    }
}
