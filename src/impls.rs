//! [`HydrateValue`] implementations for the primitive field types.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{CastValue, HydrateError, HydrateValue};

#[inline]
pub(crate) fn mismatch(expected: &'static str, found: &CastValue) -> HydrateError {
    HydrateError::MismatchedTypes {
        expected,
        found: found.kind(),
    }
}

macro_rules! impl_hydrate_value_int {
    ($($ty:ty),* $(,)?) => {$(
        impl HydrateValue for $ty {
            fn from_cast(value: CastValue) -> Result<Self, HydrateError> {
                let value = match value.take::<Self>() {
                    Ok(value) => return Ok(value),
                    Err(value) => value,
                };
                match value {
                    CastValue::Int(raw) => <$ty>::try_from(raw).map_err(|_| {
                        HydrateError::MismatchedTypes {
                            expected: stringify!($ty),
                            found: "out-of-range integer",
                        }
                    }),
                    other => Err(mismatch(stringify!($ty), &other)),
                }
            }
        }
    )*};
}

impl_hydrate_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_hydrate_value_float {
    ($($ty:ty),* $(,)?) => {$(
        impl HydrateValue for $ty {
            fn from_cast(value: CastValue) -> Result<Self, HydrateError> {
                let value = match value.take::<Self>() {
                    Ok(value) => return Ok(value),
                    Err(value) => value,
                };
                match value {
                    CastValue::Float(raw) => Ok(raw as $ty),
                    CastValue::Int(raw) => Ok(raw as $ty),
                    other => Err(mismatch(stringify!($ty), &other)),
                }
            }
        }
    )*};
}

impl_hydrate_value_float!(f32, f64);

impl HydrateValue for bool {
    fn from_cast(value: CastValue) -> Result<Self, HydrateError> {
        let value = match value.take::<Self>() {
            Ok(value) => return Ok(value),
            Err(value) => value,
        };
        match value {
            CastValue::Bool(raw) => Ok(raw),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl HydrateValue for String {
    fn from_cast(value: CastValue) -> Result<Self, HydrateError> {
        let value = match value.take::<Self>() {
            Ok(value) => return Ok(value),
            Err(value) => value,
        };
        match value {
            CastValue::Str(raw) => Ok(raw),
            other => Err(mismatch("String", &other)),
        }
    }
}

impl HydrateValue for Value {
    fn from_cast(value: CastValue) -> Result<Self, HydrateError> {
        let value = match value.take::<Self>() {
            Ok(value) => return Ok(value),
            Err(value) => value,
        };
        match value {
            CastValue::Json(raw) => Ok(raw),
            other => Err(mismatch("serde_json::Value", &other)),
        }
    }
}

impl HydrateValue for DateTime<Utc> {
    fn from_cast(value: CastValue) -> Result<Self, HydrateError> {
        let value = match value.take::<Self>() {
            Ok(value) => return Ok(value),
            Err(value) => value,
        };
        match value {
            CastValue::DateTime(raw) => Ok(raw),
            other => Err(mismatch("DateTime<Utc>", &other)),
        }
    }
}

impl<T: HydrateValue> HydrateValue for Option<T> {
    fn from_cast(value: CastValue) -> Result<Self, HydrateError> {
        let value = match value.take::<Self>() {
            Ok(value) => return Ok(value),
            Err(value) => value,
        };
        match value {
            CastValue::Null => Ok(None),
            other => T::from_cast(other).map(Some),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
