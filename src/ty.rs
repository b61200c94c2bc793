use core::fmt;

use serde_json::Value;

use crate::{CastValue, HydrateError};

// -----------------------------------------------------------------------------
// Type

/// The closed set of conversions a field can declare.
///
/// A `Type` carries no behavior of its own; it is the tag consumed by the
/// conversion dispatch in [`cast`](crate::cast).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Coerce to a boolean using the source data model's truthiness rules.
    Bool,
    /// Hand the raw value to the callback supplied as [`Param::Callback`].
    Callback,
    /// Interpret epoch seconds or parse a date-time string.
    DateTime,
    /// Look up an enum member by underlying value, in the type named by
    /// [`Param::Name`].
    Enum,
    /// Coerce to a floating-point number, leniently.
    Float,
    /// Coerce to an integer, leniently.
    Integer,
    /// Decode a string containing an encoded JSON document.
    Json,
    /// Identity; the raw value passes through unchanged.
    Raw,
    /// Coerce to the value's natural textual representation.
    String,
}

// -----------------------------------------------------------------------------
// Param

/// The conversion parameter accepted by [`set`](crate::Hydrator::set).
///
/// Its valid shape depends on the declared [`Type`]: [`Type::Enum`]
/// requires [`Param::Name`], [`Type::Callback`] requires
/// [`Param::Callback`], every other type ignores it.
///
/// # Examples
///
/// ```
/// use simple_hydrator::{CastValue, HydrateError, Param};
///
/// let doubler = |value: &serde_json::Value| -> Result<CastValue, HydrateError> {
///     Ok(CastValue::from(value.as_i64().unwrap_or(0) * 2))
/// };
/// let param = Param::Callback(&doubler);
///
/// assert_eq!(param.kind(), "callback");
/// ```
#[derive(Clone, Copy, Default)]
pub enum Param<'a> {
    /// No parameter.
    #[default]
    None,
    /// The name (or full path) of a registered enum type.
    Name(&'a str),
    /// A conversion of the caller's own; its result is written unchanged.
    Callback(&'a dyn Fn(&Value) -> Result<CastValue, HydrateError>),
}

impl Param<'_> {
    /// A static name for the parameter shape, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Param::None => "none",
            Param::Name(_) => "a type name",
            Param::Callback(_) => "callback",
        }
    }
}

impl fmt::Debug for Param<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::None => f.write_str("None"),
            Param::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Param::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}
