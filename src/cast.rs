//! Type-directed value conversions.
//!
//! Pure functions of `(raw value, declared type, param)`; nothing here
//! touches the target object. The scalar coercions follow the lenient
//! rules of the untyped source data model: truthiness for booleans,
//! leading-numeric-prefix parsing for numbers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;

use crate::registry::EnumRegistry;
use crate::{CastValue, HydrateError, Param, Type};

// -----------------------------------------------------------------------------
// Dispatch

/// Converts `value` according to the declared [`Type`].
pub(crate) fn cast(
    value: &Value,
    ty: Type,
    param: Param<'_>,
    enums: &EnumRegistry,
) -> Result<CastValue, HydrateError> {
    match ty {
        Type::Bool => Ok(CastValue::Bool(cast_bool(value))),
        Type::Callback => cast_with_callback(value, param),
        Type::DateTime => cast_datetime(value).map(CastValue::DateTime),
        Type::Enum => cast_enum(value, param, enums),
        Type::Float => Ok(CastValue::Float(cast_float(value))),
        Type::Integer => Ok(CastValue::Int(cast_integer(value))),
        Type::Json => cast_json(value).map(CastValue::Json),
        Type::Raw => Ok(CastValue::Json(value.clone())),
        Type::String => Ok(CastValue::Str(cast_string(value))),
    }
}

// -----------------------------------------------------------------------------
// Scalar coercions

/// Coerces `value` to a boolean.
///
/// Falsy values: `null`, `false`, `0`, `0.0`, `""`, `"0"` and the empty
/// array. Everything else, objects included, is truthy.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use simple_hydrator::cast::cast_bool;
///
/// assert!(cast_bool(&json!(1)));
/// assert!(cast_bool(&json!("no")));
/// assert!(!cast_bool(&json!("0")));
/// assert!(!cast_bool(&json!([])));
/// ```
pub fn cast_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(raw) => *raw,
        Value::Number(raw) => raw.as_f64().is_some_and(|raw| raw != 0.0),
        Value::String(raw) => !raw.is_empty() && raw != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Coerces `value` to an integer.
///
/// Strings are parsed leniently: the longest leading numeric prefix
/// counts, and a string without one yields 0. Fractions truncate.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use simple_hydrator::cast::cast_integer;
///
/// assert_eq!(cast_integer(&json!("42")), 42);
/// assert_eq!(cast_integer(&json!("12abc")), 12);
/// assert_eq!(cast_integer(&json!("abc")), 0);
/// assert_eq!(cast_integer(&json!(3.9)), 3);
/// assert_eq!(cast_integer(&json!(true)), 1);
/// ```
pub fn cast_integer(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::Bool(raw) => *raw as i64,
        Value::Number(raw) => match raw.as_i64() {
            Some(raw) => raw,
            None => raw.as_f64().map_or(0, |raw| raw as i64),
        },
        Value::String(raw) => numeric_prefix(raw).map_or(0, |raw| raw as i64),
        Value::Array(items) => (!items.is_empty()) as i64,
        Value::Object(_) => 1,
    }
}

/// Coerces `value` to a floating-point number, with the same leniency as
/// [`cast_integer`].
pub fn cast_float(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(raw) => *raw as u8 as f64,
        Value::Number(raw) => raw.as_f64().unwrap_or(0.0),
        Value::String(raw) => numeric_prefix(raw).unwrap_or(0.0),
        Value::Array(items) => (!items.is_empty()) as u8 as f64,
        Value::Object(_) => 1.0,
    }
}

/// Coerces `value` to its natural textual representation.
///
/// Strings pass through unchanged; every other value renders as its
/// compact JSON text (`true`, `42`, `[1,2]`), except `null` which
/// renders empty.
pub fn cast_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

/// Parses the longest numeric prefix of `s`: an optional sign, digits,
/// an optional fraction and an optional exponent.
fn numeric_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();

    let mut index = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut end = 0;
    while index < bytes.len() && bytes[index].is_ascii_digit() {
        index += 1;
        end = index;
    }
    if index < bytes.len() && bytes[index] == b'.' {
        index += 1;
        while index < bytes.len() && bytes[index].is_ascii_digit() {
            index += 1;
            end = index;
        }
    }
    // An exponent only counts when digits follow it.
    if end > 0 && end == index && index < bytes.len() && matches!(bytes[index], b'e' | b'E') {
        let mut exp_end = index + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    if end == 0 {
        return None;
    }
    s[..end].parse::<f64>().ok()
}

// -----------------------------------------------------------------------------
// Date-time

/// Produces an immutable UTC date-time out of `value`.
///
/// Numbers, and strings that are numeric in full, are interpreted as Unix
/// timestamps in seconds. Any other string goes through flexible parsing:
/// RFC 3339, RFC 2822, then the common `Y-m-d H:M:S`, `Y-m-dTH:M:S` and
/// `Y-m-d` shapes, read as UTC.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use simple_hydrator::cast::cast_datetime;
///
/// let a = cast_datetime(&json!(1_700_000_000)).unwrap();
/// let b = cast_datetime(&json!("2023-11-14T22:13:20Z")).unwrap();
/// assert_eq!(a, b);
///
/// assert!(cast_datetime(&json!("not a date")).is_err());
/// ```
pub fn cast_datetime(value: &Value) -> Result<DateTime<Utc>, HydrateError> {
    match value {
        Value::Number(raw) => match raw.as_i64() {
            Some(secs) => from_epoch(secs),
            None => from_epoch(raw.as_f64().unwrap_or(0.0) as i64),
        },
        Value::String(raw) => match raw.trim().parse::<f64>() {
            Ok(secs) if secs.is_finite() => from_epoch(secs as i64),
            _ => parse_datetime_str(raw),
        },
        other => Err(HydrateError::DateTimeUnparseable(cast_string(other))),
    }
}

fn from_epoch(secs: i64) -> Result<DateTime<Utc>, HydrateError> {
    DateTime::from_timestamp(secs, 0).ok_or(HydrateError::DateTimeOutOfRange(secs))
}

fn parse_datetime_str(s: &str) -> Result<DateTime<Utc>, HydrateError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(s) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(parsed.and_utc());
        }
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(parsed.and_time(NaiveTime::MIN).and_utc());
    }
    Err(HydrateError::DateTimeUnparseable(s.to_owned()))
}

// -----------------------------------------------------------------------------
// JSON

/// Decodes a string containing an encoded JSON document.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use simple_hydrator::cast::cast_json;
///
/// let decoded = cast_json(&json!(r#"{"a": [1, 2]}"#)).unwrap();
/// assert_eq!(decoded, json!({"a": [1, 2]}));
///
/// assert!(cast_json(&json!("not valid json")).is_err());
/// assert!(cast_json(&json!(42)).is_err());
/// ```
pub fn cast_json(value: &Value) -> Result<Value, HydrateError> {
    let Value::String(encoded) = value else {
        return Err(HydrateError::JsonNotString {
            actual: json_kind(value),
        });
    };
    serde_json::from_str(encoded).map_err(HydrateError::Json)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// -----------------------------------------------------------------------------
// Enum and callback

pub(crate) fn cast_enum(
    value: &Value,
    param: Param<'_>,
    enums: &EnumRegistry,
) -> Result<CastValue, HydrateError> {
    let Param::Name(name) = param else {
        return Err(HydrateError::ParamNotName {
            context: "the enum conversion",
            actual: param.kind(),
        });
    };
    let Some(meta) = enums.find(name) else {
        return Err(HydrateError::UnknownEnum(name.to_owned()));
    };
    meta.from_value(value)
}

pub(crate) fn cast_with_callback(
    value: &Value,
    param: Param<'_>,
) -> Result<CastValue, HydrateError> {
    let Param::Callback(callback) = param else {
        return Err(HydrateError::ParamNotCallable {
            context: "the callback conversion",
            actual: param.kind(),
        });
    };
    callback(value)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    use super::*;

    #[test]
    fn bool_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!("0"), json!([])] {
            assert!(!cast_bool(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!(-2.5), json!("false"), json!([0]), json!({})] {
            assert!(cast_bool(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn integer_leniency() {
        assert_eq!(cast_integer(&json!("42")), 42);
        assert_eq!(cast_integer(&json!(" -7 items")), -7);
        assert_eq!(cast_integer(&json!("3.9kg")), 3);
        assert_eq!(cast_integer(&json!("2e3")), 2000);
        assert_eq!(cast_integer(&json!("12ex")), 12);
        assert_eq!(cast_integer(&json!("abc")), 0);
        assert_eq!(cast_integer(&json!(".5")), 0);
        assert_eq!(cast_integer(&json!([])), 0);
        assert_eq!(cast_integer(&json!(["x"])), 1);
    }

    #[test]
    fn float_leniency() {
        assert_eq!(cast_float(&json!("3.14xyz")), 3.14);
        assert_eq!(cast_float(&json!(".5")), 0.5);
        assert_eq!(cast_float(&json!("x")), 0.0);
        assert_eq!(cast_float(&json!(true)), 1.0);
    }

    #[test]
    fn string_representation() {
        assert_eq!(cast_string(&json!("as-is")), "as-is");
        assert_eq!(cast_string(&json!(true)), "true");
        assert_eq!(cast_string(&json!(42)), "42");
        assert_eq!(cast_string(&json!([1, 2])), "[1,2]");
        assert_eq!(cast_string(&json!(null)), "");
    }

    #[test]
    fn datetime_from_epoch_and_strings() {
        let expected = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(cast_datetime(&json!(1_700_000_000)).unwrap(), expected);
        assert_eq!(cast_datetime(&json!("1700000000")).unwrap(), expected);
        assert_eq!(
            cast_datetime(&json!("2023-11-14T22:13:20Z")).unwrap(),
            expected
        );
        assert_eq!(
            cast_datetime(&json!("2023-11-14 22:13:20")).unwrap(),
            expected
        );

        let midnight = cast_datetime(&json!("2023-11-14")).unwrap();
        assert_eq!(midnight, Utc.with_ymd_and_hms(2023, 11, 14, 0, 0, 0).unwrap());

        assert!(matches!(
            cast_datetime(&json!("yesterday-ish")),
            Err(HydrateError::DateTimeUnparseable(_))
        ));
        assert!(matches!(
            cast_datetime(&json!(i64::MAX)),
            Err(HydrateError::DateTimeOutOfRange(_))
        ));
    }

    #[test]
    fn json_round_trip() {
        let document = json!({ "id": 7, "tags": ["a", "b"], "nested": { "ok": true } });
        let encoded = serde_json::to_string(&document).unwrap();
        let decoded = cast_json(&Value::String(encoded)).unwrap();
        assert_eq!(decoded, document);
    }

    #[test]
    fn json_failures_carry_the_decoder_error() {
        let err = cast_json(&json!("not valid json")).unwrap_err();
        assert!(matches!(err, HydrateError::Json(_)));
        assert!(err.to_string().starts_with("JSON error: "));

        assert!(matches!(
            cast_json(&json!(42)),
            Err(HydrateError::JsonNotString { actual: "a number" })
        ));
    }

    #[test]
    fn callback_requires_a_callback_param() {
        let err = cast_with_callback(&json!(1), Param::None).unwrap_err();
        assert!(matches!(err, HydrateError::ParamNotCallable { .. }));

        let doubler = |value: &Value| -> Result<CastValue, HydrateError> {
            Ok(CastValue::Int(cast_integer(value) * 2))
        };
        let out = cast_with_callback(&json!(21), Param::Callback(&doubler)).unwrap();
        assert!(matches!(out, CastValue::Int(42)));
    }

    #[test]
    fn enum_requires_a_name_param() {
        let enums = EnumRegistry::empty();
        let err = cast_enum(&json!(1), Param::None, &enums).unwrap_err();
        assert!(matches!(
            err,
            HydrateError::ParamNotName { actual: "none", .. }
        ));

        let err = cast_enum(&json!(1), Param::Name("Nowhere"), &enums).unwrap_err();
        assert!(matches!(err, HydrateError::UnknownEnum(name) if name == "Nowhere"));
    }

    #[test]
    fn epoch_fixture_matches_chrono() {
        // Cross-check the fixture used throughout this module.
        let dt: DateTime<Utc> = "2023-11-14T22:13:20Z".parse().unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
    }
}
