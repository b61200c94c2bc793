use serde_json::Value;
use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Every failure a hydration call can surface.
///
/// No variant is ever caught or retried internally; each one aborts the
/// current [`set`](crate::Hydrator::set) call and propagates to the caller.
/// A failure leaves the addressed field untouched, but fields set by
/// earlier calls in a chain stay mutated.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HydrateError {
    /// A required key was absent from the source map.
    #[error("Required field {0} not found")]
    RequiredFieldMissing(String),

    /// The target type has no field with the requested name.
    #[error("Property \"{name}\" not found in \"{type_path}\"")]
    PropertyNotFound {
        name: String,
        type_path: &'static str,
    },

    /// The enum conversion was handed something other than a type name.
    #[error("param must be a type name in {context}, it was {actual}")]
    ParamNotName {
        context: &'static str,
        actual: &'static str,
    },

    /// The callback conversion was handed something other than a callback.
    #[error("param must be a callback in {context}, it was {actual}")]
    ParamNotCallable {
        context: &'static str,
        actual: &'static str,
    },

    /// No registered enum answers to the given name.
    #[error("param must be a registered enum type, it was \"{0}\"")]
    UnknownEnum(String),

    /// The named enum exists, but no member's underlying value matches.
    #[error("no member of `{type_path}` matches value `{value}`")]
    UnknownEnumMember {
        type_path: &'static str,
        value: Value,
    },

    /// The JSON conversion received a non-string raw value.
    #[error("JSON conversion expects a string, it was {actual}")]
    JsonNotString { actual: &'static str },

    /// The JSON conversion received a malformed document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The date-time conversion could not interpret its input.
    #[error("cannot interpret \"{0}\" as a date-time")]
    DateTimeUnparseable(String),

    /// The epoch-seconds input lies outside the representable range.
    #[error("timestamp {0} is out of the representable date-time range")]
    DateTimeOutOfRange(i64),

    /// A converted value does not fit the declared field type.
    #[error("cannot store a {found} value into a `{expected}` field")]
    MismatchedTypes {
        expected: &'static str,
        found: &'static str,
    },

    /// A field setter was invoked on a foreign target type.
    #[error("field setter for `{expected}` received a different target type")]
    TargetMismatch { expected: &'static str },
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::HydrateError;

    #[test]
    fn messages_name_the_offender() {
        let err = HydrateError::RequiredFieldMissing("age".into());
        assert_eq!(err.to_string(), "Required field age not found");

        let err = HydrateError::PropertyNotFound {
            name: "ages".into(),
            type_path: "demo::Person",
        };
        assert_eq!(
            err.to_string(),
            "Property \"ages\" not found in \"demo::Person\""
        );
    }
}
