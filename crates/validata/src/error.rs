//! Error types: construction-time configuration errors, check names, and
//! validation failures.

use std::borrow::Cow;
use std::fmt;

use crate::value::{Key, Value};

// ============================================================================
// CHECK NAMES
// ============================================================================

/// The named check a value failed.
///
/// Rule-set checks are listed in evaluation order; the last three are
/// raised by [`FieldSpec`](crate::FieldSpec) itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Check {
    Types,
    AllowedValues,
    AllowedValuesNc,
    ResourceType,
    MaxLength,
    MinLength,
    MaxLengthChars,
    MinLengthChars,
    MaxValue,
    MinValue,
    Isa,
    Regex,
    Callback,
    /// A predicate from the `callbacks` map, by its name.
    NamedCallback(String),
    Mandatory,
    CallbackBefore,
    CallbackAfter,
}

impl Check {
    /// Stable name of the check, e.g. `"max_length"` or `"is_lc (callback)"`.
    #[must_use]
    pub fn name(&self) -> Cow<'static, str> {
        let name = match self {
            Self::Types => "types",
            Self::AllowedValues => "allowed_values",
            Self::AllowedValuesNc => "allowed_values_nc",
            Self::ResourceType => "resource_type",
            Self::MaxLength => "max_length",
            Self::MinLength => "min_length",
            Self::MaxLengthChars => "max_length_chars",
            Self::MinLengthChars => "min_length_chars",
            Self::MaxValue => "max_value",
            Self::MinValue => "min_value",
            Self::Isa => "isa",
            Self::Regex => "regex",
            Self::Callback => "callback",
            Self::NamedCallback(name) => return Cow::Owned(format!("{name} (callback)")),
            Self::Mandatory => "mandatory",
            Self::CallbackBefore => "callback before",
            Self::CallbackAfter => "callback after",
        };
        Cow::Borrowed(name)
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

/// Raised while constructing a rule set, field spec, spec collection or
/// record validator. Nothing is partially constructed when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The option name is not recognised in this scope.
    #[error("unknown {scope} option `{key}`")]
    UnknownOption { scope: &'static str, key: String },

    /// The option is recognised but its value has the wrong shape.
    #[error("invalid {scope} option `{key}`: {reason}")]
    InvalidOption {
        scope: &'static str,
        key: String,
        reason: String,
    },

    /// Two options cannot be combined.
    #[error("conflicting {scope} options: {reason}")]
    Conflict { scope: &'static str, reason: String },

    /// A spec collection key is neither a non-empty name nor an index.
    #[error("invalid spec key: {reason}")]
    InvalidKey { reason: String },

    /// The same key was given twice when building a spec collection.
    #[error("duplicate spec key `{key}`")]
    DuplicateKey { key: Key },

    /// The `regex` option does not compile.
    #[error("invalid regex `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(
        scope: &'static str,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            scope,
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown(scope: &'static str, key: impl Into<String>) -> Self {
        Self::UnknownOption {
            scope,
            key: key.into(),
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownOption { .. } => "CONFIG_UNKNOWN_OPTION",
            Self::InvalidOption { .. } => "CONFIG_INVALID_OPTION",
            Self::Conflict { .. } => "CONFIG_CONFLICT",
            Self::InvalidKey { .. } => "CONFIG_INVALID_KEY",
            Self::DuplicateKey { .. } => "CONFIG_DUPLICATE_KEY",
            Self::InvalidPattern { .. } => "CONFIG_INVALID_PATTERN",
        }
    }
}

// ============================================================================
// REJECTION
// ============================================================================

/// Outcome of a failed single-value validation: the failed check and the
/// value as it stood when the check failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", render(None, .check, .value))]
pub struct Rejection {
    pub check: Check,
    pub value: Value,
}

impl Rejection {
    #[must_use]
    pub fn new(check: Check, value: Value) -> Self {
        Self { check, value }
    }

    /// Converts into an unnamed [`ValidationError::Value`].
    #[must_use]
    pub fn into_error(self) -> ValidationError {
        ValidationError::Value {
            check: self.check,
            value: self.value,
        }
    }

    /// Converts into a [`ValidationError::Named`] for the given field.
    #[must_use]
    pub fn into_named(self, name: impl Into<String>) -> ValidationError {
        ValidationError::Named {
            name: name.into(),
            check: self.check,
            value: self.value,
        }
    }
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// A validation failure.
///
/// Record validation is fail-fast: one error describes the first failing
/// field only.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A stand-alone value failed a check.
    #[error("{}", render(None, .check, .value))]
    Value { check: Check, value: Value },

    /// A named or positional record field failed a check.
    #[error("{}", render(Some(.name), .check, .value))]
    Named {
        name: String,
        check: Check,
        value: Value,
    },

    /// The record holds a key no spec covers.
    #[error("Unknown key '{key}'")]
    UnknownKey { key: String },

    /// More positional values were given than there are specs.
    #[error("Too many arguments given ({given}) for the number of specs ({expected})")]
    TooManyValues { given: usize, expected: usize },
}

impl ValidationError {
    /// The failed check, if this error carries one.
    #[must_use]
    pub fn check(&self) -> Option<&Check> {
        match self {
            Self::Value { check, .. } | Self::Named { check, .. } => Some(check),
            _ => None,
        }
    }

    /// The field name (prefix included) or unknown key, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            Self::UnknownKey { key } => Some(key),
            _ => None,
        }
    }

    /// The offending value, if this error carries one.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value { value, .. } | Self::Named { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Message placeholder for the offending scalar value: booleans as
    /// `true`/`false`, strings double-quoted, other scalars stringified.
    #[must_use]
    pub fn placeholder(&self) -> Option<String> {
        self.value().and_then(placeholder)
    }

    /// Simplified description of the offending value, e.g. `string 'abc'`.
    #[must_use]
    pub fn value_simple(&self) -> Option<String> {
        let value = self.value()?;
        Some(match value {
            Value::Bool(b) => b.to_string(),
            v if v.is_scalar() => {
                let s = v.scalar_string().unwrap_or_default();
                format!("{} '{s}'", v.type_name())
            }
            v => v.type_name().to_owned(),
        })
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Value { .. } => "VALIDATION_VALUE",
            Self::Named { .. } => "VALIDATION_FIELD",
            Self::UnknownKey { .. } => "VALIDATION_UNKNOWN_KEY",
            Self::TooManyValues { .. } => "VALIDATION_TOO_MANY_VALUES",
        }
    }
}

fn placeholder(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::String(s) => Some(format!("\"{s}\"")),
        v => v.scalar_string().map(Cow::into_owned),
    }
}

fn render(name: Option<&String>, check: &Check, value: &Value) -> String {
    let mut message = match name {
        Some(name) => format!("Parameter \"{name}\" failed validation \"{check}\""),
        None => format!("Failed validation \"{check}\""),
    };
    message.push_str(" for ");
    message.push_str(value.type_name());
    message.push_str(" value");
    if let Some(shown) = placeholder(value) {
        message.push(' ');
        message.push_str(&shown);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_names() {
        assert_eq!(Check::AllowedValuesNc.name(), "allowed_values_nc");
        assert_eq!(Check::CallbackBefore.to_string(), "callback before");
        assert_eq!(
            Check::NamedCallback("is_lc".into()).to_string(),
            "is_lc (callback)"
        );
    }

    #[test]
    fn named_message_renders_scalar_placeholder() {
        let err = ValidationError::Named {
            name: "score".into(),
            check: Check::Types,
            value: Value::from("high"),
        };
        assert_eq!(
            err.to_string(),
            "Parameter \"score\" failed validation \"types\" for string value \"high\""
        );
        assert_eq!(err.code(), "VALIDATION_FIELD");
        assert_eq!(err.value_simple().as_deref(), Some("string 'high'"));
    }

    #[test]
    fn unnamed_message_for_null_and_bool() {
        let err = Rejection::new(Check::Mandatory, Value::Null).into_error();
        assert_eq!(err.to_string(), "Failed validation \"mandatory\" for null value");

        let err = Rejection::new(Check::Callback, Value::Bool(false)).into_error();
        assert_eq!(
            err.to_string(),
            "Failed validation \"callback\" for boolean value false"
        );
        assert_eq!(err.placeholder().as_deref(), Some("false"));
    }

    #[test]
    fn non_scalars_have_no_placeholder() {
        let err = Rejection::new(Check::MaxLength, Value::Sequence(vec![])).into_named("tags");
        assert_eq!(
            err.to_string(),
            "Parameter \"tags\" failed validation \"max_length\" for array value"
        );
        assert!(err.placeholder().is_none());
        assert_eq!(err.value_simple().as_deref(), Some("array"));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::unknown("rule set", "max_lenght");
        assert_eq!(err.to_string(), "unknown rule set option `max_lenght`");
        assert_eq!(err.code(), "CONFIG_UNKNOWN_OPTION");
    }
}
