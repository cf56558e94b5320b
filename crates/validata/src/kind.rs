//! Primitive type tags accepted by the `types` rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A type tag as accepted in a rule set's `type` / `types` options.
///
/// Canonical names follow the runtime type names of [`Value::type_name`];
/// `int` and `float` are accepted aliases. [`TypeTag::Scalar`] is a
/// pseudo-tag matching any primitive scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "int")]
    Integer,
    #[serde(alias = "float")]
    Double,
    String,
    /// Sequences and maps.
    Array,
    Object,
    Resource,
    /// Any of boolean, integer, double or string.
    Scalar,
}

impl TypeTag {
    /// Canonical tag name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Resource => "resource",
            Self::Scalar => "scalar",
        }
    }

    /// Parses a tag name, resolving the `bool`, `int` and `float` aliases.
    ///
    /// `null` is deliberately not a tag: null acceptance is decided by a
    /// field spec's `optional` / `default` policy.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let tag = match name {
            "boolean" | "bool" => Self::Boolean,
            "integer" | "int" => Self::Integer,
            "double" | "float" => Self::Double,
            "string" => Self::String,
            "array" => Self::Array,
            "object" => Self::Object,
            "resource" => Self::Resource,
            "scalar" => Self::Scalar,
            _ => return None,
        };
        Some(tag)
    }

    /// The concrete tag of a value, or `None` for null.
    #[must_use]
    pub fn of(value: &Value) -> Option<Self> {
        let tag = match value {
            Value::Null => return None,
            Value::Bool(_) => Self::Boolean,
            Value::Int(_) => Self::Integer,
            Value::Float(_) => Self::Double,
            Value::String(_) => Self::String,
            Value::Sequence(_) | Value::Map(_) => Self::Array,
            Value::Handle(_) => Self::Resource,
            Value::Object(_) => Self::Object,
        };
        Some(tag)
    }

    /// Returns true if `value` is of this type.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Scalar => value.is_scalar(),
            tag => Self::of(value) == Some(tag),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<TypeTag> for Value {
    fn from(tag: TypeTag) -> Self {
        Self::String(tag.name().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_canonical_tags() {
        assert_eq!(TypeTag::parse("int"), Some(TypeTag::Integer));
        assert_eq!(TypeTag::parse("float"), Some(TypeTag::Double));
        assert_eq!(TypeTag::parse("bool"), Some(TypeTag::Boolean));
        assert_eq!(TypeTag::parse("null"), None);
        assert_eq!(TypeTag::parse("NULL"), None);
    }

    #[test]
    fn scalar_matches_every_primitive() {
        for value in [
            Value::Bool(false),
            Value::Int(1),
            Value::Float(1.5),
            Value::from("x"),
        ] {
            assert!(TypeTag::Scalar.matches(&value));
        }
        assert!(!TypeTag::Scalar.matches(&Value::Sequence(vec![])));
        assert!(!TypeTag::Scalar.matches(&Value::Null));
    }

    #[test]
    fn array_matches_sequences_and_maps() {
        assert!(TypeTag::Array.matches(&Value::Sequence(vec![])));
        assert!(TypeTag::Array.matches(&Value::Map(crate::Record::new())));
    }

    #[test]
    fn serde_uses_lowercase_names_and_aliases() {
        let tags: Vec<TypeTag> = serde_json::from_str(r#"["int", "double", "scalar"]"#).unwrap();
        assert_eq!(tags, vec![TypeTag::Integer, TypeTag::Double, TypeTag::Scalar]);
        assert_eq!(
            serde_json::to_string(&TypeTag::Integer).unwrap(),
            r#""integer""#
        );
    }
}
