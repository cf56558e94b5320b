//! Dynamic values flowing through rule sets, specs and record validators.
//!
//! Records arrive from loosely-typed sources (form posts, CSV rows, decoded
//! JSON, positional argument lists), so everything is carried as a closed
//! [`Value`] union with enough runtime type information to drive the
//! `types`, `isa` and `resource_type` checks.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// An ordered associative record, keyed by name or positional index.
pub type Record = IndexMap<Key, Value>;

// ============================================================================
// KEY
// ============================================================================

/// Key of a record entry or of a spec inside a [`SpecCollection`](crate::SpecCollection).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Named field, e.g. `"email"`.
    Name(String),
    /// Positional field, e.g. `0`.
    Index(i64),
}

impl Key {
    /// Reads a key from text: a canonical decimal integer (`"0"`, `"-3"`,
    /// not `"01"` or `"+1"`) becomes an index, anything else a name.
    #[must_use]
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let digits = text.strip_prefix('-').unwrap_or(&text);
        let canonical = match digits.as_bytes() {
            [b'0'] => digits.len() == text.len(),
            [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
            _ => false,
        };
        match text.parse() {
            Ok(index) if canonical => Self::Index(index),
            _ => Self::Name(text),
        }
    }

    /// Returns the name if this is a named key.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Index(_) => None,
        }
    }

    /// Returns the index if this is a positional key.
    #[must_use]
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Self::Name(_) => None,
            Self::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<i32> for Key {
    fn from(index: i32) -> Self {
        Self::Index(i64::from(index))
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Self::Index(index as i64)
    }
}

// ============================================================================
// HANDLE / OBJECT REFERENCES
// ============================================================================

/// An opaque handle to an external resource (file, stream, connection).
///
/// Only the handle's `kind` takes part in validation; see the
/// `resource_type` rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle {
    kind: String,
    id: u64,
}

impl Handle {
    /// Creates a handle of the given kind.
    pub fn new(kind: impl Into<String>, id: u64) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }

    /// The resource category, e.g. `"stream"`.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Caller-assigned identifier.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// A reference to a host object, identified by its class and the
/// capabilities (interfaces, ancestors) it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    class: String,
    capabilities: Vec<String>,
}

impl ObjectRef {
    /// Creates an object reference with no extra capabilities.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            capabilities: Vec::new(),
        }
    }

    /// Declares an additional capability tag the object satisfies.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_capability(mut self, tag: impl Into<String>) -> Self {
        self.capabilities.push(tag.into());
        self
    }

    /// The concrete class name.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Declared capability tags.
    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Returns true if the object is of class `tag` or declares it.
    #[must_use]
    pub fn is_a(&self, tag: &str) -> bool {
        self.class == tag || self.capabilities.iter().any(|c| c == tag)
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent / null value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Positional list of values.
    Sequence(Vec<Value>),
    /// Associative record.
    Map(Record),
    /// External resource handle.
    Handle(Handle),
    /// Host object reference.
    Object(ObjectRef),
}

impl Value {
    /// Check if this is null.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if this is a primitive scalar (bool, integer, float or string).
    #[inline]
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::String(_)
        )
    }

    /// Check if this is the empty string.
    #[inline]
    #[must_use]
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }

    /// Returns the string slice if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a bool.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an int.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the elements if this is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the record if this is a map.
    #[must_use]
    pub fn as_map(&self) -> Option<&Record> {
        match self {
            Self::Map(record) => Some(record),
            _ => None,
        }
    }

    /// Consumes the value, returning the record if this is a map.
    #[must_use]
    pub fn into_map(self) -> Option<Record> {
        match self {
            Self::Map(record) => Some(record),
            _ => None,
        }
    }

    /// Consumes the value, returning the elements if this is a sequence.
    #[must_use]
    pub fn into_sequence(self) -> Option<Vec<Value>> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Name of the runtime type, as used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "double",
            Self::String(_) => "string",
            Self::Sequence(_) | Self::Map(_) => "array",
            Self::Handle(_) => "resource",
            Self::Object(_) => "object",
        }
    }

    /// String form of a scalar, as measured by the length rules.
    ///
    /// `true` renders as `"1"` and `false` as the empty string.
    /// Returns `None` for non-scalars.
    #[must_use]
    pub fn scalar_string(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Bool(true) => Some(Cow::Borrowed("1")),
            Self::Bool(false) => Some(Cow::Borrowed("")),
            Self::Int(n) => Some(Cow::Owned(n.to_string())),
            Self::Float(x) => Some(Cow::Owned(x.to_string())),
            Self::String(s) => Some(Cow::Borrowed(s)),
            _ => None,
        }
    }

    /// Numeric interpretation used by the value-bound rules.
    ///
    /// Integers, floats and strings holding a decimal number (surrounding
    /// whitespace allowed) are numeric; everything else is not.
    #[must_use]
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(x) => Some(*x),
            Self::String(s) => parse_numeric(s),
            _ => None,
        }
    }

    /// Loose boolean interpretation used for flag options and shorthand specs.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(x) => *x != 0.0,
            Self::String(s) => !(s.is_empty() || s == "0"),
            Self::Sequence(items) => !items.is_empty(),
            Self::Map(record) => !record.is_empty(),
            Self::Handle(_) | Self::Object(_) => true,
        }
    }

    /// Strips leading and trailing whitespace if this is a string.
    pub fn trim(&mut self) {
        if let Self::String(s) = self {
            let trimmed = s.trim_matches(is_trimmable);
            if trimmed.len() != s.len() {
                *s = trimmed.to_owned();
            }
        }
    }
}

fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || c == '\0'
}

fn parse_numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    let well_formed = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !well_formed {
        return None;
    }
    s.parse::<f64>().ok().filter(|x| x.is_finite())
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Self::Float(n as f64), Self::Int)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Map(record)
    }
}

impl From<Handle> for Value {
    fn from(handle: Handle) -> Self {
        Self::Handle(handle)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Self::Object(object)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Null, Self::Float),
            },
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Json::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (Key::parse(k), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(record) => {
                let mut map = serializer.serialize_map(Some(record.len()))?;
                for (key, value) in record {
                    map.serialize_entry(&key.to_string(), value)?;
                }
                map.end()
            }
            Self::Handle(handle) => {
                serializer.collect_str(&format_args!("resource({} #{})", handle.kind, handle.id))
            }
            Self::Object(object) => {
                serializer.collect_str(&format_args!("object({})", object.class))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_string_follows_loose_rendering() {
        assert_eq!(Value::Bool(true).scalar_string().as_deref(), Some("1"));
        assert_eq!(Value::Bool(false).scalar_string().as_deref(), Some(""));
        assert_eq!(Value::Int(-42).scalar_string().as_deref(), Some("-42"));
        assert_eq!(Value::Float(7.0).scalar_string().as_deref(), Some("7"));
        assert!(Value::Sequence(vec![]).scalar_string().is_none());
    }

    #[test]
    fn numeric_accepts_numeric_strings() {
        assert_eq!(Value::from(" 12.5 ").numeric(), Some(12.5));
        assert_eq!(Value::from("1e3").numeric(), Some(1000.0));
        assert_eq!(Value::from("high").numeric(), None);
        assert_eq!(Value::from("inf").numeric(), None);
        assert_eq!(Value::from("").numeric(), None);
        assert_eq!(Value::Bool(true).numeric(), None);
    }

    #[test]
    fn trim_only_touches_strings() {
        let mut v = Value::from("  padded \t");
        v.trim();
        assert_eq!(v, Value::from("padded"));

        let mut n = Value::Int(3);
        n.trim();
        assert_eq!(n, Value::Int(3));
    }

    #[test]
    fn truthiness() {
        assert!(Value::Int(2).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::from("0").is_truthy());
        assert!(Value::from("no").is_truthy());
        assert!(!Value::Null.is_truthy());
    }

    #[test]
    fn from_json_keeps_order_and_types() {
        let value = Value::from(json!({"name": "Jane", "score": 7, "ratio": 0.5, "tags": ["a"]}));
        let record = value.into_map().unwrap();
        let keys: Vec<String> = record.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["name", "score", "ratio", "tags"]);
        assert_eq!(record[&Key::from("score")], Value::Int(7));
        assert_eq!(record[&Key::from("ratio")], Value::Float(0.5));
    }

    #[test]
    fn json_object_keys_fold_canonical_integers() {
        let record = Value::from(json!({"0": "a", "01": "b", "-2": "c", "x": "d"}))
            .into_map()
            .unwrap();
        let keys: Vec<&Key> = record.keys().collect();
        assert_eq!(
            keys,
            vec![
                &Key::Index(0),
                &Key::from("01"),
                &Key::Index(-2),
                &Key::from("x"),
            ]
        );
    }

    #[test]
    fn key_parse_rejects_non_canonical_forms() {
        assert_eq!(Key::parse("12"), Key::Index(12));
        assert_eq!(Key::parse("-0"), Key::from("-0"));
        assert_eq!(Key::parse("+1"), Key::from("+1"));
        assert_eq!(Key::parse(""), Key::from(""));
        assert_eq!(Key::parse("99999999999999999999"), Key::from("99999999999999999999"));
    }

    #[test]
    fn serializes_to_json() {
        let mut record = Record::new();
        record.insert(Key::from("a"), Value::from(vec![1, 2]));
        record.insert(Key::from(0), Value::Handle(Handle::new("stream", 3)));
        let json = serde_json::to_value(Value::Map(record)).unwrap();
        assert_eq!(json, json!({"a": [1, 2], "0": "resource(stream #3)"}));
    }

    #[test]
    fn object_is_a_matches_class_and_capabilities() {
        let obj = ObjectRef::new("DateTime").with_capability("DateTimeInterface");
        assert!(obj.is_a("DateTime"));
        assert!(obj.is_a("DateTimeInterface"));
        assert!(!obj.is_a("Closure"));
    }
}
