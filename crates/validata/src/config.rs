//! Configuration maps: the dynamic construction surface for rule sets,
//! field specs, spec collections and record validators.
//!
//! A [`Config`] is an ordered `option name → ConfigValue` map. Every
//! component implements `TryFrom<Config>` and rejects unknown options with a
//! [`ConfigError`]; options whose name starts with [`RESERVED_PREFIX`] are
//! skipped, so callers can annotate maps freely. An option set to
//! [`Value::Null`] counts as not given.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::collection::SpecCollection;
use crate::error::ConfigError;
use crate::foundation::{Hook, Predicate};
use crate::rules::RuleSet;
use crate::spec::FieldSpec;
use crate::value::{Record, Value};

/// Options starting with this character are ignored by every component.
pub const RESERVED_PREFIX: char = '_';

// ============================================================================
// CONFIG VALUE
// ============================================================================

/// A single option value.
#[derive(Debug, Clone)]
pub enum ConfigValue {
    /// Plain data: flags, bounds, names, value lists, defaults.
    Value(Value),
    /// A `callback` predicate.
    Predicate(Predicate),
    /// Named `callbacks` predicates.
    Predicates(IndexMap<String, Predicate>),
    /// A `before` / `after` hook.
    Hook(Hook),
    /// A prebuilt rule set for a field spec's `validation` option.
    Rules(RuleSet),
    /// A prebuilt field spec, as a spec collection entry.
    Spec(Arc<FieldSpec>),
    /// A prebuilt spec collection for a validator's `specs` option.
    Specs(SpecCollection),
    /// A nested configuration map.
    Map(Config),
}

impl ConfigValue {
    /// Short description of the variant, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Value(v) => v.type_name(),
            Self::Predicate(_) => "predicate",
            Self::Predicates(_) => "predicate map",
            Self::Hook(_) => "hook",
            Self::Rules(_) => "rule set",
            Self::Spec(_) => "field spec",
            Self::Specs(_) => "spec collection",
            Self::Map(_) => "config map",
        }
    }

    /// Returns the plain value, if this is one.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Returns true for an explicit null, which counts as "not given".
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    fn mismatch(&self, scope: &'static str, key: &str, expected: &str) -> ConfigError {
        ConfigError::invalid(scope, key, format!("expected {expected}, got {}", self.kind()))
    }

    pub(crate) fn into_value(self, scope: &'static str, key: &str) -> Result<Value, ConfigError> {
        match self {
            Self::Value(v) => Ok(v),
            other => Err(other.mismatch(scope, key, "a value")),
        }
    }

    /// Loose boolean cast, the way flag options have always been read.
    pub(crate) fn into_flag(self, scope: &'static str, key: &str) -> Result<bool, ConfigError> {
        match self {
            Self::Value(v) if v.is_scalar() || v.is_null() => Ok(v.is_truthy()),
            other => Err(other.mismatch(scope, key, "a flag")),
        }
    }

    pub(crate) fn into_length(self, scope: &'static str, key: &str) -> Result<usize, ConfigError> {
        let length = match &self {
            Self::Value(Value::Int(n)) => usize::try_from(*n).ok(),
            Self::Value(v @ (Value::Float(_) | Value::String(_))) => v
                .numeric()
                .filter(|x| x.fract() == 0.0 && *x >= 0.0 && *x <= f64::from(u32::MAX))
                .map(|x| x as usize),
            _ => None,
        };
        length.ok_or_else(|| self.mismatch(scope, key, "a non-negative integer"))
    }

    pub(crate) fn into_number(self, scope: &'static str, key: &str) -> Result<f64, ConfigError> {
        let number = match &self {
            Self::Value(v) if !matches!(v, Value::Bool(_)) => v.numeric(),
            _ => None,
        };
        number.ok_or_else(|| self.mismatch(scope, key, "a number"))
    }

    pub(crate) fn into_text(self, scope: &'static str, key: &str) -> Result<String, ConfigError> {
        match self {
            Self::Value(Value::String(s)) => Ok(s),
            other => Err(other.mismatch(scope, key, "a string")),
        }
    }

    pub(crate) fn into_predicate(
        self,
        scope: &'static str,
        key: &str,
    ) -> Result<Predicate, ConfigError> {
        match self {
            Self::Predicate(p) => Ok(p),
            other => Err(other.mismatch(scope, key, "a predicate")),
        }
    }

    pub(crate) fn into_predicates(
        self,
        scope: &'static str,
        key: &str,
    ) -> Result<IndexMap<String, Predicate>, ConfigError> {
        match self {
            Self::Predicates(map) => Ok(map),
            Self::Map(config) => config
                .entries
                .into_iter()
                .map(|(name, value)| {
                    let entry = format!("{key}.{name}");
                    value.into_predicate(scope, &entry).map(|p| (name, p))
                })
                .collect(),
            other => Err(other.mismatch(scope, key, "a map of predicates")),
        }
    }

    pub(crate) fn into_hook(self, scope: &'static str, key: &str) -> Result<Hook, ConfigError> {
        match self {
            Self::Hook(h) => Ok(h),
            other => Err(other.mismatch(scope, key, "a hook")),
        }
    }
}

macro_rules! value_conversions {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ConfigValue {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )+
    };
}

value_conversions!(bool, i32, i64, u32, usize, f64, &str, String, Record, crate::TypeTag);

impl<T: Into<Value>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        Self::Value(Value::from(items))
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Predicate> for ConfigValue {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<IndexMap<String, Predicate>> for ConfigValue {
    fn from(predicates: IndexMap<String, Predicate>) -> Self {
        Self::Predicates(predicates)
    }
}

impl From<Hook> for ConfigValue {
    fn from(hook: Hook) -> Self {
        Self::Hook(hook)
    }
}

impl From<RuleSet> for ConfigValue {
    fn from(rules: RuleSet) -> Self {
        Self::Rules(rules)
    }
}

impl From<FieldSpec> for ConfigValue {
    fn from(spec: FieldSpec) -> Self {
        Self::Spec(Arc::new(spec))
    }
}

impl From<Arc<FieldSpec>> for ConfigValue {
    fn from(spec: Arc<FieldSpec>) -> Self {
        Self::Spec(spec)
    }
}

impl From<SpecCollection> for ConfigValue {
    fn from(specs: SpecCollection) -> Self {
        Self::Specs(specs)
    }
}

impl From<Config> for ConfigValue {
    fn from(config: Config) -> Self {
        Self::Map(config)
    }
}

// ============================================================================
// CONFIG
// ============================================================================

/// An ordered map of option name to option value.
#[derive(Debug, Clone, Default)]
pub struct Config {
    entries: IndexMap<String, ConfigValue>,
}

impl Config {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option (builder-style, consuming).
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Insert an option, returning the previous value under that name.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Get an option by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Consumes the map, yielding the options a component should interpret:
    /// reserved names and explicit nulls are dropped.
    pub(crate) fn into_options(self) -> impl Iterator<Item = (String, ConfigValue)> {
        self.entries
            .into_iter()
            .filter(|(key, value)| !is_reserved(key) && !value.is_null())
    }
}

impl IntoIterator for Config {
    type Item = (String, ConfigValue);
    type IntoIter = indexmap::map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for Config {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Returns true if `key` carries the reserved prefix.
#[must_use]
pub fn is_reserved(key: &str) -> bool {
    key.starts_with(RESERVED_PREFIX)
}
