//! An immutable, ordered map of field key to [`FieldSpec`].

use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::config::{Config, ConfigValue};
use crate::error::ConfigError;
use crate::rules::RuleSet;
use crate::spec::FieldSpec;
use crate::value::{Key, Value};

// ============================================================================
// SPEC ENTRY
// ============================================================================

/// One entry given when building a [`SpecCollection`].
///
/// Flags and counts are shorthand: truthy means a mandatory field with no
/// further constraints, falsy an optional one. Both map onto the shared
/// [`FieldSpec::mandatory`] / [`FieldSpec::optional_any`] instances.
#[derive(Debug, Clone)]
pub enum SpecEntry {
    Spec(Arc<FieldSpec>),
    Flag(bool),
    Count(i64),
    Config(Config),
}

impl SpecEntry {
    fn into_spec(self) -> Result<Arc<FieldSpec>, ConfigError> {
        match self {
            Self::Spec(spec) => Ok(spec),
            Self::Flag(true) => Ok(FieldSpec::mandatory()),
            Self::Flag(false) => Ok(FieldSpec::optional_any()),
            Self::Count(n) if n != 0 => Ok(FieldSpec::mandatory()),
            Self::Count(_) => Ok(FieldSpec::optional_any()),
            Self::Config(config) => FieldSpec::try_from(config).map(Arc::new),
        }
    }
}

impl From<FieldSpec> for SpecEntry {
    fn from(spec: FieldSpec) -> Self {
        Self::Spec(Arc::new(spec))
    }
}

impl From<Arc<FieldSpec>> for SpecEntry {
    fn from(spec: Arc<FieldSpec>) -> Self {
        Self::Spec(spec)
    }
}

impl From<RuleSet> for SpecEntry {
    fn from(rules: RuleSet) -> Self {
        Self::Spec(Arc::new(FieldSpec::from(rules)))
    }
}

impl From<bool> for SpecEntry {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<i64> for SpecEntry {
    fn from(n: i64) -> Self {
        Self::Count(n)
    }
}

impl From<i32> for SpecEntry {
    fn from(n: i32) -> Self {
        Self::Count(i64::from(n))
    }
}

impl From<Config> for SpecEntry {
    fn from(config: Config) -> Self {
        Self::Config(config)
    }
}

impl TryFrom<ConfigValue> for SpecEntry {
    type Error = ConfigError;

    fn try_from(value: ConfigValue) -> Result<Self, Self::Error> {
        match value {
            ConfigValue::Spec(spec) => Ok(Self::Spec(spec)),
            ConfigValue::Rules(rules) => Ok(Self::from(rules)),
            ConfigValue::Map(config) => Ok(Self::Config(config)),
            ConfigValue::Value(Value::Bool(flag)) => Ok(Self::Flag(flag)),
            ConfigValue::Value(Value::Int(n)) => Ok(Self::Count(n)),
            ConfigValue::Value(Value::Null) => Ok(Self::Flag(false)),
            other => Err(ConfigError::InvalidOption {
                scope: "spec collection",
                key: "entry".into(),
                reason: format!(
                    "expected a field spec, flag, integer or config map, got {}",
                    other.kind()
                ),
            }),
        }
    }
}

// ============================================================================
// SPEC COLLECTION
// ============================================================================

/// Read-only ordered mapping of field key to shared field spec.
///
/// There is no mutating API: once built, a collection can only be read,
/// cloned or replaced.
#[derive(Debug, Clone, Default)]
pub struct SpecCollection {
    specs: IndexMap<Key, Arc<FieldSpec>>,
}

impl SpecCollection {
    /// Builds a collection from `(key, entry)` pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKey`] for an empty name,
    /// [`ConfigError::DuplicateKey`] for a repeated key, or the error of an
    /// entry that fails to build.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let specs = SpecCollection::new([
    ///     ("name", SpecEntry::from(true)),
    ///     ("nick", SpecEntry::from(false)),
    ///     ("age", config! { "type" => "int", "min_value" => 0 }.into()),
    /// ])?;
    /// ```
    pub fn new<K, E, I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<Key>,
        E: Into<SpecEntry>,
    {
        let mut specs = IndexMap::new();
        for (key, entry) in entries {
            let key = key.into();
            if key.as_name().is_some_and(str::is_empty) {
                return Err(ConfigError::InvalidKey {
                    reason: "names must not be empty".into(),
                });
            }
            match specs.entry(key) {
                Entry::Occupied(occupied) => {
                    return Err(ConfigError::DuplicateKey {
                        key: occupied.key().clone(),
                    });
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(entry.into().into_spec()?);
                }
            }
        }
        Ok(Self { specs })
    }

    /// Builds a positional collection keyed `0..n`.
    ///
    /// # Errors
    ///
    /// Returns the error of an entry that fails to build.
    pub fn positional<E, I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = E>,
        E: Into<SpecEntry>,
    {
        Self::new(entries.into_iter().enumerate())
    }

    /// Returns true if a spec exists under `key`.
    #[must_use]
    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.specs.contains_key(&key.into())
    }

    /// Get the spec under `key`. Absence is not an error.
    #[must_use]
    pub fn get(&self, key: impl Into<Key>) -> Option<&Arc<FieldSpec>> {
        self.specs.get(&key.into())
    }

    /// Get the spec at position `index`, ignoring keys.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&Key, &Arc<FieldSpec>)> {
        self.specs.get_index(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Keys in collection order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.specs.keys()
    }

    /// Specs in collection order.
    pub fn values(&self) -> impl Iterator<Item = &Arc<FieldSpec>> {
        self.specs.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Arc<FieldSpec>)> {
        self.specs.iter()
    }

    /// Snapshot of the underlying map.
    #[must_use]
    pub fn to_map(&self) -> IndexMap<Key, Arc<FieldSpec>> {
        self.specs.clone()
    }
}

impl<'a> IntoIterator for &'a SpecCollection {
    type Item = (&'a Key, &'a Arc<FieldSpec>);
    type IntoIter = indexmap::map::Iter<'a, Key, Arc<FieldSpec>>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

impl TryFrom<Config> for SpecCollection {
    type Error = ConfigError;

    /// Named collection from a config map; reserved names are kept as keys.
    fn try_from(config: Config) -> Result<Self, Self::Error> {
        let entries = config
            .into_iter()
            .map(|(key, value)| SpecEntry::try_from(value).map(|entry| (key, entry)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[test]
    fn shorthand_entries_use_shared_specs() {
        let specs = SpecCollection::new([
            ("a", SpecEntry::from(true)),
            ("b", SpecEntry::from(0)),
            ("c", SpecEntry::from(7)),
        ])
        .unwrap();
        let a = specs.get("a").unwrap();
        assert!(Arc::ptr_eq(a, &FieldSpec::mandatory()));
        assert!(specs.get("b").unwrap().optional());
        assert!(!specs.get("c").unwrap().optional());
    }

    #[test]
    fn preserves_order_and_mixed_keys() {
        let specs = SpecCollection::new([
            (Key::from("z"), SpecEntry::from(true)),
            (Key::from(0), SpecEntry::from(false)),
            (Key::from("a"), SpecEntry::from(config! { "max_length" => 2 })),
        ])
        .unwrap();
        let keys: Vec<String> = specs.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["z", "0", "a"]);
        assert!(specs.contains(0));
        assert!(specs.get("missing").is_none());
    }

    #[test]
    fn rejects_empty_and_duplicate_keys() {
        let err = SpecCollection::new([("", SpecEntry::from(true))]).unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID_KEY");

        let err =
            SpecCollection::new([("a", SpecEntry::from(true)), ("a", SpecEntry::from(false))])
                .unwrap_err();
        assert_eq!(err.to_string(), "duplicate spec key `a`");
    }

    #[test]
    fn entry_errors_propagate() {
        let err = SpecCollection::new([("a", config! { "bogus" => 1 })]).unwrap_err();
        assert_eq!(err.code(), "CONFIG_UNKNOWN_OPTION");
    }

    #[test]
    fn from_config_map() {
        let specs = SpecCollection::try_from(config! {
            "name" => true,
            "nick" => false,
            "age" => config! { "type" => "int" },
        })
        .unwrap();
        assert_eq!(specs.len(), 3);
        assert!(specs.get("age").unwrap().rules().is_some());
    }

    #[test]
    fn positional_keys_are_indices() {
        let specs = SpecCollection::positional([true, false]).unwrap();
        assert_eq!(specs.get_index(1).map(|(k, _)| k), Some(&Key::Index(1)));
    }
}
