//! Record validation: applies a [`SpecCollection`] to a whole associative
//! or positional record.
//!
//! # Examples
//!
//! ```rust,ignore
//! use validata::{record, config, RecordValidator, SpecCollection};
//!
//! let validator = RecordValidator::builder()
//!     .specs(SpecCollection::try_from(config! {
//!         "name" => config! { "max_length" => 30 },
//!         "score" => config! { "types" => vec!["int", "float"], "min_value" => 0 },
//!     })?)
//!     .remove_extra(true)
//!     .build();
//!
//! let clean = validator.validate(record! { "name" => "Jane", "score" => 7, "x" => 1 })?;
//! assert_eq!(clean.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::collection::SpecCollection;
use crate::config::Config;
use crate::error::{ConfigError, ValidationError};
use crate::value::{Key, Record, Value};

const SCOPE: &str = "validator";

// ============================================================================
// OPTIONS
// ============================================================================

/// Per-instance behaviour of a [`RecordValidator`].
///
/// Loadable from any serde format; unknown fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorOptions {
    /// Keep keys no spec covers instead of failing.
    pub allow_extra: bool,
    /// Drop keys no spec covers. Takes precedence over `allow_extra`.
    pub remove_extra: bool,
    /// Trim every string value before validation.
    pub trim: bool,
    /// Turn every empty string into null before validation.
    pub null_empty_strings: bool,
    /// Drop null and empty-string keys unless their spec has a default.
    /// Named records only.
    pub delete_null: bool,
    /// Prepended to field names in errors, for nested use.
    pub prefix: String,
}

// ============================================================================
// RECORD VALIDATOR
// ============================================================================

/// Validates whole records against a spec collection.
///
/// Holds no per-call state: one instance can serve any number of calls,
/// from any number of threads. Without a spec collection, records only go
/// through the normalization options.
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    specs: Option<SpecCollection>,
    options: ValidatorOptions,
}

impl RecordValidator {
    /// A validator with default options.
    #[must_use]
    pub fn new(specs: SpecCollection) -> Self {
        Self {
            specs: Some(specs),
            options: ValidatorOptions::default(),
        }
    }

    #[must_use]
    pub fn builder() -> RecordValidatorBuilder {
        RecordValidatorBuilder::default()
    }

    #[must_use]
    pub fn specs(&self) -> Option<&SpecCollection> {
        self.specs.as_ref()
    }

    #[must_use]
    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    #[must_use]
    pub fn allow_extra(&self) -> bool {
        self.options.allow_extra
    }

    #[must_use]
    pub fn remove_extra(&self) -> bool {
        self.options.remove_extra
    }

    #[must_use]
    pub fn trim(&self) -> bool {
        self.options.trim
    }

    #[must_use]
    pub fn null_empty_strings(&self) -> bool {
        self.options.null_empty_strings
    }

    #[must_use]
    pub fn delete_null(&self) -> bool {
        self.options.delete_null
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.options.prefix
    }

    /// Validates an associative record, returning the normalized, defaulted
    /// and mutated copy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownKey`] for an uncovered key (unless
    /// extras are allowed or removed), or [`ValidationError::Named`] for the
    /// first field that fails its spec.
    pub fn validate(&self, mut record: Record) -> Result<Record, ValidationError> {
        if let Some(specs) = &self.specs {
            for key in specs.keys() {
                if !record.contains_key(key) {
                    record.insert(key.clone(), Value::Null);
                }
            }
        }

        self.normalize(record.values_mut());

        if self.options.delete_null {
            record.retain(|key, value| {
                !(value.is_null() || value.is_empty_string())
                    || self
                        .specs
                        .as_ref()
                        .and_then(|specs| specs.get(key))
                        .is_some_and(|spec| spec.has_default())
            });
        }

        let Some(specs) = &self.specs else {
            return Ok(record);
        };

        if self.options.remove_extra {
            record.retain(|key, _| {
                let covered = specs.contains(key);
                if !covered {
                    tracing::trace!(key = %key, "extra key removed");
                }
                covered
            });
        } else if !self.options.allow_extra
            && let Some(key) = record.keys().find(|key| !specs.contains(*key))
        {
            let key = self.qualify(key);
            tracing::debug!(key = %key, "unknown key rejected");
            return Err(ValidationError::UnknownKey { key });
        }

        for (key, spec) in specs {
            let outcome = match record.get_mut(key) {
                Some(slot) => spec
                    .validate(std::mem::take(slot))
                    .map(|value| *slot = value),
                None => spec.validate(Value::Null).map(drop),
            };
            if let Err(rejection) = outcome {
                let name = self.qualify(key);
                tracing::debug!(field = %name, check = %rejection.check, "field rejected");
                return Err(rejection.into_named(name));
            }
        }

        Ok(record)
    }

    /// Validates a positional record against the specs in collection order;
    /// spec keys are ignored.
    ///
    /// Missing trailing values are validated as null. Values that result
    /// from that (defaults) are appended; trailing nulls are not.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TooManyValues`] if more values than specs
    /// are given (unless extras are allowed or removed), or
    /// [`ValidationError::Named`] naming the failing index.
    pub fn validate_pos(&self, mut values: Vec<Value>) -> Result<Vec<Value>, ValidationError> {
        let given = values.len();

        if let Some(specs) = &self.specs
            && given > specs.len()
        {
            if self.options.remove_extra {
                values.truncate(specs.len());
            } else if !self.options.allow_extra {
                tracing::debug!(given, expected = specs.len(), "too many positional values");
                return Err(ValidationError::TooManyValues {
                    given,
                    expected: specs.len(),
                });
            }
        }

        self.normalize(values.iter_mut());

        let Some(specs) = &self.specs else {
            return Ok(values);
        };

        let mut keep = values.len();
        for (index, spec) in specs.values().enumerate() {
            let outcome = match values.get_mut(index) {
                Some(slot) => spec
                    .validate(std::mem::take(slot))
                    .map(|value| *slot = value),
                None => spec.validate(Value::Null).map(|value| {
                    if !value.is_null() {
                        keep = index + 1;
                    }
                    values.push(value);
                }),
            };
            if let Err(rejection) = outcome {
                let name = self.qualify(&Key::from(index));
                tracing::debug!(field = %name, check = %rejection.check, "value rejected");
                return Err(rejection.into_named(name));
            }
        }
        values.truncate(keep);

        Ok(values)
    }

    fn normalize<'a>(&self, values: impl Iterator<Item = &'a mut Value>) {
        let ValidatorOptions {
            trim,
            null_empty_strings,
            ..
        } = self.options;
        if !(trim || null_empty_strings) {
            return;
        }
        for value in values {
            if trim {
                value.trim();
            }
            if null_empty_strings && value.is_empty_string() {
                *value = Value::Null;
            }
        }
    }

    fn qualify(&self, key: &Key) -> String {
        format!("{}{key}", self.options.prefix)
    }
}

impl TryFrom<Config> for RecordValidator {
    type Error = ConfigError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        use crate::config::ConfigValue;

        let mut builder = Self::builder();
        for (key, value) in config.into_options() {
            let flag = |value: ConfigValue| value.into_flag(SCOPE, &key);
            builder = match key.as_str() {
                "specs" => match value {
                    ConfigValue::Specs(specs) => builder.specs(specs),
                    ConfigValue::Map(config) => builder.specs(SpecCollection::try_from(config)?),
                    ConfigValue::Value(Value::Sequence(items)) => {
                        builder.specs(SpecCollection::positional(
                            items
                                .into_iter()
                                .map(|item| crate::SpecEntry::try_from(ConfigValue::Value(item)))
                                .collect::<Result<Vec<_>, _>>()?,
                        )?)
                    }
                    other => {
                        return Err(ConfigError::invalid(
                            SCOPE,
                            "specs",
                            format!("expected a spec collection or config map, got {}", other.kind()),
                        ));
                    }
                },
                "allow_extra" => builder.allow_extra(flag(value)?),
                "remove_extra" => builder.remove_extra(flag(value)?),
                "trim" => builder.trim(flag(value)?),
                "null_empty_strings" => builder.null_empty_strings(flag(value)?),
                "delete_null" => builder.delete_null(flag(value)?),
                "empty_null" => {
                    tracing::warn!(option = "empty_null", replacement = "null_empty_strings", "deprecated option");
                    builder.null_empty_strings(flag(value)?)
                }
                "empty_delete" => {
                    tracing::warn!(option = "empty_delete", replacement = "delete_null", "deprecated option");
                    builder.delete_null(flag(value)?)
                }
                "prefix" => builder.prefix(value.into_text(SCOPE, &key)?),
                _ => return Err(ConfigError::unknown(SCOPE, key.as_str())),
            };
        }
        Ok(builder.build())
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`RecordValidator`].
#[derive(Debug, Clone, Default)]
pub struct RecordValidatorBuilder {
    specs: Option<SpecCollection>,
    options: ValidatorOptions,
}

impl RecordValidatorBuilder {
    #[must_use = "builder methods must be chained or built"]
    pub fn specs(mut self, specs: SpecCollection) -> Self {
        self.specs = Some(specs);
        self
    }

    /// Replaces every option at once.
    #[must_use = "builder methods must be chained or built"]
    pub fn options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn allow_extra(mut self, allow: bool) -> Self {
        self.options.allow_extra = allow;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn remove_extra(mut self, remove: bool) -> Self {
        self.options.remove_extra = remove;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn trim(mut self, trim: bool) -> Self {
        self.options.trim = trim;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn null_empty_strings(mut self, enabled: bool) -> Self {
        self.options.null_empty_strings = enabled;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn delete_null(mut self, enabled: bool) -> Self {
        self.options.delete_null = enabled;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn build(self) -> RecordValidator {
        RecordValidator {
            specs: self.specs,
            options: self.options,
        }
    }
}
