//! Rule sets: a fixed group of independent constraints over one non-null
//! value, evaluated in a fixed order and stopping at the first failure.
//!
//! # Examples
//!
//! ```rust,ignore
//! use validata::{Check, RuleSet, TypeTag, Value};
//!
//! let rules = RuleSet::builder()
//!     .types([TypeTag::String])
//!     .max_length(30)
//!     .regex("^[A-Za-z]+$")
//!     .build()?;
//!
//! assert!(rules.validate(&Value::from("Jane")).is_ok());
//! assert_eq!(rules.validate(&Value::from("J4ne")), Err(Check::Regex));
//! ```

use indexmap::IndexMap;

use crate::config::{Config, ConfigValue};
use crate::error::{Check, ConfigError, Rejection, ValidationError};
use crate::foundation::{self, Predicate, Validate};
use crate::kind::TypeTag;
use crate::validators::{
    AllowedValues, Callback, Isa, MaxLength, MaxValue, MinLength, MinValue, NamedCallbacks,
    Pattern, ResourceType, TypeSet,
};
use crate::value::Value;

const SCOPE: &str = "rule set";

// ============================================================================
// RULE SET
// ============================================================================

/// An immutable set of constraints over a single value.
///
/// Evaluation order: `types`, `allowed_values`, `allowed_values_nc`,
/// `resource_type`, `max_length`, `min_length`, `max_length_chars`,
/// `min_length_chars`, `max_value`, `min_value`, `isa`, `regex`, `callback`,
/// `callbacks`.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    types: Option<TypeSet>,
    allowed_values: Option<AllowedValues>,
    allowed_values_nc: Option<AllowedValues>,
    resource_type: Option<ResourceType>,
    max_length: Option<MaxLength>,
    min_length: Option<MinLength>,
    max_length_chars: Option<MaxLength>,
    min_length_chars: Option<MinLength>,
    max_value: Option<MaxValue>,
    min_value: Option<MinValue>,
    isa: Option<Isa>,
    regex: Option<Pattern>,
    callback: Option<Callback>,
    callbacks: Option<NamedCallbacks>,
}

impl RuleSet {
    /// Start building a rule set.
    #[must_use]
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Validates `value`, returning the first failed check.
    ///
    /// Null is outside the contract: field specs resolve it before their
    /// rule set runs. A null that does reach here is logged and passes.
    pub fn validate(&self, value: &Value) -> Result<(), Check> {
        if value.is_null() {
            tracing::warn!("rule set asked to validate null; treating it as valid");
            return Ok(());
        }
        foundation::validate_all(value, self.constraints())
    }

    /// Like [`validate`](Self::validate), but reports a structured error
    /// carrying the offending value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Value`] naming the failed check.
    pub fn validate_ex(&self, value: &Value) -> Result<(), ValidationError> {
        self.validate(value)
            .map_err(|check| Rejection::new(check, value.clone()).into_error())
    }

    /// Returns true if `value` passes every constraint.
    #[must_use]
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }

    /// Returns true if no constraint is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints().next().is_none()
    }

    fn constraints(&self) -> impl Iterator<Item = &dyn Validate<Input = Value>> {
        let ordered: [Option<&dyn Validate<Input = Value>>; 14] = [
            erase(self.types.as_ref()),
            erase(self.allowed_values.as_ref()),
            erase(self.allowed_values_nc.as_ref()),
            erase(self.resource_type.as_ref()),
            erase(self.max_length.as_ref()),
            erase(self.min_length.as_ref()),
            erase(self.max_length_chars.as_ref()),
            erase(self.min_length_chars.as_ref()),
            erase(self.max_value.as_ref()),
            erase(self.min_value.as_ref()),
            erase(self.isa.as_ref()),
            erase(self.regex.as_ref()),
            erase(self.callback.as_ref()),
            erase(self.callbacks.as_ref()),
        ];
        ordered.into_iter().flatten()
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    #[must_use]
    pub fn types(&self) -> Option<&[TypeTag]> {
        self.types.as_ref().map(TypeSet::tags)
    }

    #[must_use]
    pub fn allowed_values(&self) -> Option<&[Value]> {
        self.allowed_values.as_ref().map(|r| r.values.as_slice())
    }

    #[must_use]
    pub fn allowed_values_nc(&self) -> Option<&[Value]> {
        self.allowed_values_nc.as_ref().map(|r| r.values.as_slice())
    }

    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_ref().map(|r| r.kind.as_str())
    }

    #[must_use]
    pub fn max_length(&self) -> Option<usize> {
        self.max_length.map(|r| r.max)
    }

    #[must_use]
    pub fn min_length(&self) -> Option<usize> {
        self.min_length.map(|r| r.min)
    }

    #[must_use]
    pub fn max_length_chars(&self) -> Option<usize> {
        self.max_length_chars.map(|r| r.max)
    }

    #[must_use]
    pub fn min_length_chars(&self) -> Option<usize> {
        self.min_length_chars.map(|r| r.min)
    }

    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.max_value.map(|r| r.max)
    }

    #[must_use]
    pub fn min_value(&self) -> Option<f64> {
        self.min_value.map(|r| r.min)
    }

    #[must_use]
    pub fn isa(&self) -> Option<&str> {
        self.isa.as_ref().map(|r| r.tag.as_str())
    }

    /// Source of the `regex` pattern.
    #[must_use]
    pub fn regex(&self) -> Option<&str> {
        self.regex.as_ref().map(Pattern::as_str)
    }

    #[must_use]
    pub fn callback(&self) -> Option<&Predicate> {
        self.callback.as_ref().map(|r| &r.predicate)
    }

    #[must_use]
    pub fn callbacks(&self) -> Option<&IndexMap<String, Predicate>> {
        self.callbacks.as_ref().map(|r| &r.predicates)
    }
}

impl Validate for RuleSet {
    type Input = Value;

    fn validate(&self, input: &Value) -> Result<(), Check> {
        Self::validate(self, input)
    }
}

impl TryFrom<Config> for RuleSet {
    type Error = ConfigError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        RuleSetBuilder::from_config(config)?.build()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`RuleSet`]. Shape checks run in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    types: Option<Vec<TypeTag>>,
    allowed_values: Option<Vec<Value>>,
    allowed_values_nc: Option<Vec<Value>>,
    resource_type: Option<String>,
    max_length: Option<usize>,
    min_length: Option<usize>,
    max_length_chars: Option<usize>,
    min_length_chars: Option<usize>,
    max_value: Option<f64>,
    min_value: Option<f64>,
    isa: Option<String>,
    regex: Option<String>,
    callback: Option<Predicate>,
    callbacks: Option<IndexMap<String, Predicate>>,
}

impl RuleSetBuilder {
    /// Accepted types; `TypeTag::Scalar` admits any primitive.
    #[must_use = "builder methods must be chained or built"]
    pub fn types(mut self, tags: impl IntoIterator<Item = TypeTag>) -> Self {
        self.types = Some(tags.into_iter().collect());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn allowed_values<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Case-insensitive variant of [`allowed_values`](Self::allowed_values).
    #[must_use = "builder methods must be chained or built"]
    pub fn allowed_values_nc<V: Into<Value>>(
        mut self,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.allowed_values_nc = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn resource_type(mut self, kind: impl Into<String>) -> Self {
        self.resource_type = Some(kind.into());
        self
    }

    /// Upper bound on the byte length of the string form.
    #[must_use = "builder methods must be chained or built"]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Lower bound on the byte length of the string form.
    #[must_use = "builder methods must be chained or built"]
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Upper bound on the character length of the string form.
    #[must_use = "builder methods must be chained or built"]
    pub fn max_length_chars(mut self, max: usize) -> Self {
        self.max_length_chars = Some(max);
        self
    }

    /// Lower bound on the character length of the string form.
    #[must_use = "builder methods must be chained or built"]
    pub fn min_length_chars(mut self, min: usize) -> Self {
        self.min_length_chars = Some(min);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Required class or capability of an object value.
    #[must_use = "builder methods must be chained or built"]
    pub fn isa(mut self, tag: impl Into<String>) -> Self {
        self.isa = Some(tag.into());
        self
    }

    /// Pattern the string form must match. Compiled in `build`.
    #[must_use = "builder methods must be chained or built"]
    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.callback = Some(Predicate::new(f));
        self
    }

    /// Adds a named predicate; named predicates run in insertion order.
    #[must_use = "builder methods must be chained or built"]
    pub fn named_callback<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.callbacks
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), Predicate::new(f));
        self
    }

    /// Checks every option and builds the rule set.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for empty lists or names, non-scalar
    /// allowed values, non-finite bounds, inverted bounds or a regex that
    /// does not compile.
    pub fn build(self) -> Result<RuleSet, ConfigError> {
        let types = match self.types {
            Some(tags) if tags.is_empty() => {
                return Err(ConfigError::invalid(SCOPE, "types", "must list at least one type"));
            }
            tags => tags.map(TypeSet::new),
        };

        let allowed_values = self
            .allowed_values
            .map(|values| check_allowed("allowed_values", values).map(AllowedValues::exact))
            .transpose()?;
        let allowed_values_nc = self
            .allowed_values_nc
            .map(|values| check_allowed("allowed_values_nc", values).map(AllowedValues::nocase))
            .transpose()?;

        let resource_type = self
            .resource_type
            .map(|kind| non_empty("resource_type", kind).map(ResourceType::new))
            .transpose()?;
        let isa = self
            .isa
            .map(|tag| non_empty("isa", tag).map(Isa::new))
            .transpose()?;

        check_order("min_length", self.min_length, "max_length", self.max_length)?;
        check_order(
            "min_length_chars",
            self.min_length_chars,
            "max_length_chars",
            self.max_length_chars,
        )?;

        for (key, bound) in [("max_value", self.max_value), ("min_value", self.min_value)] {
            if bound.is_some_and(|b| !b.is_finite()) {
                return Err(ConfigError::invalid(SCOPE, key, "must be a finite number"));
            }
        }
        check_order("min_value", self.min_value, "max_value", self.max_value)?;

        let regex = self
            .regex
            .map(|pattern| Pattern::compile(&pattern))
            .transpose()?;

        let callbacks = match self.callbacks {
            Some(map) if map.is_empty() => {
                return Err(ConfigError::invalid(
                    SCOPE,
                    "callbacks",
                    "must name at least one predicate",
                ));
            }
            Some(map) if map.keys().any(String::is_empty) => {
                return Err(ConfigError::invalid(
                    SCOPE,
                    "callbacks",
                    "predicate names must not be empty",
                ));
            }
            map => map.map(NamedCallbacks::new),
        };

        Ok(RuleSet {
            types,
            allowed_values,
            allowed_values_nc,
            resource_type,
            max_length: self.max_length.map(MaxLength::bytes),
            min_length: self.min_length.map(MinLength::bytes),
            max_length_chars: self.max_length_chars.map(MaxLength::chars),
            min_length_chars: self.min_length_chars.map(MinLength::chars),
            max_value: self.max_value.map(MaxValue::new),
            min_value: self.min_value.map(MinValue::new),
            isa,
            regex,
            callback: self.callback.map(Callback::new),
            callbacks,
        })
    }

    /// Reads a configuration map into a builder.
    pub(crate) fn from_config(config: Config) -> Result<Self, ConfigError> {
        let mut builder = Self::default();
        let mut nocase = false;

        for (key, value) in config.into_options() {
            match key.as_str() {
                "type" | "types" => {
                    let tags = parse_types(&key, value)?;
                    builder.types.get_or_insert_with(Vec::new).extend(tags);
                }
                "allowed_values" => builder.allowed_values = Some(value_list(&key, value)?),
                "allowed_values_nc" => builder.allowed_values_nc = Some(value_list(&key, value)?),
                "max_length" => builder.max_length = Some(value.into_length(SCOPE, &key)?),
                "min_length" => builder.min_length = Some(value.into_length(SCOPE, &key)?),
                "max_length_chars" | "mb_max_length" => {
                    let length = value.into_length(SCOPE, &key)?;
                    set_once(&mut builder.max_length_chars, length, &key, "max_length_chars")?;
                }
                "min_length_chars" | "mb_min_length" => {
                    let length = value.into_length(SCOPE, &key)?;
                    set_once(&mut builder.min_length_chars, length, &key, "min_length_chars")?;
                }
                "max_value" => builder.max_value = Some(value.into_number(SCOPE, &key)?),
                "min_value" => builder.min_value = Some(value.into_number(SCOPE, &key)?),
                "isa" => builder.isa = Some(value.into_text(SCOPE, &key)?),
                "regex" => builder.regex = Some(value.into_text(SCOPE, &key)?),
                "resource_type" => builder.resource_type = Some(value.into_text(SCOPE, &key)?),
                "callback" => builder.callback = Some(value.into_predicate(SCOPE, &key)?),
                "callbacks" => builder.callbacks = Some(value.into_predicates(SCOPE, &key)?),
                "nocase" => {
                    tracing::warn!(option = "nocase", "deprecated option; use `allowed_values_nc`");
                    nocase = value.into_flag(SCOPE, &key)?;
                }
                _ => return Err(ConfigError::unknown(SCOPE, key.as_str())),
            }
        }

        if nocase && builder.allowed_values_nc.is_none() {
            builder.allowed_values_nc = builder.allowed_values.take();
        }
        Ok(builder)
    }
}

fn erase<V: Validate<Input = Value>>(rule: Option<&V>) -> Option<&dyn Validate<Input = Value>> {
    rule.map(|r| r as &dyn Validate<Input = Value>)
}

// ============================================================================
// OPTION HELPERS
// ============================================================================

fn parse_types(key: &str, value: ConfigValue) -> Result<Vec<TypeTag>, ConfigError> {
    let names = match value.into_value(SCOPE, key)? {
        Value::String(name) => vec![Value::String(name)],
        Value::Sequence(items) => items,
        other => {
            return Err(ConfigError::invalid(
                SCOPE,
                key,
                format!("expected a type name or list of names, got {}", other.type_name()),
            ));
        }
    };
    names
        .iter()
        .map(|name| {
            name.as_str().and_then(TypeTag::parse).ok_or_else(|| {
                let shown = name.scalar_string().unwrap_or_default().into_owned();
                ConfigError::invalid(SCOPE, key, format!("unknown type `{shown}`"))
            })
        })
        .collect()
}

fn value_list(key: &str, value: ConfigValue) -> Result<Vec<Value>, ConfigError> {
    match value.into_value(SCOPE, key)? {
        Value::Sequence(items) => Ok(items),
        Value::Map(record) => Ok(record.into_values().collect()),
        other => Err(ConfigError::invalid(
            SCOPE,
            key,
            format!("expected a list of values, got {}", other.type_name()),
        )),
    }
}

fn set_once(
    slot: &mut Option<usize>,
    length: usize,
    key: &str,
    canonical: &str,
) -> Result<(), ConfigError> {
    if key != canonical {
        tracing::warn!(option = key, replacement = canonical, "deprecated option");
    }
    if slot.replace(length).is_some() {
        return Err(ConfigError::Conflict {
            scope: SCOPE,
            reason: format!("`{canonical}` given more than once"),
        });
    }
    Ok(())
}

fn check_allowed(key: &str, values: Vec<Value>) -> Result<Vec<Value>, ConfigError> {
    if values.is_empty() {
        return Err(ConfigError::invalid(SCOPE, key, "must list at least one value"));
    }
    if let Some(bad) = values.iter().find(|v| !(v.is_scalar() || v.is_null())) {
        return Err(ConfigError::invalid(
            SCOPE,
            key,
            format!("values must be scalar or null, got {}", bad.type_name()),
        ));
    }
    Ok(values)
}

fn non_empty(key: &str, text: String) -> Result<String, ConfigError> {
    if text.is_empty() {
        Err(ConfigError::invalid(SCOPE, key, "must not be empty"))
    } else {
        Ok(text)
    }
}

fn check_order<T: PartialOrd>(
    min_key: &str,
    min: Option<T>,
    max_key: &str,
    max: Option<T>,
) -> Result<(), ConfigError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ConfigError::Conflict {
            scope: SCOPE,
            reason: format!("`{min_key}` is greater than `{max_key}`"),
        }),
        _ => Ok(()),
    }
}
