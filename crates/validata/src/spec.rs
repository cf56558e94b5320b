//! Field specs: null handling, defaults, trimming and mutation hooks
//! wrapped around an optional [`RuleSet`].
//!
//! # Pipeline
//!
//! 1. Strings are trimmed (if `trim`) and an empty string becomes null
//!    unless `allow_empty`.
//! 2. Null with a default: the default is returned as-is. Defaults are
//!    trusted and never validated.
//! 3. Otherwise a non-null value goes through `before`, then step 1 again.
//! 4. Null is accepted only if `optional`, else `mandatory` fails.
//! 5. The rule set runs, then `after`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use validata::{FieldSpec, Hook, RuleSet, Value};
//!
//! let spec = FieldSpec::builder()
//!     .trim(true)
//!     .before(Hook::map(|v| match v {
//!         Value::String(s) => Value::String(s.to_lowercase()),
//!         other => other,
//!     }))
//!     .rules(RuleSet::builder().regex("^[a-z]+$").build()?)
//!     .build();
//!
//! assert_eq!(spec.validate(Value::from(" ABC ")), Ok(Value::from("abc")));
//! ```

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::config::{Config, ConfigValue};
use crate::error::{Check, ConfigError, Rejection, ValidationError};
use crate::foundation::{Hook, Validate};
use crate::rules::RuleSet;
use crate::value::Value;

const SCOPE: &str = "field spec";

static MANDATORY: LazyLock<Arc<FieldSpec>> = LazyLock::new(|| Arc::new(FieldSpec::default()));

static OPTIONAL: LazyLock<Arc<FieldSpec>> = LazyLock::new(|| {
    Arc::new(FieldSpec {
        optional: true,
        ..FieldSpec::default()
    })
});

// ============================================================================
// DEFAULT VALUE
// ============================================================================

/// Value substituted for null.
#[derive(Clone)]
pub enum DefaultValue {
    /// Returned verbatim.
    Value(Value),
    /// Produced on every substitution.
    Computed(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Produces the value to substitute.
    #[must_use]
    pub fn produce(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Computed(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

// ============================================================================
// FIELD SPEC
// ============================================================================

/// Validation policy for a single field.
///
/// Immutable once built and safe to share across threads; every call returns
/// its own outcome.
#[derive(Debug, Clone, Default)]
pub struct FieldSpec {
    optional: bool,
    allow_empty: bool,
    trim: bool,
    default: Option<DefaultValue>,
    description: Option<String>,
    before: Option<Hook>,
    after: Option<Hook>,
    rules: Option<RuleSet>,
}

impl FieldSpec {
    /// Start building a field spec. Fields are mandatory by default.
    #[must_use]
    pub fn builder() -> FieldSpecBuilder {
        FieldSpecBuilder {
            spec: Self::default(),
        }
    }

    /// Shared spec for a mandatory field with no further constraints.
    #[must_use]
    pub fn mandatory() -> Arc<Self> {
        Arc::clone(&MANDATORY)
    }

    /// Shared spec for an optional field with no further constraints.
    #[must_use]
    pub fn optional_any() -> Arc<Self> {
        Arc::clone(&OPTIONAL)
    }

    /// Runs the pipeline on `value`, returning the final (possibly
    /// substituted or mutated) value.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] with the failed check and the value as it was
    /// when the check failed.
    pub fn validate(&self, value: Value) -> Result<Value, Rejection> {
        let mut value = self.normalize(value);

        if value.is_null() {
            if let Some(default) = &self.default {
                tracing::trace!("null replaced by default");
                return Ok(default.produce());
            }
        } else if let Some(before) = &self.before {
            if !before.call(&mut value) {
                return Err(Rejection::new(Check::CallbackBefore, value));
            }
            value = self.normalize(value);
        }

        if value.is_null() {
            return if self.optional {
                Ok(Value::Null)
            } else {
                Err(Rejection::new(Check::Mandatory, Value::Null))
            };
        }

        if let Some(rules) = &self.rules
            && let Err(check) = rules.validate(&value)
        {
            return Err(Rejection::new(check, value));
        }

        if let Some(after) = &self.after
            && !after.call(&mut value)
        {
            return Err(Rejection::new(Check::CallbackAfter, value));
        }

        Ok(value)
    }

    /// Runs the pipeline in place.
    ///
    /// On success `slot` holds the final value; on failure it holds the
    /// value the failed check saw.
    ///
    /// # Errors
    ///
    /// Returns the failed [`Check`].
    pub fn validate_mut(&self, slot: &mut Value) -> Result<(), Check> {
        match self.validate(std::mem::take(slot)) {
            Ok(value) => {
                *slot = value;
                Ok(())
            }
            Err(rejection) => {
                *slot = rejection.value;
                Err(rejection.check)
            }
        }
    }

    /// Like [`validate`](Self::validate), with a structured error.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Value`] naming the failed check.
    pub fn validate_ex(&self, value: Value) -> Result<Value, ValidationError> {
        self.validate(value).map_err(Rejection::into_error)
    }

    /// Returns true if `value` would be accepted.
    #[must_use]
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value.clone()).is_ok()
    }

    fn normalize(&self, mut value: Value) -> Value {
        if let Value::String(_) = value {
            if self.trim {
                value.trim();
            }
            if !self.allow_empty && value.is_empty_string() {
                return Value::Null;
            }
        }
        value
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    #[must_use]
    pub fn optional(&self) -> bool {
        self.optional
    }

    #[must_use]
    pub fn allow_empty(&self) -> bool {
        self.allow_empty
    }

    #[must_use]
    pub fn trim(&self) -> bool {
        self.trim
    }

    /// The configured default, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Free-form description. Never used by validation.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn before(&self) -> Option<&Hook> {
        self.before.as_ref()
    }

    #[must_use]
    pub fn after(&self) -> Option<&Hook> {
        self.after.as_ref()
    }

    #[must_use]
    pub fn rules(&self) -> Option<&RuleSet> {
        self.rules.as_ref()
    }
}

impl Validate for FieldSpec {
    type Input = Value;

    fn validate(&self, input: &Value) -> Result<(), Check> {
        Self::validate(self, input.clone())
            .map(drop)
            .map_err(|rejection| rejection.check)
    }
}

impl From<RuleSet> for FieldSpec {
    /// A mandatory field checked by `rules`.
    fn from(rules: RuleSet) -> Self {
        Self {
            rules: Some(rules),
            ..Self::default()
        }
    }
}

impl TryFrom<Config> for FieldSpec {
    type Error = ConfigError;

    /// Reads the spec options. Any other option is a rule option: together
    /// they form an implicit rule set, which cannot be combined with an
    /// explicit `validation` entry.
    fn try_from(config: Config) -> Result<Self, Self::Error> {
        let mut spec = Self::default();
        let mut validation = None;
        let mut lazy = Config::new();

        for (key, value) in config.into_options() {
            match key.as_str() {
                "optional" => spec.optional = value.into_flag(SCOPE, &key)?,
                "allow_empty" => spec.allow_empty = value.into_flag(SCOPE, &key)?,
                "trim" => spec.trim = value.into_flag(SCOPE, &key)?,
                "default" => spec.default = Some(DefaultValue::Value(value.into_value(SCOPE, &key)?)),
                "description" => spec.description = Some(value.into_text(SCOPE, &key)?),
                "before" => spec.before = Some(value.into_hook(SCOPE, &key)?),
                "after" => spec.after = Some(value.into_hook(SCOPE, &key)?),
                "validation" => validation = Some(value),
                _ => {
                    lazy.insert(key, value);
                }
            }
        }

        spec.rules = match (validation, lazy.is_empty()) {
            (Some(_), false) => {
                return Err(ConfigError::Conflict {
                    scope: SCOPE,
                    reason: "rule options cannot be combined with `validation`".into(),
                });
            }
            (Some(ConfigValue::Rules(rules)), true) => Some(rules),
            (Some(ConfigValue::Map(config)), true) => Some(RuleSet::try_from(config)?),
            (Some(other), true) => {
                return Err(ConfigError::invalid(
                    SCOPE,
                    "validation",
                    format!("expected a rule set or config map, got {}", other.kind()),
                ));
            }
            (None, false) => Some(RuleSet::try_from(lazy).map_err(rescope)?),
            (None, true) => None,
        };
        Ok(spec)
    }
}

/// Unknown options in the implicit rule set belong to the field spec.
fn rescope(err: ConfigError) -> ConfigError {
    match err {
        ConfigError::UnknownOption { key, .. } => ConfigError::UnknownOption { scope: SCOPE, key },
        other => other,
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`FieldSpec`].
#[derive(Debug, Clone)]
pub struct FieldSpecBuilder {
    spec: FieldSpec,
}

impl FieldSpecBuilder {
    /// Accept null (after empty-string coercion).
    #[must_use = "builder methods must be chained or built"]
    pub fn optional(mut self, optional: bool) -> Self {
        self.spec.optional = optional;
        self
    }

    /// Keep empty strings instead of coercing them to null.
    #[must_use = "builder methods must be chained or built"]
    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.spec.allow_empty = allow_empty;
        self
    }

    /// Strip surrounding whitespace from strings first.
    #[must_use = "builder methods must be chained or built"]
    pub fn trim(mut self, trim: bool) -> Self {
        self.spec.trim = trim;
        self
    }

    /// Value substituted for null. Null clears the default.
    #[must_use = "builder methods must be chained or built"]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.spec.default = (!value.is_null()).then_some(DefaultValue::Value(value));
        self
    }

    /// Default produced by `f` on every substitution.
    #[must_use = "builder methods must be chained or built"]
    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.spec.default = Some(DefaultValue::Computed(Arc::new(f)));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.spec.description = Some(description.into());
        self
    }

    /// Hook run on non-null input before null resolution and rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn before(mut self, hook: Hook) -> Self {
        self.spec.before = Some(hook);
        self
    }

    /// Hook run on a value that passed the rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn after(mut self, hook: Hook) -> Self {
        self.spec.after = Some(hook);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.spec.rules = Some(rules);
        self
    }

    #[must_use]
    pub fn build(self) -> FieldSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config;

    #[test]
    fn whitespace_only_string_becomes_null() {
        let spec = FieldSpec::builder().trim(true).build();
        let rejection = spec.validate(Value::from("   ")).unwrap_err();
        assert_eq!(rejection.check, Check::Mandatory);
        assert_eq!(rejection.value, Value::Null);
    }

    #[test]
    fn allow_empty_keeps_empty_string() {
        let spec = FieldSpec::builder().allow_empty(true).build();
        assert_eq!(spec.validate(Value::from("")), Ok(Value::from("")));
    }

    #[test]
    fn default_bypasses_rules_and_hooks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let spec = FieldSpec::builder()
            .default("n/a")
            .before(Hook::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                true
            }))
            .rules(RuleSet::builder().max_length(1).build().unwrap())
            .build();
        assert_eq!(spec.validate(Value::Null), Ok(Value::from("n/a")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn computed_default_runs_per_substitution() {
        let counter = Arc::new(AtomicUsize::new(0));
        let source = Arc::clone(&counter);
        let spec = FieldSpec::builder()
            .default_with(move || Value::from(source.fetch_add(1, Ordering::SeqCst)))
            .build();
        assert_eq!(spec.validate(Value::Null), Ok(Value::Int(0)));
        assert_eq!(spec.validate(Value::Null), Ok(Value::Int(1)));
    }

    #[test]
    fn before_result_is_normalized_again() {
        let spec = FieldSpec::builder()
            .optional(true)
            .before(Hook::map(|_| Value::from("")))
            .build();
        assert_eq!(spec.validate(Value::from("x")), Ok(Value::Null));
    }

    #[test]
    fn before_rejection_short_circuits() {
        let spec = FieldSpec::builder()
            .before(Hook::new(|_| false))
            .after(Hook::map(|_| Value::from("unreachable")))
            .build();
        let rejection = spec.validate(Value::from("x")).unwrap_err();
        assert_eq!(rejection.check, Check::CallbackBefore);
        assert_eq!(rejection.value, Value::from("x"));
    }

    #[test]
    fn after_runs_only_on_valid_values() {
        let spec = FieldSpec::builder()
            .rules(RuleSet::builder().max_length(3).build().unwrap())
            .after(Hook::new(|v| v.as_str() != Some("bad")))
            .build();
        assert_eq!(spec.validate(Value::from("long")).unwrap_err().check, Check::MaxLength);
        assert_eq!(spec.validate(Value::from("bad")).unwrap_err().check, Check::CallbackAfter);
    }

    #[test]
    fn validate_mut_writes_back() {
        let spec = FieldSpec::builder().trim(true).build();
        let mut slot = Value::from(" x ");
        assert!(spec.validate_mut(&mut slot).is_ok());
        assert_eq!(slot, Value::from("x"));
    }

    #[test]
    fn shorthand_singletons_are_shared() {
        assert!(Arc::ptr_eq(&FieldSpec::mandatory(), &FieldSpec::mandatory()));
        assert!(!FieldSpec::mandatory().optional());
        assert!(FieldSpec::optional_any().optional());
    }

    #[test]
    fn lazy_rule_options() {
        let spec = FieldSpec::try_from(config! {
            "optional" => true,
            "description" => "Tag",
            "max_length" => 3,
        })
        .unwrap();
        assert_eq!(spec.rules().and_then(RuleSet::max_length), Some(3));
        assert_eq!(spec.description(), Some("Tag"));
    }

    #[test]
    fn lazy_options_conflict_with_validation() {
        let err = FieldSpec::try_from(config! {
            "validation" => config! { "max_length" => 3 },
            "min_length" => 1,
        })
        .unwrap_err();
        assert_eq!(err.code(), "CONFIG_CONFLICT");
    }

    #[test]
    fn unknown_lazy_option_is_reported_for_the_spec() {
        let err = FieldSpec::try_from(config! { "mandatory" => true }).unwrap_err();
        assert_eq!(err.to_string(), "unknown field spec option `mandatory`");
    }
}
