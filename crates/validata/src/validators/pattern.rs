//! The `regex` rule.

use regex::Regex;

use crate::error::{Check, ConfigError};
use crate::value::Value;

crate::constraint! {
    /// Validates that a scalar's string form matches a regular expression.
    ///
    /// Booleans are matched as `"1"` / `"0"`; non-scalars fail.
    pub Pattern { regex: Regex };
    rule(self, input) { subject(input).is_some_and(|s| self.regex.is_match(&s)) }
    check(self) { Check::Regex }
}

impl Pattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the pattern does not compile.
    pub fn compile(pattern: &str) -> Result<Self, ConfigError> {
        Regex::new(pattern)
            .map(Self::new)
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.to_owned(),
                reason: e.to_string(),
            })
    }

    /// The source pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn subject(input: &Value) -> Option<std::borrow::Cow<'_, str>> {
    match input {
        Value::Bool(b) => Some(if *b { "1".into() } else { "0".into() }),
        other => other.scalar_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Validate;

    #[test]
    fn matches_string_form() {
        let rule = Pattern::compile("^[a-z]+$").unwrap();
        assert!(rule.is_valid(&Value::from("abc")));
        assert_eq!(rule.validate(&Value::from("ABC")), Err(Check::Regex));
    }

    #[test]
    fn booleans_match_as_digits() {
        let rule = Pattern::compile("^[01]$").unwrap();
        assert!(rule.is_valid(&Value::Bool(false)));
        assert!(rule.is_valid(&Value::Bool(true)));
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let err = Pattern::compile("(").unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID_PATTERN");
    }
}
