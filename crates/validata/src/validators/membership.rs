//! The `allowed_values` and `allowed_values_nc` rules.
//!
//! Membership uses loose equality: values of the same variant compare
//! directly, and a number matches a number or numeric string of equal value
//! (`7`, `7.0` and `"7"` are interchangeable). A sequence or map under test
//! passes only if every element is a member; an empty one passes trivially.

use crate::error::Check;
use crate::value::Value;

crate::constraint! {
    /// Validates membership in a finite set of scalar (or null) values.
    ///
    /// With `nocase`, strings are compared after lowercasing both sides.
    pub AllowedValues { values: Vec<Value>, nocase: bool, folded: Vec<Value> };
    rule(self, input) { self.admits(input) }
    check(self) {
        if self.nocase {
            Check::AllowedValuesNc
        } else {
            Check::AllowedValues
        }
    }
    new(values: Vec<Value>, nocase: bool) {
        let folded = if nocase {
            values.iter().map(fold).collect()
        } else {
            Vec::new()
        };
        Self { values, nocase, folded }
    }
}

impl AllowedValues {
    /// Case-sensitive membership.
    #[must_use]
    pub fn exact(values: Vec<Value>) -> Self {
        Self::new(values, false)
    }

    /// Case-insensitive membership.
    #[must_use]
    pub fn nocase(values: Vec<Value>) -> Self {
        Self::new(values, true)
    }

    fn admits(&self, input: &Value) -> bool {
        match input {
            Value::Sequence(items) => items.iter().all(|item| self.contains(item)),
            Value::Map(record) => record.values().all(|item| self.contains(item)),
            v if v.is_scalar() || v.is_null() => self.contains(v),
            _ => false,
        }
    }

    fn contains(&self, candidate: &Value) -> bool {
        if self.nocase {
            let candidate = fold(candidate);
            self.folded.iter().any(|v| loose_eq(v, &candidate))
        } else {
            self.values.iter().any(|v| loose_eq(v, candidate))
        }
    }
}

fn fold(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_lowercase()),
        other => other.clone(),
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(_) | Value::Float(_), _) | (_, Value::Int(_) | Value::Float(_)) => {
            match (a.numeric(), b.numeric()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Validate;

    fn yes_no() -> Vec<Value> {
        vec![Value::from("Yes"), Value::from("No")]
    }

    #[test]
    fn exact_membership_is_case_sensitive() {
        let rule = AllowedValues::exact(yes_no());
        assert!(rule.is_valid(&Value::from("Yes")));
        assert_eq!(rule.validate(&Value::from("yes")), Err(Check::AllowedValues));
    }

    #[test]
    fn nocase_membership_ignores_case() {
        let rule = AllowedValues::nocase(yes_no());
        assert!(rule.is_valid(&Value::from("YES")));
        assert!(rule.is_valid(&Value::from("yes")));
        assert_eq!(rule.validate(&Value::from("maybe")), Err(Check::AllowedValuesNc));
    }

    #[test]
    fn sequences_need_every_element() {
        let rule = AllowedValues::exact(vec![Value::Int(1), Value::Int(2)]);
        assert!(rule.is_valid(&Value::from(vec![1, 2, 2])));
        assert!(rule.is_valid(&Value::Sequence(vec![])));
        assert!(!rule.is_valid(&Value::from(vec![1, 3])));
    }

    #[test]
    fn numbers_compare_loosely() {
        let rule = AllowedValues::exact(vec![Value::Int(7)]);
        assert!(rule.is_valid(&Value::Float(7.0)));
        assert!(rule.is_valid(&Value::from("7")));
        assert!(!rule.is_valid(&Value::from("seven")));
    }

    #[test]
    fn handles_are_never_members() {
        let rule = AllowedValues::exact(yes_no());
        assert!(!rule.is_valid(&Value::Handle(crate::Handle::new("stream", 1))));
    }
}
