//! Numeric bound rules.
//!
//! The value must be numeric (an integer, a float, or a numeric string);
//! anything else fails the bound.

use crate::error::Check;

crate::constraint! {
    /// Validates that a numeric value is at most `max`.
    #[derive(Copy, PartialEq)]
    pub MaxValue { max: f64 };
    rule(self, input) { input.numeric().is_some_and(|n| n <= self.max) }
    check(self) { Check::MaxValue }
}

crate::constraint! {
    /// Validates that a numeric value is at least `min`.
    #[derive(Copy, PartialEq)]
    pub MinValue { min: f64 };
    rule(self, input) { input.numeric().is_some_and(|n| n >= self.min) }
    check(self) { Check::MinValue }
}
