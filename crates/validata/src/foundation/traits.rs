//! Core traits for the validation system.

use crate::error::Check;

// ============================================================================
// CORE VALIDATOR TRAIT
// ============================================================================

/// A single constraint (or a whole rule set) evaluated against one input.
///
/// Failures are reported as the [`Check`] that failed; callers attach the
/// offending value and, for records, the field name.
///
/// # Examples
///
/// ```rust,ignore
/// use validata::foundation::Validate;
/// use validata::{Check, Value};
///
/// struct NonZero;
///
/// impl Validate for NonZero {
///     type Input = Value;
///
///     fn validate(&self, input: &Value) -> Result<(), Check> {
///         if input.numeric() == Some(0.0) {
///             Err(Check::MinValue)
///         } else {
///             Ok(())
///         }
///     }
/// }
/// ```
pub trait Validate {
    /// The type of input being validated.
    ///
    /// Use `?Sized` to allow validation of unsized types like `str`.
    type Input: ?Sized;

    /// Validates the input value, returning the failed check on error.
    fn validate(&self, input: &Self::Input) -> Result<(), Check>;

    /// Returns true if `input` passes.
    fn is_valid(&self, input: &Self::Input) -> bool {
        self.validate(input).is_ok()
    }
}

impl<T: Validate + ?Sized> Validate for &T {
    type Input = T::Input;

    fn validate(&self, input: &Self::Input) -> Result<(), Check> {
        (**self).validate(input)
    }
}
