//! Core validation traits and callable wrappers.
//!
//! - **Traits**: [`Validate`], the single-value contract every constraint and
//!   the [`RuleSet`](crate::RuleSet) itself implement.
//! - **Callables**: [`Predicate`] for `callback` / `callbacks` rules and
//!   [`Hook`] for a field spec's `before` / `after` mutation steps.
//!
//! # Examples
//!
//! ```rust,ignore
//! use validata::foundation::Validate;
//! use validata::validators::MaxValue;
//!
//! let max = MaxValue::new(10.0);
//! assert!(max.is_valid(&7.into()));
//! ```

pub mod callback;
pub mod traits;

pub use callback::{Hook, Predicate};
pub use traits::Validate;

// ============================================================================
// UTILITIES
// ============================================================================

/// Runs `validators` against `value` in order, stopping at the first failure.
///
/// This is the evaluation strategy of a rule set: the returned check is the
/// first one that failed.
pub fn validate_all<T, I>(value: &T, validators: I) -> Result<(), crate::Check>
where
    T: ?Sized,
    I: IntoIterator,
    I::Item: Validate<Input = T>,
{
    validators.into_iter().try_for_each(|v| v.validate(value))
}
