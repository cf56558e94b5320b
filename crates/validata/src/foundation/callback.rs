//! Shared, thread-safe wrappers around user-supplied closures.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

// ============================================================================
// PREDICATE
// ============================================================================

/// A pure test over a value, used by the `callback` and `callbacks` rules.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl Predicate {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Runs the predicate.
    #[inline]
    #[must_use]
    pub fn test(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

// ============================================================================
// HOOK
// ============================================================================

/// A mutating step run by a field spec before or after its rule set.
///
/// The hook may rewrite the value in place; returning `false` rejects it.
#[derive(Clone)]
pub struct Hook(Arc<dyn Fn(&mut Value) -> bool + Send + Sync>);

impl Hook {
    /// Wraps a closure that may rewrite the value and may reject it.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wraps a by-value transformation that never rejects.
    ///
    /// ```rust,ignore
    /// let upper = Hook::map(|v| match v {
    ///     Value::String(s) => Value::String(s.to_uppercase()),
    ///     other => other,
    /// });
    /// ```
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::new(move |value| {
            *value = f(std::mem::take(value));
            true
        })
    }

    /// Runs the hook against `value`.
    #[inline]
    pub fn call(&self, value: &mut Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}
