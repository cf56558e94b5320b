//! String length rules.
//!
//! Length applies to the string form of a scalar. Non-scalars always fail.
//! `max_length` / `min_length` count bytes, the `_chars` variants count
//! Unicode scalar values.

use crate::error::Check;

// ============================================================================
// LENGTH MODE
// ============================================================================

/// How to count string length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthMode {
    /// Count UTF-8 bytes.
    #[default]
    Bytes,
    /// Count Unicode scalar values.
    Chars,
}

impl LengthMode {
    /// Measures the length of a string according to this mode.
    #[inline]
    #[must_use]
    pub fn measure(self, input: &str) -> usize {
        match self {
            Self::Bytes => input.len(),
            Self::Chars => input.chars().count(),
        }
    }
}

// ============================================================================
// MAX LENGTH
// ============================================================================

crate::constraint! {
    /// Validates that a scalar's string form does not exceed a length.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MaxLength { max: usize, mode: LengthMode };
    rule(self, input) {
        input
            .scalar_string()
            .is_some_and(|s| self.mode.measure(&s) <= self.max)
    }
    check(self) {
        match self.mode {
            LengthMode::Bytes => Check::MaxLength,
            LengthMode::Chars => Check::MaxLengthChars,
        }
    }
}

impl MaxLength {
    /// Byte-counting upper bound.
    #[must_use]
    pub fn bytes(max: usize) -> Self {
        Self::new(max, LengthMode::Bytes)
    }

    /// Character-counting upper bound.
    #[must_use]
    pub fn chars(max: usize) -> Self {
        Self::new(max, LengthMode::Chars)
    }
}

// ============================================================================
// MIN LENGTH
// ============================================================================

crate::constraint! {
    /// Validates that a scalar's string form has at least a length.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MinLength { min: usize, mode: LengthMode };
    rule(self, input) {
        input
            .scalar_string()
            .is_some_and(|s| self.mode.measure(&s) >= self.min)
    }
    check(self) {
        match self.mode {
            LengthMode::Bytes => Check::MinLength,
            LengthMode::Chars => Check::MinLengthChars,
        }
    }
}

impl MinLength {
    /// Byte-counting lower bound.
    #[must_use]
    pub fn bytes(min: usize) -> Self {
        Self::new(min, LengthMode::Bytes)
    }

    /// Character-counting lower bound.
    #[must_use]
    pub fn chars(min: usize) -> Self {
        Self::new(min, LengthMode::Chars)
    }
}
