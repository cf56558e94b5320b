//! Macros for declaring constraints and building records and configuration
//! maps with minimal boilerplate.
//!
//! # Available Macros
//!
//! - [`constraint!`]: Declare a constraint (struct + `Validate` impl)
//! - [`record!`]: Build a [`Record`](crate::Record) literal
//! - [`config!`]: Build a [`Config`](crate::Config) literal
//!
//! # Examples
//!
//! ```rust,ignore
//! use validata::{config, record};
//!
//! let rules = RuleSet::try_from(config! { "max_length" => 30, "regex" => "^[A-Z]" })?;
//! let input = record! { "name" => "Jane", "age" => 42 };
//! ```

// ============================================================================
// CONSTRAINT MACRO
// ============================================================================

/// Declares a single-value constraint: struct definition and `Validate`
/// implementation over [`Value`](crate::Value).
///
/// `#[derive(Debug, Clone)]` is always applied and every field is public.
/// `check(self)` names the [`Check`](crate::Check) reported on failure.
///
/// # Variants
///
/// **Auto constructor** (`new` from all fields):
/// ```rust,ignore
/// constraint! {
///     pub MaxValue { max: f64 };
///     rule(self, input) { input.numeric().is_some_and(|n| n <= self.max) }
///     check(self) { Check::MaxValue }
/// }
/// ```
///
/// **Custom constructor**:
/// ```rust,ignore
/// constraint! {
///     pub Isa { tag: String };
///     rule(self, input) { matches!(input, Value::Object(o) if o.is_a(&self.tag)) }
///     check(self) { Check::Isa }
///     new(tag: impl Into<String>) { Self { tag: tag.into() } }
/// }
/// ```
#[macro_export]
macro_rules! constraint {
    // ── Variant 1: custom new ────────────────────────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? };
        rule($self_:ident, $inp:ident) $rule:block
        check($self2:ident) $check:block
        new($($narg:ident: $naty:ty),* $(,)?) $new_body:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $fty,)+
        }

        impl $name {
            #[must_use]
            pub fn new($($narg: $naty),*) -> Self $new_body
        }

        impl $crate::foundation::Validate for $name {
            type Input = $crate::Value;

            #[allow(unused_variables)]
            fn validate(&$self_, $inp: &Self::Input) -> Result<(), $crate::Check> {
                if $rule {
                    Ok(())
                } else {
                    Err($check)
                }
            }
        }
    };

    // ── Variant 2: auto new from all fields ──────────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? };
        rule($self_:ident, $inp:ident) $rule:block
        check($self2:ident) $check:block
    ) => {
        $crate::constraint! {
            $(#[$meta])*
            $vis $name { $($field: $fty),+ };
            rule($self_, $inp) $rule
            check($self2) $check
            new($($field: $fty),+) { Self { $($field),+ } }
        }
    };
}

// ============================================================================
// LITERAL MACROS
// ============================================================================

/// Builds a [`Record`](crate::Record) from `key => value` pairs.
///
/// Keys go through `Key::from` (names or indices), values through
/// `Value::from`.
///
/// ```rust,ignore
/// let input = record! { "name" => "Jane", "score" => 7 };
/// let positional = record! { 0 => "Jane", 1 => 7 };
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert($crate::Key::from($key), $crate::Value::from($value));
        )+
        record
    }};
}

/// Builds a [`Config`](crate::Config) from `option => value` pairs.
///
/// ```rust,ignore
/// let spec = FieldSpec::try_from(config! {
///     "optional" => true,
///     "max_length" => 30,
/// })?;
/// ```
#[macro_export]
macro_rules! config {
    () => {
        $crate::Config::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Config::new()$(.with($key, $value))+
    };
}
