//! # validata
//!
//! Schema-driven validation and normalization of loosely typed records.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use validata::prelude::*;
//!
//! let specs = SpecCollection::new([
//!     ("name", SpecEntry::from(config! { "max_length" => 30 })),
//!     ("score", config! { "types" => vec!["int", "float"], "min_value" => 0 }.into()),
//!     ("nick", false.into()),
//! ])?;
//! let validator = RecordValidator::builder().specs(specs).trim(true).build();
//!
//! let clean = validator.validate(record! { "name" => " Jane ", "score" => 7 })?;
//! assert_eq!(clean[&Key::from("name")], Value::from("Jane"));
//! ```
//!
//! ## Layers
//!
//! - [`RuleSet`]: independent constraints over one non-null value, checked
//!   in a fixed order, first failure wins.
//! - [`FieldSpec`]: null/empty/default policy, trimming and `before` /
//!   `after` hooks around an optional rule set.
//! - [`SpecCollection`]: immutable ordered map of field key to spec.
//! - [`RecordValidator`]: applies a collection to named or positional
//!   records, handling missing and extra keys, and reports the first failing
//!   field as a [`ValidationError`].
//!
//! Every layer can be built with a typed builder or from a [`Config`] map.
//! Nothing stores per-call state, so all of them are `Send + Sync` and can
//! be shared freely.

// ValidationError carries the offending Value; boxing it would only add an
// allocation to every failed call.
#![allow(clippy::result_large_err)]

pub mod collection;
pub mod config;
pub mod error;
pub mod foundation;
pub mod kind;
mod macros;
pub mod prelude;
pub mod rules;
pub mod spec;
pub mod validator;
pub mod validators;
pub mod value;

pub use collection::{SpecCollection, SpecEntry};
pub use config::{Config, ConfigValue};
pub use error::{Check, ConfigError, Rejection, ValidationError};
pub use foundation::{Hook, Predicate, Validate};
pub use kind::TypeTag;
pub use rules::{RuleSet, RuleSetBuilder};
pub use spec::{DefaultValue, FieldSpec, FieldSpecBuilder};
pub use validator::{RecordValidator, RecordValidatorBuilder, ValidatorOptions};
pub use value::{Handle, Key, ObjectRef, Record, Value};
