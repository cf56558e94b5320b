//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use validata::prelude::*;
//! ```

// ============================================================================
// VALUES
// ============================================================================

pub use crate::kind::TypeTag;
pub use crate::value::{Handle, Key, ObjectRef, Record, Value};

// ============================================================================
// ENGINE
// ============================================================================

pub use crate::collection::{SpecCollection, SpecEntry};
pub use crate::foundation::{Hook, Predicate, Validate};
pub use crate::rules::RuleSet;
pub use crate::spec::FieldSpec;
pub use crate::validator::{RecordValidator, ValidatorOptions};

// ============================================================================
// CONFIGURATION AND ERRORS
// ============================================================================

pub use crate::config::{Config, ConfigValue};
pub use crate::error::{Check, ConfigError, Rejection, ValidationError};
pub use crate::{config, record};
