//! Built-in single-value constraints.
//!
//! Each constraint implements [`Validate`](crate::foundation::Validate) over
//! [`Value`](crate::Value) and reports exactly one [`Check`](crate::Check).
//! A [`RuleSet`](crate::RuleSet) owns at most one of each and evaluates them
//! in a fixed order.
//!
//! # Categories
//!
//! - **Type**: [`TypeSet`]
//! - **Membership**: [`AllowedValues`]
//! - **Host references**: [`ResourceType`], [`Isa`]
//! - **Length**: [`MaxLength`], [`MinLength`]
//! - **Numeric**: [`MaxValue`], [`MinValue`]
//! - **Pattern**: [`Pattern`]
//! - **Callbacks**: [`Callback`], [`NamedCallbacks`]

pub mod callback;
pub mod kind;
pub mod length;
pub mod membership;
pub mod pattern;
pub mod range;
pub mod resource;

pub use callback::{Callback, NamedCallbacks};
pub use kind::TypeSet;
pub use length::{LengthMode, MaxLength, MinLength};
pub use membership::AllowedValues;
pub use pattern::Pattern;
pub use range::{MaxValue, MinValue};
pub use resource::{Isa, ResourceType};
