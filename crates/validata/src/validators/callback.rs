//! The `callback` and `callbacks` rules.

use indexmap::IndexMap;

use crate::error::Check;
use crate::foundation::{Predicate, Validate};
use crate::value::Value;

crate::constraint! {
    /// Validates a value with a single user predicate.
    pub Callback { predicate: Predicate };
    rule(self, input) { self.predicate.test(input) }
    check(self) { Check::Callback }
}

/// Named predicates evaluated in insertion order.
///
/// The first failing one is reported as [`Check::NamedCallback`].
#[derive(Debug, Clone, Default)]
pub struct NamedCallbacks {
    pub predicates: IndexMap<String, Predicate>,
}

impl NamedCallbacks {
    #[must_use]
    pub fn new(predicates: IndexMap<String, Predicate>) -> Self {
        Self { predicates }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl Validate for NamedCallbacks {
    type Input = Value;

    fn validate(&self, input: &Value) -> Result<(), Check> {
        match self.predicates.iter().find(|(_, p)| !p.test(input)) {
            Some((name, _)) => Err(Check::NamedCallback(name.clone())),
            None => Ok(()),
        }
    }
}
