//! Rules over host references: `resource_type` and `isa`.

use crate::error::Check;
use crate::value::Value;

crate::constraint! {
    /// Validates that a value is a resource handle of the given kind.
    #[derive(PartialEq, Eq, Hash)]
    pub ResourceType { kind: String };
    rule(self, input) { matches!(input, Value::Handle(h) if h.kind() == self.kind) }
    check(self) { Check::ResourceType }
    new(kind: impl Into<String>) { Self { kind: kind.into() } }
}

crate::constraint! {
    /// Validates that a value is an object of, or declaring, the given class.
    #[derive(PartialEq, Eq, Hash)]
    pub Isa { tag: String };
    rule(self, input) { matches!(input, Value::Object(o) if o.is_a(&self.tag)) }
    check(self) { Check::Isa }
    new(tag: impl Into<String>) { Self { tag: tag.into() } }
}
