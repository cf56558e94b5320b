//! The `types` rule.

use smallvec::SmallVec;

use crate::error::Check;
use crate::kind::TypeTag;

crate::constraint! {
    /// Validates that a value is of one of the listed types.
    pub TypeSet { tags: SmallVec<[TypeTag; 4]> };
    rule(self, input) { self.tags.iter().any(|tag| tag.matches(input)) }
    check(self) { Check::Types }
    new(tags: impl IntoIterator<Item = TypeTag>) {
        let mut set: SmallVec<[TypeTag; 4]> = SmallVec::new();
        for tag in tags {
            if !set.contains(&tag) {
                set.push(tag);
            }
        }
        Self { tags: set }
    }
}

impl TypeSet {
    /// The accepted tags, without duplicates, in declaration order.
    #[must_use]
    pub fn tags(&self) -> &[TypeTag] {
        &self.tags
    }
}
