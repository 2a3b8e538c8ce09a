//! Union subtype checking.
//!
//! - Union source: `(A | B) ⊑ T` iff `A ⊑ T` and `B ⊑ T`
//! - Union target: `S ⊑ (A | B)` iff `S ⊑ A` or `S ⊑ B`
//!
//! Union sources are handled before union targets, so `(A | B) ⊑ (A | B | C)`
//! checks each source member against the whole target.

use crate::subtype::{SubtypeChecker, SubtypeResult};
use crate::types::TypeId;

impl<'a> SubtypeChecker<'a> {
    pub(crate) fn check_union_source_subtype(&mut self, members: &[TypeId], target: TypeId) -> SubtypeResult {
        for &member in members {
            if !self.check_subtype(member, target).is_true() {
                return SubtypeResult::False;
            }
        }
        SubtypeResult::True
    }

    pub(crate) fn check_union_target_subtype(&mut self, source: TypeId, members: &[TypeId]) -> SubtypeResult {
        if members.contains(&source) {
            return SubtypeResult::True;
        }
        for &member in members {
            let result = self.check_subtype(source, member);
            if result.is_true() {
                return result;
            }
        }
        SubtypeResult::False
    }
}
