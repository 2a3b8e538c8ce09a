//! Templatized type subtype checking.
//!
//! `A<S> ⊑ B<T>` when the raw type `A` is a nominal subtype of `B` and every
//! argument the two share a key for is a subtype (`S ⊑ T`). Arguments are
//! compared covariantly, never invariantly. A key bound on only one side
//! reads as unknown and matches anything.
//!
//! When the raw types are unrelated but the target raw type is structural,
//! the comparison falls back to matching properties.

use crate::subtype::{SubtypeChecker, SubtypeResult};
use crate::types::*;

impl<'a> SubtypeChecker<'a> {
    pub(crate) fn check_templatized_subtype(
        &mut self,
        sub: TypeId,
        source: &TemplatizedData,
        sup: TypeId,
        target: &TemplatizedData,
    ) -> SubtypeResult {
        if source.raw == target.raw || self.is_nominal_subtype(source.raw, target.raw) {
            for (key, target_arg) in target.map.iter() {
                let Some(source_arg) = source.map.get(key) else {
                    continue;
                };
                if self.check_subtype(source_arg, target_arg).is_false() {
                    return SubtypeResult::False;
                }
            }
            return SubtypeResult::True;
        }

        if self.is_structural_target(target.raw) {
            return self.check_structural_subtype(sub, sup);
        }
        SubtypeResult::False
    }
}
