//! Function type subtype checking.
//!
//! `f ⊑ g` when:
//! - the return type of `f` is a subtype of the return type of `g` (covariant)
//! - each parameter of `g` is a subtype of the matching parameter of `f`
//!   (contravariant)
//! - `f` does not require a parameter that `g` lets callers omit, unless `g`
//!   is a top function taking `...?` or `...None`
//!
//! Constructors are only subtypes of constructors, and their instance types
//! compare covariantly. For other functions the declared `this` types may be
//! related in either direction.

use crate::subtype::{SubtypeChecker, SubtypeResult};
use crate::types::*;

impl<'a> SubtypeChecker<'a> {
    pub(crate) fn check_function_subtype(&mut self, source: &FunctionData, target: &FunctionData) -> SubtypeResult {
        if target.is_interface() {
            return SubtypeResult::True;
        }
        if source.is_interface() {
            return SubtypeResult::False;
        }
        if target.is_constructor() && !source.is_constructor() {
            return SubtypeResult::False;
        }

        if !self.check_this_compatible(source, target) {
            return SubtypeResult::False;
        }
        if self.check_subtype(source.return_type, target.return_type).is_false() {
            return SubtypeResult::False;
        }
        SubtypeResult::from_bool(self.check_params_subtype(&source.params, &target.params))
    }

    fn check_this_compatible(&mut self, source: &FunctionData, target: &FunctionData) -> bool {
        let source_this = source.this_type.unwrap_or(TypeId::UNKNOWN);
        let target_this = target.this_type.unwrap_or(TypeId::UNKNOWN);
        if source.is_constructor() && target.is_constructor() {
            return self.check_subtype(source_this, target_this).is_true();
        }
        if self.is_interface_instance(target_this) {
            return true;
        }
        self.check_subtype(target_this, source_this).is_true() || self.check_subtype(source_this, target_this).is_true()
    }

    fn is_interface_instance(&self, id: TypeId) -> bool {
        let id = self.strip(id);
        self.registry
            .data(id)
            .object_data()
            .is_some_and(|object| object.flags.contains(ObjectFlags::INTERFACE))
    }

    fn check_params_subtype(&mut self, source: &[Param], target: &[Param]) -> bool {
        let mut source_idx = 0;
        let mut target_idx = 0;

        while let (Some(source_param), Some(target_param)) = (source.get(source_idx), target.get(target_idx)) {
            if self.check_subtype(target_param.type_id, source_param.type_id).is_false() {
                return false;
            }

            // The target lets callers omit an argument the source requires.
            if !source_param.is_omittable() && target_param.is_omittable() {
                let target_type = self.strip(target_param.type_id);
                let is_top_function =
                    target_param.rest && (target_type.is_unknown_singleton() || target_type == TypeId::NONE);
                if !is_top_function {
                    return false;
                }
            }

            if source_param.rest && target_param.rest {
                return true;
            }
            if !source_param.rest {
                source_idx += 1;
            }
            if !target_param.rest {
                target_idx += 1;
            }
        }

        // The source still requires an argument the target never passes.
        source.get(source_idx).is_none_or(Param::is_omittable)
    }
}
