//! Primitive and enum-element subtype checking.
//!
//! Primitives are singletons, so two distinct primitives are never related.
//! There is no autoboxing: `number` is not a subtype of `Number` or `Object`.
//!
//! An enum element is a subtype of whatever its primitive is a subtype of, so
//! an element drawn from `number` is a `number` but not an `Object`.

use crate::subtype::{SubtypeChecker, SubtypeResult};
use crate::types::*;

impl<'a> SubtypeChecker<'a> {
    /// Rules for pairs where at least one side is a primitive, an enum
    /// element target or the object bottom. `None` when both sides are
    /// object types.
    pub(crate) fn check_intrinsic_subtype(&self, sub: &TypeData, sup: &TypeData) -> Option<SubtypeResult> {
        if matches!(sup, TypeData::EnumElement(_)) || is_primitive(sub) || is_primitive(sup) {
            return Some(SubtypeResult::False);
        }
        match (sub, sup) {
            (TypeData::NoObject, _) => Some(SubtypeResult::from_bool(sup.kind().is_object_family())),
            (_, TypeData::NoObject) => Some(SubtypeResult::False),
            _ => None,
        }
    }

    pub(crate) fn check_enum_element_subtype(
        &mut self,
        sub: TypeId,
        element: &EnumElementData,
        sup: TypeId,
    ) -> SubtypeResult {
        if let TypeData::Union(union) = self.registry.data(sup) {
            if union.members.contains(&sub) {
                return SubtypeResult::True;
            }
        }
        self.check_subtype(element.primitive, sup)
    }
}

fn is_primitive(data: &TypeData) -> bool {
    matches!(
        data,
        TypeData::Null
            | TypeData::Void
            | TypeData::Boolean
            | TypeData::Number
            | TypeData::String
            | TypeData::Symbol
            | TypeData::BigInt
    )
}
