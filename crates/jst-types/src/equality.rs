//! Equality testing and type equivalence.
//!
//! `test_for_equality` answers what `a == b` can evaluate to when `a` and `b`
//! hold values of the two types:
//!
//! | left \ right | nullish | symbol | value | object |
//! |--------------|---------|--------|-------|--------|
//! | nullish      | true    | false  | false | false  |
//! | symbol       | false   | ?      | false | ?      |
//! | value        | false   | false  | ?     | ?      |
//! | object       | false   | ?      | ?     | ?      |
//!
//! Unions answer for their members when all members agree. Functions only
//! compare with types that may hold objects. Top and unknown types give `?`.
//!
//! `is_equivalent_to` is the stricter structural notion used by join and meet.

use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::registry::TypeRegistry;
use crate::types::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum EqualityClass {
    Nullish,
    Symbol,
    Value,
    Object,
}

impl TypeRegistry {
    /// What `a == b` evaluates to for values of these types.
    pub fn test_for_equality(&self, a: TypeId, b: TypeId) -> TernaryValue {
        let a = self.strip_indirection(a);
        let b = self.strip_indirection(b);
        if self.is_top_for_equality(a) || self.is_top_for_equality(b) {
            return TernaryValue::Unknown;
        }

        match (self.is_empty_type(a), self.is_empty_type(b)) {
            (true, true) => return TernaryValue::True,
            (true, false) | (false, true) => return TernaryValue::Unknown,
            (false, false) => {}
        }

        if let Some(members) = self.union_members(a) {
            return self.fold_equality(members, b);
        }
        if let Some(members) = self.union_members(b) {
            return self.fold_equality(members, a);
        }

        match (self.data(a), self.data(b)) {
            (TypeData::Function(_), _) => return self.test_function_equality(b),
            (_, TypeData::Function(_)) => return self.test_function_equality(a),
            (TypeData::EnumElement(element), _) => return self.test_for_equality(element.primitive, b),
            (_, TypeData::EnumElement(element)) => return self.test_for_equality(a, element.primitive),
            _ => {}
        }

        use EqualityClass::*;
        match (self.equality_class(a), self.equality_class(b)) {
            (Nullish, Nullish) => TernaryValue::True,
            (Nullish, _) | (_, Nullish) => TernaryValue::False,
            (Symbol, Value) | (Value, Symbol) => TernaryValue::False,
            _ => TernaryValue::Unknown,
        }
    }

    /// Whether `a == b` may go either way.
    pub fn can_test_for_equality_with(&self, a: TypeId, b: TypeId) -> bool {
        self.test_for_equality(a, b) == TernaryValue::Unknown
    }

    /// Whether `a === b` can ever be true.
    pub fn can_test_for_shallow_equality_with(&mut self, a: TypeId, b: TypeId) -> bool {
        if self.is_empty_type(a) || self.is_empty_type(b) {
            return self.is_subtype_of(a, b) || self.is_subtype_of(b, a);
        }
        let meet = self.greatest_subtype(a, b);
        // Function meets are coarse; any two functions may be compared.
        !self.is_empty_type(meet) || meet == self.native(NativeType::LeastFunction)
    }

    fn is_top_for_equality(&self, id: TypeId) -> bool {
        id == TypeId::ALL || id.is_unknown_singleton() || matches!(self.data(id), TypeData::NoResolved(_))
    }

    fn fold_equality(&self, members: &[TypeId], other: TypeId) -> TernaryValue {
        let mut result: Option<TernaryValue> = None;
        for &member in members {
            let member_result = self.test_for_equality(member, other);
            match result {
                None => result = Some(member_result),
                Some(previous) if previous != member_result => return TernaryValue::Unknown,
                Some(_) => {}
            }
        }
        result.unwrap_or(TernaryValue::Unknown)
    }

    /// A function only equals something that may hold an object.
    fn test_function_equality(&self, other: TypeId) -> TernaryValue {
        if self.may_be_object(other) {
            TernaryValue::Unknown
        } else {
            TernaryValue::False
        }
    }

    fn may_be_object(&self, id: TypeId) -> bool {
        let id = self.strip_indirection(id);
        match self.data(id) {
            TypeData::Union(union) => union.members.iter().any(|&m| self.may_be_object(m)),
            TypeData::EnumElement(element) => self.may_be_object(element.primitive),
            TypeData::NoObject => false,
            data => data.kind().is_object_family(),
        }
    }

    fn equality_class(&self, id: TypeId) -> EqualityClass {
        match self.data(id) {
            TypeData::Null | TypeData::Void => EqualityClass::Nullish,
            TypeData::Symbol => EqualityClass::Symbol,
            TypeData::Boolean | TypeData::Number | TypeData::String | TypeData::BigInt => EqualityClass::Value,
            _ => EqualityClass::Object,
        }
    }

    // =========================================================================
    // Equivalence
    // =========================================================================

    /// Whether `a` and `b` denote the same type.
    ///
    /// Records, unions, anonymous functions and templatized types compare
    /// structurally; nominal types only equal themselves. The two unknowns
    /// are equivalent to each other, and resolution placeholders are equal
    /// when they carry the same name.
    pub fn is_equivalent_to(&self, a: TypeId, b: TypeId) -> bool {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::SubtypeCheck);
        self.check_equivalent(a, b, &mut guard)
    }

    pub(crate) fn params_equivalent(&self, left: &[Param], right: &[Param]) -> bool {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::SubtypeCheck);
        self.check_params_equivalent(left, right, &mut guard)
    }

    fn check_equivalent(&self, a: TypeId, b: TypeId, guard: &mut RecursionGuard<(TypeId, TypeId)>) -> bool {
        if a == b {
            return true;
        }
        let a = self.effective_type(a);
        let b = self.effective_type(b);
        if a == b {
            return true;
        }
        if a.is_unknown_singleton() || b.is_unknown_singleton() {
            return a.is_unknown_singleton() && b.is_unknown_singleton();
        }

        match guard.enter((a, b)) {
            RecursionResult::Entered => {}
            _ => return true,
        }

        let result = match (self.data(a), self.data(b)) {
            (TypeData::NoResolved(left), TypeData::NoResolved(right)) => left == right,
            (TypeData::Union(left), TypeData::Union(right)) => {
                left.members.len() == right.members.len()
                    && left
                        .members
                        .iter()
                        .all(|&l| right.members.iter().any(|&r| self.check_equivalent(l, r, guard)))
            }
            (TypeData::Record(left), TypeData::Record(right)) => {
                left.properties.len() == right.properties.len()
                    && left.properties.iter().all(|(key, prop)| {
                        right
                            .properties
                            .get(key)
                            .is_some_and(|other| self.check_equivalent(prop.type_id, other.type_id, guard))
                    })
            }
            (TypeData::Function(left), TypeData::Function(right))
                if left.kind == right.kind && left.prototype.is_none() && right.prototype.is_none() =>
            {
                self.check_params_equivalent(&left.params, &right.params, guard)
                    && self.check_equivalent(left.return_type, right.return_type, guard)
                    && match (left.this_type, right.this_type) {
                        (None, None) => true,
                        (Some(l), Some(r)) => self.check_equivalent(l, r, guard),
                        _ => false,
                    }
            }
            (TypeData::Templatized(left), TypeData::Templatized(right)) => {
                left.raw == right.raw
                    && left
                        .map
                        .keys
                        .iter()
                        .all(|&key| self.check_equivalent(left.map.resolved(key), right.map.resolved(key), guard))
            }
            _ => false,
        };

        guard.leave((a, b));
        result
    }

    fn check_params_equivalent(
        &self,
        left: &[Param],
        right: &[Param],
        guard: &mut RecursionGuard<(TypeId, TypeId)>,
    ) -> bool {
        left.len() == right.len()
            && left.iter().zip(right).all(|(l, r)| {
                l.optional == r.optional && l.rest == r.rest && self.check_equivalent(l.type_id, r.type_id, guard)
            })
    }
}

#[cfg(test)]
#[path = "tests/equality_tests.rs"]
mod tests;
