//! Join, meet and union construction.
//!
//! `create_union_type` is the normal form every join goes through:
//!
//! 1. NamedType members are resolved and nested unions are flattened.
//! 2. Unknown absorbs everything (`?` over `??` over `*`).
//! 3. `None` members are dropped, the rest sorted by id and deduplicated.
//! 4. With subsumption enabled, function members are merged into one and any
//!    member that is a subtype of another member is dropped. On a mutual
//!    subtype tie the smaller id survives, so the result does not depend on
//!    argument order.
//! 5. No member left is `None`, one member is that member, and a union wider
//!    than `max_union_size` widens to unknown.
//!
//! Members that would swallow everything else under subsumption (the
//! unknowns, resolution placeholders, template placeholders and unresolved
//! NamedTypes) are kept as they are.

use crate::recursion::RecursionResult;
use crate::registry::{FunctionKey, TypeRegistry};
use crate::types::*;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

type UnionBuffer = SmallVec<[TypeId; 8]>;

impl TypeRegistry {
    /// Create (or look up) the union of `members`.
    pub fn create_union_type(&mut self, members: impl IntoIterator<Item = TypeId>) -> TypeId {
        let mut flat = UnionBuffer::new();
        for member in members {
            self.push_union_member(&mut flat, member);
        }
        self.normalize_union(flat)
    }

    fn push_union_member(&self, flat: &mut UnionBuffer, member: TypeId) {
        let member = self.resolve(member);
        match self.data(member) {
            TypeData::Union(union) => flat.extend(union.members.iter().copied()),
            _ => flat.push(member),
        }
    }

    fn normalize_union(&mut self, mut flat: UnionBuffer) -> TypeId {
        if flat.contains(&TypeId::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        if flat.contains(&TypeId::CHECKED_UNKNOWN) {
            return TypeId::CHECKED_UNKNOWN;
        }
        if flat.contains(&TypeId::ALL) {
            return TypeId::ALL;
        }

        flat.retain(|id| *id != TypeId::NONE);
        flat.sort_unstable();
        flat.dedup();

        if self.options.subsume_union_members && flat.len() > 1 {
            self.merge_function_members(&mut flat);
            self.drop_subsumed_members(&mut flat);
        }

        match flat.len() {
            0 => return TypeId::NONE,
            1 => return flat[0],
            len if len > self.options.max_union_size => {
                debug!(
                    members = len,
                    max = self.options.max_union_size,
                    "union too wide; widening to unknown"
                );
                return TypeId::UNKNOWN;
            }
            _ => {}
        }

        let members: Arc<[TypeId]> = Arc::from(flat.as_slice());
        if let Some(&existing) = self.unions.get(&members) {
            return existing;
        }
        let id = self.alloc(TypeData::Union(UnionData {
            members: members.clone(),
        }));
        trace!(union = id.0, members = members.len(), "interned union type");
        self.unions.insert(members, id);
        id
    }

    /// A union holds at most one function type: the join of all of them.
    fn merge_function_members(&mut self, flat: &mut UnionBuffer) {
        let functions: SmallVec<[TypeId; 4]> = flat
            .iter()
            .copied()
            .filter(|&id| matches!(self.data(id), TypeData::Function(_)))
            .collect();
        let Some((&first, rest)) = functions.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }

        let merged = rest.iter().fold(first, |acc, &next| self.join_functions(acc, next));
        trace!(functions = functions.len(), merged = merged.0, "merged function members");
        flat.retain(|id| !functions.contains(id));
        flat.push(merged);
        flat.sort_unstable();
        flat.dedup();
    }

    fn drop_subsumed_members(&self, flat: &mut UnionBuffer) {
        let members: UnionBuffer = flat.clone();
        flat.retain(|member| {
            let member = *member;
            if !self.participates_in_subsumption(member) {
                return true;
            }
            !members.iter().any(|&other| {
                other != member
                    && self.participates_in_subsumption(other)
                    && self.is_subtype_of(member, other)
                    && (other < member || !self.is_subtype_of(other, member))
            })
        });
    }

    fn participates_in_subsumption(&self, id: TypeId) -> bool {
        !id.is_unknown_singleton()
            && !matches!(
                self.data(id),
                TypeData::NoResolved(_)
                    | TypeData::Template(_)
                    | TypeData::Named(NamedData {
                        state: NamedState::Unresolved,
                        ..
                    })
            )
    }

    // =========================================================================
    // Join and meet
    // =========================================================================

    /// The least supertype (join) of `a` and `b`.
    pub fn least_supertype(&mut self, a: TypeId, b: TypeId) -> TypeId {
        if a == b {
            return a;
        }
        self.create_union_type([a, b])
    }

    /// The greatest subtype (meet) of `a` and `b`.
    ///
    /// A meet that comes back to itself through the members of
    /// self-referential records or functions bottoms out at `NoObject` (or
    /// `None` for non-objects).
    pub fn greatest_subtype(&mut self, a: TypeId, b: TypeId) -> TypeId {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        if a == b {
            return a;
        }
        if !self.enter_merge((a, b, false)) {
            return if self.is_object_type(a) && self.is_object_type(b) {
                TypeId::NO_OBJECT
            } else {
                TypeId::NONE
            };
        }
        let meet = self.meet(a, b);
        self.leave_merge((a, b, false));
        meet
    }

    fn meet(&mut self, a: TypeId, b: TypeId) -> TypeId {
        let a = self.resolve(a);
        let b = self.resolve(b);
        if a == b {
            return a;
        }

        if self.function_data(a).is_some() && self.function_data(b).is_some() {
            return self.meet_functions(a, b);
        }
        if self.is_equivalent_to(a, b) {
            return a.min(b);
        }
        if self.is_unknown_or_placeholder(a) || self.is_unknown_or_placeholder(b) {
            return TypeId::UNKNOWN;
        }

        if self.union_members(a).is_some() {
            return self.meet_union(a, b);
        }
        if self.union_members(b).is_some() {
            return self.meet_union(b, a);
        }

        if let Some(meet) = self.meet_templatized(a, b) {
            return meet;
        }

        let a_sub_b = self.is_subtype_of(a, b);
        if a_sub_b && (a < b || !self.is_subtype_of(b, a)) {
            return a;
        }
        if self.is_subtype_of(b, a) {
            return b;
        }
        if a_sub_b {
            return a;
        }

        if let (TypeData::Record(_), TypeData::Record(_)) = (self.data(a), self.data(b)) {
            return self.meet_records(a, b);
        }

        if self.is_object_type(a) && self.is_object_type(b) {
            TypeId::NO_OBJECT
        } else {
            TypeId::NONE
        }
    }

    /// `false` when the join or meet `key` is already being computed, or the
    /// merge budget ran out.
    fn enter_merge(&mut self, key: (TypeId, TypeId, bool)) -> bool {
        match self.merge_guard.enter(key) {
            RecursionResult::Entered => true,
            result => {
                debug!(a = key.0.0, b = key.1.0, join = key.2, ?result, "recursive merge cut off");
                if self.merge_guard.depth() == 0 {
                    self.merge_guard.reset();
                }
                false
            }
        }
    }

    fn leave_merge(&mut self, key: (TypeId, TypeId, bool)) {
        self.merge_guard.leave(key);
        if self.merge_guard.depth() == 0 {
            self.merge_guard.reset();
        }
    }

    fn is_unknown_or_placeholder(&self, id: TypeId) -> bool {
        let id = self.strip_indirection(id);
        id.is_unknown_singleton() || matches!(self.data(id), TypeData::NoResolved(_))
    }

    /// Members of `union` below `other`, plus members of `other` below `union`.
    fn meet_union(&mut self, union: TypeId, other: TypeId) -> TypeId {
        let mut result: UnionBuffer = SmallVec::new();
        if let Some(members) = self.union_members(union) {
            result.extend(members.iter().copied().filter(|&m| self.is_subtype_of(m, other)));
        }
        match self.union_members(other) {
            Some(other_members) => {
                result.extend(
                    other_members
                        .iter()
                        .copied()
                        .filter(|&m| self.is_subtype_of(m, union)),
                );
            }
            None if self.is_subtype_of(other, union) => result.push(other),
            None => {}
        }

        let meet = self.create_union_type(result);
        if meet != TypeId::NONE {
            meet
        } else if self.is_object_type(union) && self.is_object_type(other) && other != TypeId::NO_OBJECT {
            TypeId::NO_OBJECT
        } else {
            TypeId::NONE
        }
    }

    fn meet_templatized(&mut self, a: TypeId, b: TypeId) -> Option<TypeId> {
        let (templatized, other) = match (self.data(a), self.data(b)) {
            (TypeData::Templatized(_), _) => (a, b),
            (_, TypeData::Templatized(_)) => (b, a),
            _ => return None,
        };
        if self.is_subtype_of(templatized, other) {
            return Some(templatized);
        }
        if self.is_subtype_of(other, templatized) {
            return Some(other);
        }

        let same_raw = match (self.data(a), self.data(b)) {
            (TypeData::Templatized(left), TypeData::Templatized(right)) if left.raw == right.raw => {
                let pairs: SmallVec<[(TypeId, TypeId); 2]> = left
                    .map
                    .keys
                    .iter()
                    .map(|&key| (left.map.resolved(key), right.map.resolved(key)))
                    .collect();
                Some((left.raw, pairs))
            }
            _ => None,
        };
        if let Some((raw, pairs)) = same_raw {
            let args: SmallVec<[TypeId; 2]> = pairs
                .into_iter()
                .map(|(l, r)| self.greatest_subtype(l, r))
                .collect();
            return Some(self.create_templatized_type(raw, args));
        }

        Some(if self.is_object_type(other) {
            TypeId::NO_OBJECT
        } else {
            TypeId::NONE
        })
    }

    /// Record with the properties of both records; shared properties meet.
    fn meet_records(&mut self, a: TypeId, b: TypeId) -> TypeId {
        let entries = |data: &TypeData| -> Vec<(PropertyKey, TypeId)> {
            data.object_data()
                .map(|object| object.properties.iter().map(|(&k, p)| (k, p.type_id)).collect())
                .unwrap_or_default()
        };
        let left = entries(self.data(a));
        let right = entries(self.data(b));

        let mut merged: Vec<(PropertyKey, TypeId)> = Vec::with_capacity(left.len() + right.len());
        for &(key, left_type) in &left {
            let property_type = match right.iter().find(|(k, _)| *k == key) {
                Some(&(_, right_type)) => {
                    let meet = self.greatest_subtype(left_type, right_type);
                    if meet == TypeId::NONE || meet == TypeId::NO_OBJECT {
                        return TypeId::NO_OBJECT;
                    }
                    meet
                }
                None => left_type,
            };
            merged.push((key, property_type));
        }
        merged.extend(right.into_iter().filter(|(key, _)| !left.iter().any(|(k, _)| k == key)));
        self.create_record_type(merged)
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// Join of two function types.
    pub(crate) fn join_functions(&mut self, a: TypeId, b: TypeId) -> TypeId {
        self.merge_functions(a, b, true)
    }

    /// Meet of two function types.
    pub(crate) fn meet_functions(&mut self, a: TypeId, b: TypeId) -> TypeId {
        self.merge_functions(a, b, false)
    }

    fn merge_functions(&mut self, a: TypeId, b: TypeId, least_super: bool) -> TypeId {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        if a == b {
            return a;
        }

        match (self.is_subtype_of(a, b), self.is_subtype_of(b, a)) {
            (true, true) => return a,
            (true, false) => return if least_super { b } else { a },
            (false, true) => return if least_super { a } else { b },
            (false, false) => {}
        }

        if let Some(merged) = self.merge_functions_piecewise(a, b, least_super) {
            return merged;
        }
        if least_super {
            self.native(NativeType::Function)
        } else {
            self.native(NativeType::LeastFunction)
        }
    }

    /// Two ordinary functions with the same parameters and `this` type merge
    /// into one whose return type is the join (or meet) of theirs. A join
    /// that needs itself to build the return type gives up.
    fn merge_functions_piecewise(&mut self, a: TypeId, b: TypeId, least_super: bool) -> Option<TypeId> {
        if !least_super {
            return self.merge_function_shapes(a, b, false);
        }
        if !self.enter_merge((a, b, true)) {
            return None;
        }
        let merged = self.merge_function_shapes(a, b, true);
        self.leave_merge((a, b, true));
        merged
    }

    fn merge_function_shapes(&mut self, a: TypeId, b: TypeId, least_super: bool) -> Option<TypeId> {
        let (left, right) = (self.function_data(a)?, self.function_data(b)?);
        if !left.is_ordinary() || !right.is_ordinary() {
            return None;
        }
        if !self.params_equivalent(&left.params, &right.params) {
            return None;
        }
        let this_type = match (left.this_type, right.this_type) {
            (None, None) => None,
            (Some(l), Some(r)) if self.is_equivalent_to(l, r) => Some(l),
            _ => return None,
        };

        let params = left.params.clone();
        let template_keys = left.template_keys.clone();
        let (left_return, right_return) = (left.return_type, right.return_type);
        let return_type = if least_super {
            self.least_supertype(left_return, right_return)
        } else {
            self.greatest_subtype(left_return, right_return)
        };
        Some(self.intern_function(FunctionKey {
            kind: FunctionKind::Ordinary,
            params,
            return_type,
            this_type,
            template_keys,
        }))
    }
}

#[cfg(test)]
#[path = "tests/lattice_tests.rs"]
mod tests;
