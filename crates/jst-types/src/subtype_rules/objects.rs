//! Object type subtype checking.
//!
//! This module handles subtyping inside the object sub-lattice:
//! - Every object type is a subtype of the `Object` instance type
//! - **Nominal** subtyping walks the implicit-prototype chain and the
//!   implements/extends edges recorded on constructors and interfaces
//! - **Structural** subtyping (records and `@record` interfaces) is
//!   width-and-depth: every property of the target must exist on the source
//!   with a subtype-compatible type. A missing property is accepted only when
//!   the target property admits `undefined`.
//!
//! Cycles through self-referential types are caught one level up, in
//! [`SubtypeChecker::check_subtype`](crate::SubtypeChecker::check_subtype).

use crate::subtype::{SubtypeChecker, SubtypeResult};
use crate::types::*;
use jst_common::limits::MAX_PROTOTYPE_CHAIN;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

impl<'a> SubtypeChecker<'a> {
    /// Check subtyping between two object types (both already stripped of
    /// indirection, neither a union).
    pub(crate) fn check_object_subtype(&mut self, sub: TypeId, sup: TypeId) -> SubtypeResult {
        let reg = self.registry;
        if sup == reg.native(NativeType::Object) {
            return SubtypeResult::True;
        }

        match (reg.data(sub), reg.data(sup)) {
            (TypeData::Templatized(source), TypeData::Templatized(target)) => {
                self.check_templatized_subtype(sub, source, sup, target)
            }
            (TypeData::Templatized(source), _) => {
                if self.is_nominal_subtype(source.raw, sup) {
                    SubtypeResult::True
                } else if self.is_structural_target(sup) {
                    self.check_structural_subtype(sub, sup)
                } else {
                    SubtypeResult::False
                }
            }
            // Comparing against a raw templatized type treats its arguments as unknown.
            (_, TypeData::Templatized(target)) => self.check_subtype(sub, target.raw),
            (TypeData::Function(source), TypeData::Function(target)) => {
                self.check_function_subtype(source, target)
            }
            (_, TypeData::Record(_)) => self.check_structural_subtype(sub, sup),
            (_, TypeData::Object(target)) if target.flags.contains(ObjectFlags::STRUCTURAL) => {
                if self.is_nominal_subtype(sub, sup) {
                    SubtypeResult::True
                } else {
                    self.check_structural_subtype(sub, sup)
                }
            }
            (_, TypeData::Function(_)) => SubtypeResult::False,
            _ => SubtypeResult::from_bool(self.is_nominal_subtype(sub, sup)),
        }
    }

    /// Whether `sup` is reachable from `sub` through implicit prototypes and
    /// implemented or extended interfaces.
    pub(crate) fn is_nominal_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        let reg = self.registry;
        let mut visited: FxHashSet<TypeId> = FxHashSet::default();
        let mut pending: SmallVec<[TypeId; 8]> = SmallVec::new();
        pending.push(sub);

        while let Some(current) = pending.pop() {
            if current == sup {
                return true;
            }
            if !visited.insert(current) || visited.len() > MAX_PROTOTYPE_CHAIN {
                continue;
            }
            match reg.data(reg.effective_type(current)) {
                TypeData::Templatized(templatized) => pending.push(templatized.raw),
                data => {
                    let Some(object) = data.object_data() else {
                        continue;
                    };
                    if let Some(proto) = object.implicit_prototype {
                        pending.push(proto);
                    }
                    if !object.flags.contains(ObjectFlags::INSTANCE) {
                        continue;
                    }
                    if let Some(func) = object.constructor.and_then(|ctor| reg.data(ctor).as_function()) {
                        pending.extend(func.implemented_interfaces.iter().copied());
                        pending.extend(func.extended_interfaces.iter().copied());
                    }
                }
            }
        }
        false
    }

    /// Records, `@record` interface instances and templatizations of them.
    pub(crate) fn is_structural_target(&self, sup: TypeId) -> bool {
        match self.registry.data(sup) {
            TypeData::Record(_) => true,
            TypeData::Object(object) => object.flags.contains(ObjectFlags::STRUCTURAL),
            TypeData::Templatized(templatized) => self.is_structural_target(templatized.raw),
            _ => false,
        }
    }

    /// Width-and-depth structural comparison. The caller holds the cycle
    /// guard for `(sub, sup)`.
    pub(crate) fn check_structural_subtype(&mut self, sub: TypeId, sup: TypeId) -> SubtypeResult {
        for (key, target_type) in self.structural_members(sup) {
            let member_result = match self.property_type_in(sub, key) {
                Some(source_type) => self.check_subtype(source_type, target_type),
                None if self.is_voidable(target_type) => SubtypeResult::True,
                None => SubtypeResult::False,
            };
            if member_result.is_false() {
                return SubtypeResult::False;
            }
        }
        SubtypeResult::True
    }

    /// The properties a structural target requires, with template arguments
    /// of a templatized target substituted.
    fn structural_members(&self, sup: TypeId) -> Vec<(PropertyKey, TypeId)> {
        let reg = self.registry;
        match reg.data(sup) {
            TypeData::Templatized(templatized) => self
                .structural_members(templatized.raw)
                .into_iter()
                .map(|(key, type_id)| (key, self.substitute(templatized, type_id)))
                .collect(),
            TypeData::Record(record) => record
                .properties
                .iter()
                .map(|(&key, prop)| (key, prop.type_id))
                .collect(),
            _ => {
                let mut members: Vec<(PropertyKey, TypeId)> = Vec::new();
                let mut seen_objects: FxHashSet<TypeId> = FxHashSet::default();
                let mut pending: SmallVec<[TypeId; 4]> = SmallVec::new();
                pending.push(sup);
                while let Some(start) = pending.pop() {
                    let mut current = Some(start);
                    while let Some(id) = current {
                        if !seen_objects.insert(id) || seen_objects.len() > MAX_PROTOTYPE_CHAIN {
                            break;
                        }
                        let Some(object) = reg.data(id).object_data() else {
                            break;
                        };
                        if object.flags.contains(ObjectFlags::NATIVE) {
                            break;
                        }
                        for (&key, prop) in &object.properties {
                            if !members.iter().any(|(k, _)| *k == key) {
                                members.push((key, prop.type_id));
                            }
                        }
                        if object.flags.contains(ObjectFlags::INSTANCE) {
                            if let Some(func) = object.constructor.and_then(|c| reg.data(c).as_function()) {
                                pending.extend(func.extended_interfaces.iter().copied());
                            }
                        }
                        current = object.implicit_prototype;
                    }
                }
                members
            }
        }
    }

    /// Type of property `key` on `owner`, looked up along the prototype chain.
    /// Template keys of a templatized owner are replaced by its arguments.
    pub(crate) fn property_type_in(&self, owner: TypeId, key: PropertyKey) -> Option<TypeId> {
        let reg = self.registry;
        let owner = self.strip(owner);
        match reg.data(owner) {
            TypeData::Templatized(templatized) => reg
                .find_slot(templatized.raw, key)
                .map(|prop| self.substitute(templatized, prop.type_id)),
            _ => reg.find_slot(owner, key).map(|prop| prop.type_id),
        }
    }

    fn substitute(&self, templatized: &TemplatizedData, type_id: TypeId) -> TypeId {
        if self.registry.template_keys(templatized.raw).contains(&type_id) {
            templatized.map.resolved(type_id)
        } else {
            type_id
        }
    }

    /// `undefined` itself or a union containing it.
    fn is_voidable(&self, id: TypeId) -> bool {
        let id = self.strip(id);
        id == TypeId::VOID
            || self
                .registry
                .union_members(id)
                .is_some_and(|members| members.contains(&TypeId::VOID))
    }
}
