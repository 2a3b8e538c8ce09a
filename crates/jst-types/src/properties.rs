//! The structural property model.
//!
//! Every object-family type owns a property table. Lookups walk the implicit
//! prototype chain, so a property declared on `Foo.prototype` is visible on
//! every `Foo` instance until an instance-level slot shadows it.
//!
//! Slots are either *declared* (from an annotation) or *inferred* (from an
//! assignment):
//! - declaring overwrites any previous slot, but must stay compatible with a
//!   declared slot it shadows further up the chain;
//! - inferring joins with the previous type and never overrides a
//!   declaration.
//!
//! Records, anonymous functions and the other interned shapes are frozen.
//! Definitions made on a NamedType before resolution are queued and replayed
//! on the target once it resolves.

use crate::registry::{PendingProperty, TypeRegistry};
use crate::templates::ReplacementMode;
use crate::types::*;
use jst_common::SourceLocation;
use jst_common::limits::MAX_PROTOTYPE_CHAIN;
use tracing::{debug, trace};

impl TypeRegistry {
    /// The type whose property table answers lookups on `id`.
    fn slot_owner(&self, id: TypeId) -> Option<TypeId> {
        let id = self.strip_indirection(id);
        match self.data(id) {
            TypeData::Templatized(templatized) => self.slot_owner(templatized.raw),
            data if data.object_data().is_some() => Some(id),
            _ => None,
        }
    }

    /// Like `slot_owner`, excluding frozen tables.
    fn property_owner(&self, id: TypeId) -> Option<TypeId> {
        let owner = self.slot_owner(id)?;
        match self.data(owner) {
            TypeData::Record(_) => None,
            data => data
                .object_data()
                .filter(|object| !object.flags.contains(ObjectFlags::INTERNED))
                .map(|_| owner),
        }
    }

    /// The slot for `key` on `owner` or the nearest prototype that has one.
    pub fn find_slot(&self, owner: TypeId, key: PropertyKey) -> Option<&Property> {
        let mut current = self.slot_owner(owner);
        for _ in 0..MAX_PROTOTYPE_CHAIN {
            let object = self.data(current?).object_data()?;
            if let Some(property) = object.properties.get(&key) {
                return Some(property);
            }
            current = object.implicit_prototype.and_then(|proto| self.slot_owner(proto));
        }
        None
    }

    pub fn own_property(&self, owner: TypeId, key: PropertyKey) -> Option<&Property> {
        let owner = self.slot_owner(owner)?;
        self.data(owner).object_data()?.properties.get(&key)
    }

    /// Keys of the slots `owner` defines itself, in definition order.
    pub fn own_property_keys(&self, owner: TypeId) -> Vec<PropertyKey> {
        self.slot_owner(owner)
            .and_then(|owner| self.data(owner).object_data())
            .map(|object| object.properties.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn has_own_property(&self, owner: TypeId, key: PropertyKey) -> bool {
        self.own_property(owner, key).is_some()
    }

    /// Whether a value of type `id` may have property `key`.
    ///
    /// Unknown types have every property. A union has a property when one of
    /// its non-nullish members has it.
    pub fn has_property(&self, id: TypeId, key: PropertyKey) -> bool {
        let id = self.strip_indirection(id);
        if id.is_unknown_singleton() {
            return true;
        }
        match self.data(id) {
            TypeData::NoResolved(_) => true,
            TypeData::Union(union) => union
                .members
                .iter()
                .any(|&m| m != TypeId::NULL && m != TypeId::VOID && self.has_property(m, key)),
            _ => self.find_slot(id, key).is_some(),
        }
    }

    pub fn is_property_type_declared(&self, owner: TypeId, key: PropertyKey) -> bool {
        self.find_slot(owner, key).is_some_and(Property::is_declared)
    }

    pub fn is_property_type_inferred(&self, owner: TypeId, key: PropertyKey) -> bool {
        self.find_slot(owner, key).is_some_and(|p| p.inferred)
    }

    /// Missing properties count as unknown.
    pub fn is_property_type_unknown(&self, owner: TypeId, key: PropertyKey) -> bool {
        self.find_slot(owner, key)
            .is_none_or(|p| self.is_unknown_type(p.type_id))
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    /// Declare `key: type_id` on `owner`.
    ///
    /// Returns `false` when `owner` cannot hold properties, or when a declared
    /// slot further up the prototype chain has a type `type_id` is not a
    /// subtype of. In that case nothing changes.
    pub fn define_declared_property(
        &mut self,
        owner: TypeId,
        key: PropertyKey,
        type_id: TypeId,
        source: Option<SourceLocation>,
    ) -> bool {
        if self.queue_pending_property(owner, key, type_id, false, &source) {
            return true;
        }
        let Some(target) = self.property_owner(owner) else {
            return false;
        };

        if let Some(inherited) = self
            .implicit_prototype(target)
            .and_then(|proto| self.find_slot(proto, key))
        {
            if inherited.is_declared() && !self.is_subtype_of(type_id, inherited.type_id) {
                debug!(
                    owner = target.0,
                    shadowed = inherited.owner.0,
                    "declared property incompatible with the slot it shadows"
                );
                return false;
            }
        }

        self.insert_property(target, key, type_id, false, source);
        true
    }

    /// Record an inferred `key: type_id` on `owner`.
    ///
    /// A declared slot on `owner` itself wins and is left as it is. Otherwise
    /// `owner` gets an own inferred slot typed as the join of `type_id` and
    /// whatever slot, declared or inferred, it would have inherited.
    pub fn define_inferred_property(
        &mut self,
        owner: TypeId,
        key: PropertyKey,
        type_id: TypeId,
        source: Option<SourceLocation>,
    ) -> bool {
        if self.queue_pending_property(owner, key, type_id, true, &source) {
            return true;
        }
        let Some(target) = self.property_owner(owner) else {
            return false;
        };

        let existing = self
            .find_slot(target, key)
            .map(|p| (p.owner == target && p.is_declared(), p.type_id));
        let type_id = match existing {
            Some((true, _)) => return true,
            Some((false, previous)) => self.least_supertype(previous, type_id),
            None => type_id,
        };
        self.insert_property(target, key, type_id, true, source);
        true
    }

    fn queue_pending_property(
        &mut self,
        owner: TypeId,
        key: PropertyKey,
        type_id: TypeId,
        inferred: bool,
        source: &Option<SourceLocation>,
    ) -> bool {
        if !self.is_unresolved_named(owner) {
            return false;
        }
        trace!(named = owner.0, inferred, "queued property on unresolved named type");
        self.pending_properties.entry(owner).or_default().push(PendingProperty {
            key,
            type_id,
            inferred,
            source: source.clone(),
        });
        true
    }

    fn insert_property(
        &mut self,
        target: TypeId,
        key: PropertyKey,
        type_id: TypeId,
        inferred: bool,
        source: Option<SourceLocation>,
    ) {
        if let Some(object) = self.data_mut(target).object_data_mut() {
            object.properties.insert(
                key,
                Property {
                    type_id,
                    inferred,
                    source,
                    owner: target,
                },
            );
        }
    }

    // =========================================================================
    // Property types
    // =========================================================================

    /// The type of property `key` on values of type `id`, unknown on a miss.
    ///
    /// Properties of a templatized type have its template arguments
    /// substituted.
    pub fn get_property_type(&mut self, id: TypeId, key: PropertyKey) -> TypeId {
        let id = self.strip_indirection(id);
        match self.data(id) {
            TypeData::None | TypeData::NoObject => TypeId::NONE,
            TypeData::NoResolved(_) | TypeData::CheckedUnknown => TypeId::CHECKED_UNKNOWN,
            TypeData::Unknown => TypeId::UNKNOWN,
            TypeData::Union(_) => self.find_property_type(id, key).unwrap_or(TypeId::UNKNOWN),
            TypeData::Templatized(templatized) => {
                let map = templatized.map.clone();
                match self.find_slot(templatized.raw, key).map(|p| p.type_id) {
                    Some(raw_type) => self.replace_templates(raw_type, map, ReplacementMode::Total),
                    None => TypeId::UNKNOWN,
                }
            }
            _ => self.find_slot(id, key).map_or(TypeId::UNKNOWN, |p| p.type_id),
        }
    }

    /// Like [`get_property_type`](Self::get_property_type), but `None` when
    /// the property does not exist. Primitives look through their wrapper
    /// object type, so `string` finds `length` on `String`.
    pub fn find_property_type(&mut self, id: TypeId, key: PropertyKey) -> Option<TypeId> {
        let id = self.strip_indirection(id);
        if id.is_unknown_singleton() {
            return Some(id);
        }
        match self.data(id) {
            TypeData::NoResolved(_) => return Some(TypeId::CHECKED_UNKNOWN),
            TypeData::Union(union) => {
                let members: Vec<TypeId> = union
                    .members
                    .iter()
                    .copied()
                    .filter(|&m| m != TypeId::NULL && m != TypeId::VOID)
                    .collect();
                let mut result: Option<TypeId> = None;
                for member in members {
                    if let Some(found) = self.find_property_type(member, key) {
                        result = Some(match result {
                            Some(previous) => self.least_supertype(previous, found),
                            None => found,
                        });
                    }
                }
                return result;
            }
            TypeData::EnumElement(element) => {
                let primitive = element.primitive;
                return self.find_property_type(primitive, key);
            }
            _ => {}
        }

        let id = self.autobox(id);
        if self.has_property(id, key) {
            Some(self.get_property_type(id, key))
        } else {
            None
        }
    }

    /// The wrapper object type of a value primitive; anything else unchanged.
    pub fn autobox(&self, id: TypeId) -> TypeId {
        let wrapper = match id {
            TypeId::BOOLEAN => NativeType::BooleanObject,
            TypeId::NUMBER => NativeType::NumberObject,
            TypeId::STRING => NativeType::StringObject,
            TypeId::SYMBOL => NativeType::SymbolObject,
            TypeId::BIGINT => NativeType::BigIntObject,
            _ => return id,
        };
        self.native(wrapper)
    }
}

#[cfg(test)]
#[path = "tests/properties_tests.rs"]
mod tests;
