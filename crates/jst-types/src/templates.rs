//! Template types, templatized types and template replacement.
//!
//! A template type is an open parameter `T` with an upper bound (unknown when
//! unconstrained). Constructors and interfaces list the template keys they
//! declare; `create_templatized_type(Array, [string])` binds them and yields
//! `Array<string>`.
//!
//! [`TemplateTypeReplacer`] substitutes bound keys inside any type. Total
//! replacement turns keys missing from the bindings into unknown; partial
//! replacement leaves them in place. Nominal types, NamedTypes and native
//! functions are never rebuilt.

use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::registry::{FunctionKey, TypeRegistry};
use crate::types::*;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

/// What happens to template keys the bindings do not mention.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReplacementMode {
    /// Missing keys become unknown.
    Total,
    /// Missing keys are left in place.
    Partial,
}

impl TypeRegistry {
    /// Create a template type. Without a bound it is bounded by unknown.
    pub fn create_template_type(&mut self, name: &str, bound: Option<TypeId>) -> TypeId {
        let name = self.names.intern(name);
        self.alloc(TypeData::Template(TemplateData {
            name,
            bound: bound.unwrap_or(TypeId::UNKNOWN),
        }))
    }

    /// Bind the template keys of `raw` to `args`, in declaration order.
    ///
    /// Missing arguments read as unknown and extra ones are dropped. A raw
    /// type without template keys, or an empty argument list, yields `raw`.
    pub fn create_templatized_type(&mut self, raw: TypeId, args: impl IntoIterator<Item = TypeId>) -> TypeId {
        let raw = self.resolve(raw);
        let raw = match self.data(raw) {
            TypeData::Templatized(templatized) => templatized.raw,
            _ => raw,
        };
        let keys: SmallVec<[TypeId; 2]> = self.template_keys(raw).iter().copied().collect();
        let args: SmallVec<[TypeId; 2]> = args.into_iter().collect();
        if keys.is_empty() || args.is_empty() {
            return raw;
        }

        let map = TemplateTypeMap::new(keys, args);
        if let Some(&existing) = self.templatized.get(&(raw, map.clone())) {
            return existing;
        }
        let id = self.alloc(TypeData::Templatized(TemplatizedData {
            raw,
            map: map.clone(),
        }));
        trace!(templatized = id.0, raw = raw.0, "interned templatized type");
        self.templatized.insert((raw, map), id);
        id
    }

    /// The bindings of a templatized type.
    pub fn template_type_map(&self, id: TypeId) -> Option<&TemplateTypeMap> {
        match self.data(self.effective_type(id)) {
            TypeData::Templatized(templatized) => Some(&templatized.map),
            _ => None,
        }
    }

    /// The raw type behind a templatized type, or `id` itself.
    pub fn raw_type(&self, id: TypeId) -> TypeId {
        let id = self.effective_type(id);
        match self.data(id) {
            TypeData::Templatized(templatized) => templatized.raw,
            _ => id,
        }
    }

    /// Replace the template keys bound in `bindings` throughout `id`.
    pub fn replace_templates(&mut self, id: TypeId, bindings: TemplateTypeMap, mode: ReplacementMode) -> TypeId {
        TemplateTypeReplacer::new(self, bindings, mode).replace(id)
    }
}

/// Substitutes template types according to a binding map.
///
/// ```ignore
/// let map = TemplateTypeMap::new([t], [TypeId::STRING]);
/// let mut replacer = TemplateTypeReplacer::total(&mut registry, map);
/// let replaced = replacer.replace(function_of_t);
/// assert!(replacer.has_made_replacement());
/// ```
pub struct TemplateTypeReplacer<'r> {
    registry: &'r mut TypeRegistry,
    bindings: TemplateTypeMap,
    mode: ReplacementMode,
    made_replacement: bool,
    guard: RecursionGuard<TypeId>,
}

/// The parts of a type the replacer rebuilds, detached from the registry.
enum Rebuild {
    Union(Arc<[TypeId]>),
    Record(Vec<(PropertyKey, TypeId)>),
    Function(FunctionKey),
    Templatized(TypeId, SmallVec<[TypeId; 2]>),
}

impl<'r> TemplateTypeReplacer<'r> {
    pub fn new(registry: &'r mut TypeRegistry, bindings: TemplateTypeMap, mode: ReplacementMode) -> Self {
        Self {
            registry,
            bindings,
            mode,
            made_replacement: false,
            guard: RecursionGuard::with_profile(RecursionProfile::TemplateReplacement),
        }
    }

    pub fn total(registry: &'r mut TypeRegistry, bindings: TemplateTypeMap) -> Self {
        Self::new(registry, bindings, ReplacementMode::Total)
    }

    pub fn partial(registry: &'r mut TypeRegistry, bindings: TemplateTypeMap) -> Self {
        Self::new(registry, bindings, ReplacementMode::Partial)
    }

    /// Whether any template type was encountered so far.
    pub fn has_made_replacement(&self) -> bool {
        self.made_replacement
    }

    pub fn replace(&mut self, id: TypeId) -> TypeId {
        match self.guard.enter(id) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return id,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                debug!(type_id = id.0, depth = self.guard.depth(), "template replacement limit reached");
                return id;
            }
        }
        let result = self.replace_unguarded(id);
        self.guard.leave(id);
        result
    }

    fn replace_unguarded(&mut self, id: TypeId) -> TypeId {
        let registry = &*self.registry;
        let rebuild = match registry.data(id) {
            TypeData::Template(_) => return self.replace_template(id),
            TypeData::Union(union) => Rebuild::Union(union.members.clone()),
            TypeData::Record(record) => Rebuild::Record(
                record
                    .properties
                    .iter()
                    .map(|(&key, prop)| (key, prop.type_id))
                    .collect(),
            ),
            TypeData::Function(func) if func.is_ordinary() && !func.object.flags.contains(ObjectFlags::NATIVE) => {
                Rebuild::Function(registry.function_key(id))
            }
            TypeData::Templatized(templatized) => {
                Rebuild::Templatized(templatized.raw, templatized.map.values.clone())
            }
            _ => return id,
        };

        match rebuild {
            Rebuild::Union(members) => {
                let replaced: SmallVec<[TypeId; 8]> = members.iter().map(|&m| self.replace(m)).collect();
                if replaced.as_slice() == &members[..] {
                    id
                } else {
                    self.registry.create_union_type(replaced)
                }
            }
            Rebuild::Record(properties) => {
                let replaced: Vec<(PropertyKey, TypeId)> =
                    properties.iter().map(|&(key, ty)| (key, self.replace(ty))).collect();
                if replaced == properties {
                    id
                } else {
                    self.registry.create_record_type(replaced)
                }
            }
            Rebuild::Function(key) => self.replace_in_function(id, key),
            Rebuild::Templatized(raw, args) => {
                let replaced: SmallVec<[TypeId; 2]> = args.iter().map(|&arg| self.replace(arg)).collect();
                if replaced == args {
                    id
                } else {
                    self.registry.create_templatized_type(raw, replaced)
                }
            }
        }
    }

    fn replace_template(&mut self, id: TypeId) -> TypeId {
        self.made_replacement = true;
        match self.bindings.get(id) {
            Some(value) if value == id => id,
            Some(value) => self.replace(value),
            None => match self.mode {
                ReplacementMode::Total => TypeId::UNKNOWN,
                ReplacementMode::Partial => id,
            },
        }
    }

    fn replace_in_function(&mut self, id: TypeId, key: FunctionKey) -> TypeId {
        let params: ParamList = key
            .params
            .iter()
            .map(|param| Param {
                type_id: self.replace(param.type_id),
                ..*param
            })
            .collect();
        let return_type = self.replace(key.return_type);
        let this_type = key.this_type.map(|this| self.replace(this));

        if params == key.params && return_type == key.return_type && this_type == key.this_type {
            return id;
        }
        let template_keys = key
            .template_keys
            .iter()
            .copied()
            .filter(|&k| !self.bindings.has_key(k))
            .collect();
        self.registry.intern_function(FunctionKey {
            kind: key.kind,
            params,
            return_type,
            this_type,
            template_keys,
        })
    }
}

#[cfg(test)]
#[path = "tests/templates_tests.rs"]
mod tests;
