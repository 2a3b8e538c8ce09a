//! The type registry.
//!
//! `TypeRegistry` owns every type value of one compilation unit in an arena
//! indexed by [`TypeId`]. Compound values that are identified by shape
//! (unions, records, anonymous functions, templatized types and resolution
//! placeholders) are interned in content-addressed caches, so equal shapes share
//! one id. Nominal values (constructors, interfaces, enums, plain objects) get a
//! fresh id on every creation.
//!
//! Native singletons are created in [`NativeType`] order when the registry is
//! built, so `TypeId(n as u32)` is the id of native `n`.
//!
//! The registry is single-threaded. Mutation goes through `&mut self`; the
//! declaration-only operations live on [`DefinitionWindow`](crate::DefinitionWindow).

use crate::options::LatticeOptions;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::types::*;
use indexmap::IndexMap;
use jst_common::{Atom, Interner, SourceLocation};
use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::trace;

/// Interning key for anonymous function types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FunctionKey {
    pub kind: FunctionKind,
    pub params: ParamList,
    pub return_type: TypeId,
    pub this_type: Option<TypeId>,
    pub template_keys: SmallVec<[TypeId; 2]>,
}

/// A declaration scope: names declared here plus the enclosing scope.
#[derive(Debug, Default)]
pub(crate) struct Scope {
    pub parent: Option<ScopeId>,
    pub types: FxHashMap<Atom, TypeId>,
}

/// A property definition made on a NamedType before it was resolved.
#[derive(Clone, Debug)]
pub(crate) struct PendingProperty {
    pub key: PropertyKey,
    pub type_id: TypeId,
    pub inferred: bool,
    pub source: Option<SourceLocation>,
}

pub struct TypeRegistry {
    pub(crate) types: Vec<TypeData>,
    pub(crate) names: Interner,
    pub(crate) options: LatticeOptions,
    pub(crate) unions: FxHashMap<Arc<[TypeId]>, TypeId>,
    pub(crate) records: FxHashMap<Vec<(PropertyKey, TypeId)>, TypeId>,
    pub(crate) functions: FxHashMap<FunctionKey, TypeId>,
    pub(crate) templatized: FxHashMap<(TypeId, TemplateTypeMap), TypeId>,
    pub(crate) no_resolved: FxHashMap<Atom, TypeId>,
    pub(crate) scopes: Vec<Scope>,
    /// NamedTypes waiting for the resolution pass, in creation order.
    pub(crate) pending_named: Vec<TypeId>,
    pub(crate) pending_properties: FxHashMap<TypeId, Vec<PendingProperty>>,
    pub(crate) window_depth: u32,
    /// Set once the resolution pass has run; no window may open afterwards.
    pub(crate) sealed: bool,
    /// Joins and meets in progress, keyed by `(a, b, is_join)`.
    pub(crate) merge_guard: RecursionGuard<(TypeId, TypeId, bool)>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.len())
            .field("unions", &self.unions.len())
            .field("records", &self.records.len())
            .field("pending_named", &self.pending_named.len())
            .field("sealed", &self.sealed)
            .finish()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::with_options(LatticeOptions::default())
    }

    pub fn with_options(options: LatticeOptions) -> Self {
        let mut names = Interner::new();
        names.intern_common();
        let mut registry = TypeRegistry {
            types: Vec::with_capacity(256),
            names,
            options,
            unions: FxHashMap::default(),
            records: FxHashMap::default(),
            functions: FxHashMap::default(),
            templatized: FxHashMap::default(),
            no_resolved: FxHashMap::default(),
            scopes: vec![Scope::default()],
            pending_named: Vec::new(),
            pending_properties: FxHashMap::default(),
            window_depth: 0,
            sealed: false,
            merge_guard: RecursionGuard::with_profile(RecursionProfile::SubtypeCheck),
        };
        crate::natives::bootstrap(&mut registry);
        registry
    }

    // =========================================================================
    // Arena access
    // =========================================================================

    #[inline]
    pub fn options(&self) -> &LatticeOptions {
        &self.options
    }

    #[inline]
    pub fn names(&self) -> &Interner {
        &self.names
    }

    pub fn intern(&mut self, name: &str) -> Atom {
        self.names.intern(name)
    }

    /// Property key for a plain name.
    pub fn key(&mut self, name: &str) -> PropertyKey {
        PropertyKey::Name(self.names.intern(name))
    }

    /// Property key for a well-known symbol such as `Symbol.iterator`.
    pub fn symbol_key(&mut self, name: &str) -> PropertyKey {
        PropertyKey::Symbol(self.names.intern(name))
    }

    /// Number of type values in the arena, natives included.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn native(&self, native: NativeType) -> TypeId {
        native.type_id()
    }

    /// The payload of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this registry.
    #[inline]
    pub fn data(&self, id: TypeId) -> &TypeData {
        match self.types.get(id.index()) {
            Some(data) => data,
            None => panic!(
                "TypeId({}) does not belong to this registry ({} types)",
                id.0,
                self.types.len()
            ),
        }
    }

    pub(crate) fn data_mut(&mut self, id: TypeId) -> &mut TypeData {
        let len = self.types.len();
        match self.types.get_mut(id.index()) {
            Some(data) => data,
            None => panic!("TypeId({}) does not belong to this registry ({len} types)", id.0),
        }
    }

    pub(crate) fn alloc(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(data);
        id
    }

    /// The id the next allocation will receive.
    #[inline]
    pub(crate) fn next_id(&self) -> TypeId {
        TypeId(self.types.len() as u32)
    }

    #[inline]
    pub fn kind(&self, id: TypeId) -> TypeKind {
        self.data(id).kind()
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Whether `id` lives in the object sub-lattice. A union is an object type
    /// when all of its members are.
    pub fn is_object_type(&self, id: TypeId) -> bool {
        let id = self.effective_type(id);
        match self.data(id) {
            TypeData::Union(union) => union.members.iter().all(|&m| self.is_object_type(m)),
            data => data.kind().is_object_family(),
        }
    }

    /// None, NoObject, resolution placeholders and the least function type.
    pub fn is_empty_type(&self, id: TypeId) -> bool {
        let id = self.effective_type(id);
        matches!(
            self.data(id),
            TypeData::None | TypeData::NoObject | TypeData::NoResolved(_)
        ) || id == self.native(NativeType::LeastFunction)
    }

    pub fn is_unknown_type(&self, id: TypeId) -> bool {
        self.effective_type(id).is_unknown_singleton()
    }

    pub fn function_data(&self, id: TypeId) -> Option<&FunctionData> {
        self.data(self.effective_type(id)).as_function()
    }

    pub fn union_members(&self, id: TypeId) -> Option<&[TypeId]> {
        self.data(id).union_members().map(|members| &members[..])
    }

    /// Display name of a nominal type, if it has one.
    pub fn object_name(&self, id: TypeId) -> Option<&str> {
        let atom = match self.data(id) {
            TypeData::EnumElement(element) => Some(element.name),
            TypeData::Template(template) => Some(template.name),
            data => data.object_data().and_then(|obj| obj.name),
        }?;
        Some(self.names.resolve(atom))
    }

    // =========================================================================
    // Object types
    // =========================================================================

    /// Create a nominal object type. Without an explicit implicit prototype the
    /// new object inherits from the `Object` instance type.
    pub fn create_object_type(&mut self, name: Option<&str>, implicit_prototype: Option<TypeId>) -> TypeId {
        let name = name.map(|n| self.names.intern(n));
        let proto = implicit_prototype.unwrap_or(self.native(NativeType::Object));
        self.alloc(TypeData::Object(ObjectData::named(name, Some(proto))))
    }

    /// Create (or look up) the record type with exactly these properties.
    ///
    /// Records are interned by their sorted `(key, type)` list; a key given
    /// twice keeps its last type.
    pub fn create_record_type(&mut self, properties: impl IntoIterator<Item = (PropertyKey, TypeId)>) -> TypeId {
        let mut entries: IndexMap<PropertyKey, TypeId, FxBuildHasher> = properties.into_iter().collect();
        entries.sort_keys();
        let key: Vec<(PropertyKey, TypeId)> = entries.into_iter().collect();

        if let Some(&existing) = self.records.get(&key) {
            return existing;
        }

        let id = self.next_id();
        let mut object = ObjectData::named(None, Some(self.native(NativeType::Object)));
        object.flags = ObjectFlags::STRUCTURAL | ObjectFlags::INTERNED;
        for &(prop_key, type_id) in &key {
            object.properties.insert(
                prop_key,
                Property {
                    type_id,
                    inferred: false,
                    source: None,
                    owner: id,
                },
            );
        }
        self.alloc(TypeData::Record(object));
        trace!(record = id.0, properties = key.len(), "interned record type");
        self.records.insert(key, id);
        id
    }

    /// Create a constructor function together with its `.prototype` object
    /// and its instance type. Returns the constructor.
    pub fn create_constructor_type(
        &mut self,
        name: &str,
        params: impl IntoIterator<Item = Param>,
        template_keys: impl IntoIterator<Item = TypeId>,
    ) -> TypeId {
        self.create_nominal_function(
            name,
            FunctionKind::Constructor,
            params.into_iter().collect(),
            template_keys.into_iter().collect(),
            ObjectFlags::INSTANCE,
        )
    }

    /// Create a nominal interface. Returns the interface function; its
    /// instance type is what values are annotated with.
    pub fn create_interface_type(&mut self, name: &str, template_keys: impl IntoIterator<Item = TypeId>) -> TypeId {
        self.create_nominal_function(
            name,
            FunctionKind::Interface,
            ParamList::new(),
            template_keys.into_iter().collect(),
            ObjectFlags::INSTANCE | ObjectFlags::INTERFACE,
        )
    }

    /// Create an interface whose instances are matched by shape (`@record`).
    pub fn create_record_interface_type(
        &mut self,
        name: &str,
        template_keys: impl IntoIterator<Item = TypeId>,
    ) -> TypeId {
        self.create_nominal_function(
            name,
            FunctionKind::Interface,
            ParamList::new(),
            template_keys.into_iter().collect(),
            ObjectFlags::INSTANCE | ObjectFlags::INTERFACE | ObjectFlags::STRUCTURAL,
        )
    }

    fn create_nominal_function(
        &mut self,
        name: &str,
        kind: FunctionKind,
        params: ParamList,
        template_keys: SmallVec<[TypeId; 2]>,
        instance_flags: ObjectFlags,
    ) -> TypeId {
        let atom = self.names.intern(name);
        let proto_atom = self.names.intern(&format!("{name}.prototype"));
        let prototype_key = self.key("prototype");

        let ctor = self.next_id();
        let proto = TypeId(ctor.0 + 1);
        let instance = TypeId(ctor.0 + 2);

        let mut ctor_object = ObjectData::named(Some(atom), Some(self.native(NativeType::FunctionPrototype)));
        ctor_object.properties.insert(
            prototype_key,
            Property {
                type_id: proto,
                inferred: false,
                source: None,
                owner: ctor,
            },
        );
        self.alloc(TypeData::Function(Box::new(FunctionData {
            object: ctor_object,
            kind,
            params,
            return_type: TypeId::UNKNOWN,
            this_type: Some(instance),
            template_keys,
            prototype: Some(proto),
            instance_type: Some(instance),
            implemented_interfaces: Vec::new(),
            extended_interfaces: Vec::new(),
        })));

        let mut proto_object = ObjectData::named(Some(proto_atom), Some(self.native(NativeType::Object)));
        proto_object.flags = ObjectFlags::PROTOTYPE;
        proto_object.constructor = Some(ctor);
        self.alloc(TypeData::Object(proto_object));

        let mut instance_object = ObjectData::named(Some(atom), Some(proto));
        instance_object.flags = instance_flags;
        instance_object.constructor = Some(ctor);
        self.alloc(TypeData::Object(instance_object));

        trace!(name, ctor = ctor.0, instance = instance.0, ?kind, "created nominal function");
        ctor
    }

    /// Create an enum whose elements are drawn from `element_type`.
    /// Returns the enum object; see [`enum_element_type`](Self::enum_element_type).
    pub fn create_enum_type(&mut self, name: &str, element_type: TypeId) -> TypeId {
        let atom = self.names.intern(name);
        let enum_id = self.next_id();
        let element = TypeId(enum_id.0 + 1);
        self.alloc(TypeData::Enum(EnumData {
            object: ObjectData::named(Some(atom), Some(self.native(NativeType::Object))),
            element,
        }));
        self.alloc(TypeData::EnumElement(EnumElementData {
            name: atom,
            enum_type: enum_id,
            primitive: element_type,
        }));
        enum_id
    }

    /// The unique element type of an enum.
    pub fn enum_element_type(&self, enum_type: TypeId) -> Option<TypeId> {
        match self.data(self.effective_type(enum_type)) {
            TypeData::Enum(data) => Some(data.element),
            _ => None,
        }
    }

    /// Declare `name` as a member of the enum. Returns `false` if `enum_type`
    /// is not an enum.
    pub fn define_enum_element(&mut self, enum_type: TypeId, name: &str, source: Option<SourceLocation>) -> bool {
        let Some(element) = self.enum_element_type(enum_type) else {
            return false;
        };
        let key = self.key(name);
        self.define_declared_property(enum_type, key, element, source)
    }

    // =========================================================================
    // Nominal navigation
    // =========================================================================

    /// Instance type of a constructor or interface function.
    pub fn instance_type(&self, ctor: TypeId) -> Option<TypeId> {
        self.function_data(ctor).and_then(|f| f.instance_type)
    }

    /// The `.prototype` object of a constructor or interface function.
    pub fn prototype_of(&self, ctor: TypeId) -> Option<TypeId> {
        self.function_data(ctor).and_then(|f| f.prototype)
    }

    /// The constructor that owns an instance or prototype object.
    pub fn constructor_of(&self, object: TypeId) -> Option<TypeId> {
        let object = self.effective_type(object);
        match self.data(object) {
            TypeData::Templatized(templatized) => self.constructor_of(templatized.raw),
            data => data.object_data().and_then(|obj| obj.constructor),
        }
    }

    pub fn implicit_prototype(&self, object: TypeId) -> Option<TypeId> {
        let object = self.effective_type(object);
        match self.data(object) {
            TypeData::Templatized(templatized) => self.implicit_prototype(templatized.raw),
            data => data.object_data().and_then(|obj| obj.implicit_prototype),
        }
    }

    /// Template keys declared by the constructor behind `id` (a constructor,
    /// one of its instances, or a templatization of one).
    pub fn template_keys(&self, id: TypeId) -> &[TypeId] {
        let id = self.effective_type(id);
        match self.data(id) {
            TypeData::Function(func) => &func.template_keys,
            TypeData::Templatized(templatized) => self.template_keys(templatized.raw),
            TypeData::Object(obj) => match obj.constructor {
                Some(ctor) if obj.flags.contains(ObjectFlags::INSTANCE) => self.template_keys(ctor),
                _ => &[],
            },
            _ => &[],
        }
    }

    // =========================================================================
    // Derived unions
    // =========================================================================

    /// `(t|null)`
    pub fn create_nullable_type(&mut self, id: TypeId) -> TypeId {
        self.create_union_type([id, TypeId::NULL])
    }

    /// `(t|undefined)`
    pub fn create_optional_type(&mut self, id: TypeId) -> TypeId {
        self.create_union_type([id, TypeId::VOID])
    }

    /// Remove `null` and `undefined` from `id`.
    pub fn restrict_by_not_null_or_undefined(&mut self, id: TypeId) -> TypeId {
        let id = self.effective_type(id);
        match self.data(id) {
            TypeData::Null | TypeData::Void => TypeId::NONE,
            TypeData::Union(union) => {
                let members: Vec<TypeId> = union
                    .members
                    .iter()
                    .copied()
                    .filter(|&m| m != TypeId::NULL && m != TypeId::VOID)
                    .collect();
                if members.len() == union.members.len() {
                    id
                } else {
                    self.create_union_type(members)
                }
            }
            _ => id,
        }
    }

    // =========================================================================
    // Placeholders
    // =========================================================================

    /// The interned resolution-failure placeholder for `name`.
    pub(crate) fn no_resolved_type(&mut self, name: Atom) -> TypeId {
        if let Some(&id) = self.no_resolved.get(&name) {
            return id;
        }
        let id = self.alloc(TypeData::NoResolved(name));
        self.no_resolved.insert(name, id);
        id
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
