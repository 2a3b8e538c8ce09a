//! The definition window.
//!
//! Declarations (scopes, type names, forward references, template keys and
//! inheritance edges) may only be made while a [`DefinitionWindow`] is open.
//! The window is a guard borrowing the registry mutably, so:
//!
//! - windows nest, and the borrow checker forces them to close in LIFO order;
//! - every exit path, unwinding included, closes the window on drop;
//! - once [`TypeRegistry::resolve_named_types`] has sealed the registry,
//!   opening another window is a contract violation and panics.
//!
//! The window dereferences to the registry, so every other registry
//! operation stays available while it is open.

use crate::registry::{Scope, TypeRegistry};
use crate::types::*;
use jst_common::SourceLocation;
use std::ops::{Deref, DerefMut};
use tracing::{debug, trace};

pub struct DefinitionWindow<'r> {
    registry: &'r mut TypeRegistry,
    depth: u32,
}

impl TypeRegistry {
    /// Open a definition window.
    ///
    /// # Panics
    ///
    /// Panics if the registry has been sealed by the resolution pass.
    pub fn open_window(&mut self) -> DefinitionWindow<'_> {
        assert!(
            !self.sealed,
            "definition window opened after named-type resolution sealed the registry"
        );
        self.window_depth += 1;
        let depth = self.window_depth;
        debug!(depth, "definition window opened");
        DefinitionWindow { registry: self, depth }
    }

    pub fn is_window_open(&self) -> bool {
        self.window_depth > 0
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}

impl Drop for DefinitionWindow<'_> {
    fn drop(&mut self) {
        debug_assert_eq!(
            self.registry.window_depth, self.depth,
            "definition windows closed out of order"
        );
        self.registry.window_depth -= 1;
        debug!(depth = self.depth, "definition window closed");
    }
}

impl Deref for DefinitionWindow<'_> {
    type Target = TypeRegistry;

    fn deref(&self) -> &TypeRegistry {
        self.registry
    }
}

impl DerefMut for DefinitionWindow<'_> {
    fn deref_mut(&mut self) -> &mut TypeRegistry {
        self.registry
    }
}

impl DefinitionWindow<'_> {
    /// Nesting depth of this window; the outermost window is 1.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn create_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.registry.scopes.len() as u32);
        self.registry.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        id
    }

    /// Declare `name` in `scope`. The first declaration wins; redeclaring
    /// returns `false` and leaves the earlier binding in place.
    pub fn declare_type(&mut self, scope: ScopeId, name: &str, type_id: TypeId) -> bool {
        let atom = self.registry.names.intern(name);
        let Some(scope_data) = self.registry.scopes.get_mut(scope.0 as usize) else {
            panic!("ScopeId({}) does not belong to this registry", scope.0);
        };
        if scope_data.types.contains_key(&atom) {
            debug!(name, scope = scope.0, "type redeclared; keeping first declaration");
            return false;
        }
        scope_data.types.insert(atom, type_id);
        trace!(name, scope = scope.0, type_id = type_id.0, "declared type");
        true
    }

    /// Create a forward reference to `name` as seen from `scope`.
    pub fn create_named_type(&mut self, scope: ScopeId, name: &str, location: SourceLocation) -> TypeId {
        let atom = self.registry.names.intern(name);
        let id = self.registry.alloc(TypeData::Named(NamedData {
            scope,
            name: atom,
            location,
            state: NamedState::Unresolved,
        }));
        self.registry.pending_named.push(id);
        trace!(name, named = id.0, "created named type");
        id
    }

    /// Resolve a forward reference eagerly to a known target.
    ///
    /// Returns `false` if `target` is itself a reference that has not been
    /// resolved yet.
    ///
    /// # Panics
    ///
    /// Panics if `named` is not a NamedType or was already resolved.
    pub fn bind_named_type(&mut self, named: TypeId, target: TypeId) -> bool {
        let target = self.registry.resolve(target);
        if self.registry.is_unresolved_named(target) {
            return false;
        }
        self.registry.commit_named(named, NamedState::Resolved(target));
        true
    }

    /// Replace the template keys of a constructor or interface function.
    /// Returns `false` if `ctor` is not a function type.
    pub fn set_template_keys(&mut self, ctor: TypeId, keys: impl IntoIterator<Item = TypeId>) -> bool {
        match self.registry.data_mut(ctor) {
            TypeData::Function(func) => {
                func.template_keys = keys.into_iter().collect();
                true
            }
            _ => false,
        }
    }

    /// Record that constructor `ctor` implements the interface whose instance
    /// type is `interface_instance`.
    pub fn add_implemented_interface(&mut self, ctor: TypeId, interface_instance: TypeId) -> bool {
        match self.registry.data_mut(ctor) {
            TypeData::Function(func) if func.is_constructor() => {
                if !func.implemented_interfaces.contains(&interface_instance) {
                    func.implemented_interfaces.push(interface_instance);
                }
                true
            }
            _ => false,
        }
    }

    /// Record that interface function `interface` extends the interface whose
    /// instance type is `super_instance`.
    pub fn add_extended_interface(&mut self, interface: TypeId, super_instance: TypeId) -> bool {
        match self.registry.data_mut(interface) {
            TypeData::Function(func) if func.is_interface() => {
                if !func.extended_interfaces.contains(&super_instance) {
                    func.extended_interfaces.push(super_instance);
                }
                true
            }
            _ => false,
        }
    }

    /// Make `ctor` a subclass of `super_ctor`: the implicit prototype of
    /// `ctor.prototype` becomes the super instance type.
    pub fn set_superclass(&mut self, ctor: TypeId, super_ctor: TypeId) -> bool {
        let (Some(prototype), Some(super_instance)) =
            (self.registry.prototype_of(ctor), self.registry.instance_type(super_ctor))
        else {
            return false;
        };
        if !self.registry.function_data(ctor).is_some_and(FunctionData::is_constructor) {
            return false;
        }
        match self.registry.data_mut(prototype).object_data_mut() {
            Some(object) => {
                object.implicit_prototype = Some(super_instance);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/window_tests.rs"]
mod tests;
