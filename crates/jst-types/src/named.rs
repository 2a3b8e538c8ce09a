//! Named-type resolution.
//!
//! A NamedType is a forward reference `(scope, name, location)` created while
//! declarations are still being collected. After collection the caller runs
//! [`TypeRegistry::resolve_named_types`] exactly once:
//!
//! ```text
//! Unresolved ──lookup ok──▶ Resolved(target)
//!     │
//!     └──lookup fails / cycle──▶ Failed(NoResolved(name))
//! ```
//!
//! Both outcomes are terminal. A resolved reference delegates every query to
//! its target; a failed one answers through a placeholder that is a subtype
//! and supertype of everything, so no query ever has to fail. The pass seals
//! the registry: no definition window may be opened afterwards.
//!
//! ## Lookup
//!
//! 1. The full name is looked up in the reference's scope and then each
//!    enclosing scope.
//! 2. A dotted name `a.b.C` whose full form is not declared resolves `a` and
//!    then walks properties. A constructor or interface found at the end
//!    resolves to its instance type, an enum to its element type.
//! 3. A declared value that is itself a NamedType is followed. Following a
//!    chain back to a reference that is still being resolved is a cycle.

use crate::registry::{PendingProperty, TypeRegistry};
use crate::types::*;
use jst_common::diagnostic_codes::{CYCLIC_TYPE_REFERENCE, UNRESOLVED_TYPE_REFERENCE};
use jst_common::limits::MAX_NAMED_TYPE_CHAIN;
use jst_common::{Atom, Diagnostic, ErrorReporter, diagnostic_messages, format_message};
use tracing::{debug, debug_span, trace};

impl TypeRegistry {
    /// The type `id` stands for once NamedType indirection is stripped.
    ///
    /// A resolved reference yields its target, a failed one its placeholder
    /// and an unresolved one the unknown type.
    pub fn effective_type(&self, id: TypeId) -> TypeId {
        match self.data(id) {
            TypeData::Named(named) => match named.state {
                NamedState::Resolved(target) | NamedState::Failed(target) => target,
                NamedState::Unresolved => TypeId::UNKNOWN,
            },
            _ => id,
        }
    }

    /// The cached resolution of a NamedType, or `id` itself for anything else
    /// (including references that have not been resolved yet).
    pub fn resolve(&self, id: TypeId) -> TypeId {
        match self.data(id) {
            TypeData::Named(named) => match named.state {
                NamedState::Resolved(target) | NamedState::Failed(target) => target,
                NamedState::Unresolved => id,
            },
            _ => id,
        }
    }

    /// Whether `id` is a NamedType that resolved successfully.
    /// Types that are not references count as resolved.
    pub fn is_resolved(&self, id: TypeId) -> bool {
        match self.data(id) {
            TypeData::Named(named) => matches!(named.state, NamedState::Resolved(_)),
            _ => true,
        }
    }

    /// The referenced name of a NamedType or a resolution placeholder.
    pub fn reference_name(&self, id: TypeId) -> Option<&str> {
        match self.data(id) {
            TypeData::Named(named) => Some(self.names.resolve(named.name)),
            TypeData::NoResolved(name) if !name.is_none() => Some(self.names.resolve(*name)),
            _ => None,
        }
    }

    pub(crate) fn is_unresolved_named(&self, id: TypeId) -> bool {
        matches!(
            self.data(id),
            TypeData::Named(NamedData {
                state: NamedState::Unresolved,
                ..
            })
        )
    }

    /// Look up a declared type by name, walking outward from `scope`.
    pub fn lookup_type(&self, scope: ScopeId, name: &str) -> Option<TypeId> {
        let atom = self.names.get(name)?;
        self.lookup_in_scopes(scope, atom)
    }

    fn lookup_in_scopes(&self, scope: ScopeId, name: Atom) -> Option<TypeId> {
        let mut current = Some(scope);
        while let Some(scope_id) = current {
            let scope = self.scopes.get(scope_id.0 as usize)?;
            if let Some(&found) = scope.types.get(&name) {
                return Some(found);
            }
            current = scope.parent;
        }
        None
    }

    fn lookup_qualified(&self, scope: ScopeId, name: Atom) -> Option<TypeId> {
        if let Some(found) = self.lookup_in_scopes(scope, name) {
            return Some(found);
        }

        let full = self.names.resolve(name);
        let (root, path) = full.split_once('.')?;
        let mut current = self.lookup_in_scopes(scope, self.names.get(root)?)?;
        for segment in path.split('.') {
            let key = PropertyKey::Name(self.names.get(segment)?);
            current = self.find_slot(self.effective_type(current), key)?.type_id;
        }

        match self.data(self.effective_type(current)) {
            TypeData::Function(func) if !func.is_ordinary() => func.instance_type,
            TypeData::Enum(data) => Some(data.element),
            _ => None,
        }
    }

    /// Run the resolution pass over every pending NamedType and seal the
    /// registry.
    ///
    /// Running it again is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if a definition window is still open.
    pub fn resolve_named_types(&mut self, reporter: &mut dyn ErrorReporter) {
        assert!(
            self.window_depth == 0,
            "named-type resolution started while {} definition window(s) are open",
            self.window_depth
        );
        if self.sealed {
            trace!("named-type resolution already ran");
            return;
        }

        let pending = std::mem::take(&mut self.pending_named);
        let span = debug_span!("resolve_named_types", pending = pending.len());
        let _guard = span.enter();

        let mut resolved = 0usize;
        let mut failed = 0usize;
        let mut chain = Vec::new();
        for id in pending {
            chain.clear();
            match self.resolve_named(id, reporter, &mut chain) {
                NamedState::Resolved(_) => resolved += 1,
                _ => failed += 1,
            }
        }

        self.sealed = true;
        self.pending_properties.clear();
        debug!(resolved, failed, "named-type resolution complete");
    }

    fn resolve_named(&mut self, id: TypeId, reporter: &mut dyn ErrorReporter, chain: &mut Vec<TypeId>) -> NamedState {
        let named = match self.data(id) {
            TypeData::Named(named) => named.clone(),
            _ => return NamedState::Resolved(id),
        };
        if named.state.is_terminal() {
            return named.state;
        }

        if chain.contains(&id) || chain.len() >= MAX_NAMED_TYPE_CHAIN {
            let name = self.names.resolve_arc(named.name);
            debug!(name = %name, depth = chain.len(), "cyclic named type reference");
            reporter.report(Diagnostic::error(
                named.location.clone(),
                format_message(diagnostic_messages::CYCLIC_TYPE_REFERENCE, &[&name]),
                CYCLIC_TYPE_REFERENCE,
            ));
            // The frame that is resolving `id` commits it.
            return NamedState::Failed(self.no_resolved_type(named.name));
        }

        chain.push(id);
        let state = match self.lookup_qualified(named.scope, named.name) {
            None => {
                let name = self.names.resolve_arc(named.name);
                debug!(name = %name, location = %named.location, "unresolved type reference");
                reporter.report(Diagnostic::error(
                    named.location.clone(),
                    format_message(diagnostic_messages::UNRESOLVED_TYPE_REFERENCE, &[&name]),
                    UNRESOLVED_TYPE_REFERENCE,
                ));
                NamedState::Failed(self.no_resolved_type(named.name))
            }
            Some(target) if matches!(self.data(target), TypeData::Named(_)) => {
                match self.resolve_named(target, reporter, chain) {
                    NamedState::Resolved(final_target) => NamedState::Resolved(final_target),
                    _ => NamedState::Failed(self.no_resolved_type(named.name)),
                }
            }
            Some(target) => NamedState::Resolved(target),
        };
        chain.pop();

        self.commit_named(id, state);
        state
    }

    /// Move a NamedType into a terminal state and replay the property
    /// definitions made on it while it was pending.
    ///
    /// # Panics
    ///
    /// Panics if the reference is already terminal.
    pub(crate) fn commit_named(&mut self, id: TypeId, state: NamedState) {
        let name = match self.data(id) {
            TypeData::Named(named) => {
                if named.state.is_terminal() {
                    panic!(
                        "NamedType `{}` mutated after it was resolved",
                        self.names.resolve(named.name)
                    );
                }
                named.name
            }
            other => panic!("commit_named called on {:?}", other.kind()),
        };
        if let TypeData::Named(named) = self.data_mut(id) {
            named.state = state;
        }
        trace!(named = id.0, name = %self.names.resolve(name), ?state, "named type committed");

        let pending = self.pending_properties.remove(&id).unwrap_or_default();
        if let NamedState::Resolved(target) = state {
            for PendingProperty {
                key,
                type_id,
                inferred,
                source,
            } in pending
            {
                if inferred {
                    self.define_inferred_property(target, key, type_id, source);
                } else {
                    self.define_declared_property(target, key, type_id, source);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/named_tests.rs"]
mod tests;
