//! Subtype checking.
//!
//! `SubtypeChecker` decides `sub ⊑ sup` for any two types of one registry. It
//! never fails: every pair of kinds has an answer, and comparisons that cannot
//! be decided (unknown types, failed references, unconstrained templates) are
//! answered permissively.
//!
//! ## Lattice shape
//!
//! ```text
//!                 All (*)
//!        /      |        \
//!   primitives  Object    Unknown (?) is sub- and supertype of everything
//!       |       |
//!       |   object types
//!       |       |
//!       |    NoObject
//!        \      /
//!         None
//! ```
//!
//! ## Dispatch order
//!
//! 1. Identity, then NamedType and template indirection is stripped.
//! 2. Unknown types and resolution placeholders accept everything.
//! 3. Top and bottom: `x ⊑ All`, `None ⊑ x`.
//! 4. Unions ([`subtype_rules::unions`](crate::subtype_rules)).
//! 5. Enum elements and primitives ([`subtype_rules::intrinsics`](crate::subtype_rules)).
//! 6. Object types: templatized, functions, structural and nominal.
//!
//! Every comparison that can recurse (unions, functions, templatized and
//! structural object types) goes through a [`RecursionGuard`] keyed by the
//! `(sub, sup)` pair, so self-referential types of any shape terminate.
//! Re-entering a pair that is still being decided answers `true`, as does
//! running out of depth or iteration budget. Both outcomes are reported through
//! [`SubtypeResult::CycleDetected`] and [`SubtypeResult::DepthExceeded`],
//! which count as true.
//!
//! The checker only reads the registry. It never creates types, so template
//! arguments of templatized types are substituted one level deep while their
//! properties are compared.

use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::registry::TypeRegistry;
use crate::types::*;
use jst_common::limits::MAX_NAMED_TYPE_CHAIN;
use tracing::{debug, trace};

/// Outcome of a subtype query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubtypeResult {
    True,
    False,
    /// A structural comparison re-entered a pair already being compared.
    CycleDetected,
    /// The comparison ran out of depth or iteration budget.
    DepthExceeded,
}

impl SubtypeResult {
    #[inline]
    pub fn is_true(self) -> bool {
        !matches!(self, SubtypeResult::False)
    }

    #[inline]
    pub fn is_false(self) -> bool {
        matches!(self, SubtypeResult::False)
    }

    #[inline]
    pub fn from_bool(value: bool) -> Self {
        if value { SubtypeResult::True } else { SubtypeResult::False }
    }
}

pub struct SubtypeChecker<'a> {
    pub(crate) registry: &'a TypeRegistry,
    pub(crate) guard: RecursionGuard<(TypeId, TypeId)>,
}

impl<'a> SubtypeChecker<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        let options = registry.options();
        Self {
            registry,
            guard: RecursionGuard::with_profile(RecursionProfile::Custom {
                max_depth: options.max_subtype_depth,
                max_iterations: options.max_subtype_iterations,
            }),
        }
    }

    /// Number of structural re-entries answered as cycles so far.
    pub fn cycles_detected(&self) -> u32 {
        self.guard.cycles()
    }

    /// Check whether `sub ⊑ sup`.
    pub fn check_subtype(&mut self, sub: TypeId, sup: TypeId) -> SubtypeResult {
        if sub == sup {
            return SubtypeResult::True;
        }
        let sub = self.strip(sub);
        let sup = self.strip(sup);
        if sub == sup {
            return SubtypeResult::True;
        }

        if sub.is_unknown_singleton() || sup.is_unknown_singleton() {
            return SubtypeResult::True;
        }
        let reg = self.registry;
        let sub_data = reg.data(sub);
        let sup_data = reg.data(sup);
        if matches!(sub_data, TypeData::NoResolved(_)) || matches!(sup_data, TypeData::NoResolved(_)) {
            return SubtypeResult::True;
        }
        if sup == TypeId::ALL || sub == TypeId::NONE {
            return SubtypeResult::True;
        }
        if sub == TypeId::ALL || sup == TypeId::NONE {
            return SubtypeResult::False;
        }

        if let TypeData::EnumElement(element) = sub_data {
            return self.check_enum_element_subtype(sub, element, sup);
        }
        let involves_union = matches!(sub_data, TypeData::Union(_)) || matches!(sup_data, TypeData::Union(_));
        if !involves_union {
            if let Some(result) = self.check_intrinsic_subtype(sub_data, sup_data) {
                return result;
            }
        }

        match self.guard.enter((sub, sup)) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                trace!(sub = sub.0, sup = sup.0, "subtype cycle; assuming subtype");
                return SubtypeResult::CycleDetected;
            }
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                debug!(
                    sub = sub.0,
                    sup = sup.0,
                    depth = self.guard.depth(),
                    "subtype limit reached; assuming subtype"
                );
                return SubtypeResult::DepthExceeded;
            }
        }
        let result = match (sub_data, sup_data) {
            (TypeData::Union(union), _) => self.check_union_source_subtype(&union.members, sup),
            (_, TypeData::Union(union)) => self.check_union_target_subtype(sub, &union.members),
            _ => self.check_object_subtype(sub, sup),
        };
        self.guard.leave((sub, sup));
        result
    }

    /// Strip NamedType indirection and replace template placeholders by
    /// their bounds. An unresolved reference reads as unknown.
    pub(crate) fn strip(&self, id: TypeId) -> TypeId {
        self.registry.strip_indirection(id)
    }
}

impl TypeRegistry {
    /// Whether `sub ⊑ sup`.
    pub fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool {
        SubtypeChecker::new(self).check_subtype(sub, sup).is_true()
    }

    /// Like [`is_subtype_of`](Self::is_subtype_of), keeping the detail of
    /// how a true answer was reached.
    pub fn check_subtype(&self, sub: TypeId, sup: TypeId) -> SubtypeResult {
        SubtypeChecker::new(self).check_subtype(sub, sup)
    }

    /// Strip NamedType indirection and template placeholders.
    pub(crate) fn strip_indirection(&self, id: TypeId) -> TypeId {
        let mut current = id;
        for _ in 0..MAX_NAMED_TYPE_CHAIN {
            let next = match self.data(current) {
                TypeData::Named(_) => self.effective_type(current),
                TypeData::Template(template) => template.bound,
                _ => return current,
            };
            if next == current {
                return current;
            }
            current = next;
        }
        TypeId::UNKNOWN
    }
}

#[cfg(test)]
#[path = "tests/subtype_tests.rs"]
mod tests;
