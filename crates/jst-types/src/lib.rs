//! Static Type Lattice
//!
//! This crate implements the type representation and lattice engine of a
//! static analyzer for a dynamically-typed scripting language:
//!
//! - **Registry**: arena of type values addressed by [`TypeId`], with native
//!   singletons at fixed ids and content-addressed interning of unions,
//!   records, anonymous functions and templatized types
//! - **Subtyping**: a total `⊑` over every pair of kinds, nominal for classes
//!   and interfaces, structural for records and `@record` interfaces, with an
//!   explicit cycle guard for self-referential hierarchies
//! - **Lattice**: join (least supertype), meet (greatest subtype) and
//!   three-valued equality testing
//! - **Property model**: declared and inferred slots resolved along the
//!   implicit prototype chain
//! - **Templates**: template types, templatized types and replacement
//! - **Named types**: forward references collected inside a
//!   [`DefinitionWindow`] and resolved once by
//!   [`TypeRegistry::resolve_named_types`]
//!
//! No operation fails on user input. Type disagreements are answers
//! (`bool`, [`TernaryValue`], [`SubtypeResult`]); unresolved names are reported
//! to an [`ErrorReporter`](jst_common::ErrorReporter) and turn into
//! placeholders. Only caller contract violations panic.
mod equality;
mod format;
mod function_builder;
mod lattice;
mod named;
mod natives;
pub mod options;
mod properties;
pub mod recursion;
mod registry;
mod subtype;
mod subtype_rules;
mod templates;
pub mod types;
mod window;

pub use format::TypeFormatter;
pub use function_builder::FunctionBuilder;
pub use options::LatticeOptions;
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use registry::TypeRegistry;
pub use subtype::{SubtypeChecker, SubtypeResult};
pub use templates::{ReplacementMode, TemplateTypeReplacer};
pub use types::{
    FunctionData, FunctionKind, NamedState, NativeType, ObjectClass, ObjectFlags, Param, Property, PropertyKey,
    ScopeId, TemplateTypeMap, TernaryValue, TypeData, TypeId, TypeKind,
};
pub use window::DefinitionWindow;

// Test modules: most are loaded by their source files via #[path = "tests/..."].
#[cfg(test)]
#[path = "../tests/scenario_tests.rs"]
mod scenario_tests;
#[cfg(test)]
#[path = "../tests/cycle_guard_tests.rs"]
mod cycle_guard_tests;
#[cfg(test)]
#[path = "../tests/lattice_law_tests.rs"]
mod lattice_law_tests;
#[cfg(test)]
#[path = "../tests/resolution_tests.rs"]
mod resolution_tests;
