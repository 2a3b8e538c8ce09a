//! Static type lattice for a dynamically-typed scripting language.
//!
//! This facade re-exports the workspace crates:
//!
//! - [`common`] (`jst-common`): interning, source locations, diagnostics and
//!   shared limits
//! - [`types`] (`jst-types`): the type registry, subtyping, join and meet,
//!   equality, the property model, templates and named-type resolution
//!
//! and hosts the optional tracing subscriber setup in [`tracing_config`].
//!
//! ```ignore
//! use jst::{TypeId, TypeRegistry};
//!
//! jst::tracing_config::init_tracing();
//! let mut registry = TypeRegistry::new();
//! let union = registry.create_union_type([TypeId::STRING, TypeId::NUMBER]);
//! assert!(registry.is_subtype_of(union, TypeId::ALL));
//! assert_eq!(registry.display(union), "(number|string)");
//! ```

pub mod tracing_config;

pub use jst_common as common;
pub use jst_types as types;

pub use jst_common::{Diagnostic, DiagnosticCollector, ErrorReporter, SourceLocation};
pub use jst_types::{
    FunctionBuilder, LatticeOptions, NativeType, SubtypeResult, TemplateTypeMap, TernaryValue, TypeId,
    TypeRegistry,
};
