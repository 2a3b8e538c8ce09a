//! Subtype rules, one module per kind family.
//!
//! Each module adds `check_*` methods to [`SubtypeChecker`](crate::SubtypeChecker):
//! - `intrinsics`: primitives, enum elements and the object bottom
//! - `unions`: union sources and targets
//! - `objects`: nominal walks and structural (record, `@record`) matching
//! - `functions`: signature subtyping
//! - `templates`: templatized types

mod functions;
mod intrinsics;
mod objects;
mod templates;
mod unions;
