//! Centralized limits and thresholds for the type lattice.
//!
//! Recursion limits for individual relation queries are expressed as
//! `RecursionProfile`s in `jst-types`; the raw numbers live here so that
//! configuration defaults and profiles agree.

// =============================================================================
// Relation limits
// =============================================================================

/// Maximum nesting depth of a single subtype query.
///
/// Structural comparison of self-referential interfaces can nest deeply
/// before the cycle guard sees a repeated pair. Past this depth the query
/// answers conservatively.
pub const MAX_SUBTYPE_DEPTH: u32 = 100;

/// Maximum number of pair comparisons performed by one top-level query.
pub const MAX_SUBTYPE_ITERATIONS: u32 = 100_000;

/// Maximum nesting depth when rewriting types during template replacement.
pub const MAX_REPLACEMENT_DEPTH: u32 = 50;

// =============================================================================
// Capacity limits
// =============================================================================

/// Unions wider than this are widened to the unknown type.
pub const MAX_UNION_SIZE: usize = 30;

/// Maximum number of links followed along an implicit-prototype chain.
///
/// Prototype chains are acyclic when built through the registry API; the
/// bound protects lookups against malformed chains.
pub const MAX_PROTOTYPE_CHAIN: usize = 256;

/// Maximum number of hops followed through chained named types.
pub const MAX_NAMED_TYPE_CHAIN: usize = 64;
