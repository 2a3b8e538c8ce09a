//! Options that influence lattice construction.

use jst_common::limits::{MAX_SUBTYPE_DEPTH, MAX_SUBTYPE_ITERATIONS, MAX_UNION_SIZE};
use serde::{Deserialize, Serialize};

/// Registry-wide knobs, fixed at construction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LatticeOptions {
    /// Unions wider than this are widened to unknown.
    pub max_union_size: usize,
    /// Whether union construction drops members that are subtypes of other
    /// members. When `false` only exact duplicates are removed.
    pub subsume_union_members: bool,
    /// Depth limit for one top-level subtype query.
    pub max_subtype_depth: u32,
    /// Comparison budget for one top-level subtype query.
    pub max_subtype_iterations: u32,
}

impl Default for LatticeOptions {
    fn default() -> Self {
        Self {
            max_union_size: MAX_UNION_SIZE,
            subsume_union_members: true,
            max_subtype_depth: MAX_SUBTYPE_DEPTH,
            max_subtype_iterations: MAX_SUBTYPE_ITERATIONS,
        }
    }
}

impl LatticeOptions {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_max_union_size(mut self, size: usize) -> Self {
        self.max_union_size = size;
        self
    }

    pub fn with_union_subsumption(mut self, subsume: bool) -> Self {
        self.subsume_union_members = subsume;
        self
    }

    pub fn with_subtype_limits(mut self, max_depth: u32, max_iterations: u32) -> Self {
        self.max_subtype_depth = max_depth;
        self.max_subtype_iterations = max_iterations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_fills_defaults() {
        let options = LatticeOptions::from_json(r#"{ "max_union_size": 4 }"#)
            .expect("valid options json");
        assert_eq!(options.max_union_size, 4);
        assert!(options.subsume_union_members);
        assert_eq!(options.max_subtype_depth, MAX_SUBTYPE_DEPTH);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(LatticeOptions::from_json("{ max_union_size: }").is_err());
    }

    #[test]
    fn test_builder_setters() {
        let options = LatticeOptions::default()
            .with_union_subsumption(false)
            .with_subtype_limits(8, 64);
        assert!(!options.subsume_union_members);
        assert_eq!(options.max_subtype_depth, 8);
        assert_eq!(options.max_subtype_iterations, 64);
    }
}
