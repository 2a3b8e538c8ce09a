//! Tracing subscriber setup for embedders of the type lattice.
//!
//! Output format is chosen with `JST_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented span hierarchy via `tracing-tree`, handy when following
//!   one resolution pass or a deep subtype query
//! - `json`: one JSON object per event
//!
//! ```bash
//! JST_LOG=debug JST_LOG_FORMAT=tree my-analyzer input.js
//! JST_LOG="jst_types::named=trace,jst_types::lattice=debug" my-analyzer input.js
//! ```
//!
//! Nothing is installed unless `JST_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Parse a `JST_LOG_FORMAT` value. Unrecognized values fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        std::env::var("JST_LOG_FORMAT")
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

/// The filter directives from `JST_LOG`, falling back to `RUST_LOG`.
fn filter_directives() -> Option<String> {
    std::env::var("JST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
}

/// Install the global subscriber, writing to stderr.
///
/// Returns `false` when neither `JST_LOG` nor `RUST_LOG` is set, or when a
/// global subscriber was already installed.
pub fn init_tracing() -> bool {
    let Some(directives) = filter_directives() else {
        return false;
    };
    let filter = EnvFilter::builder().parse_lossy(directives);

    let installed = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::new(2)
                .with_writer(std::io::stderr)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish()
            .try_init(),
    };
    installed.is_ok()
}
