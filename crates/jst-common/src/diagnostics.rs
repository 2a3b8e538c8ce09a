//! Diagnostics and the error-reporter collaborator.
//!
//! The lattice core never aborts on user-facing problems. Unresolvable
//! references and similar issues are packaged as a [`Diagnostic`] and handed
//! to an [`ErrorReporter`] owned by the surrounding compilation. Rendering is
//! the reporter's business.

use crate::position::SourceLocation;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

/// Stable codes for the diagnostics the core emits.
pub mod diagnostic_codes {
    /// A named type reference never resolved to a declaration.
    pub const UNRESOLVED_TYPE_REFERENCE: u32 = 1001;
    /// A chain of named types refers back to itself.
    pub const CYCLIC_TYPE_REFERENCE: u32 = 1002;
}

/// Message templates, keyed by the codes above. Use [`format_message`] to fill them.
pub mod diagnostic_messages {
    pub const UNRESOLVED_TYPE_REFERENCE: &str = "Bad type annotation. Unknown type {0}";
    pub const CYCLIC_TYPE_REFERENCE: &str = "Cycle detected in type reference {0}";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub location: SourceLocation,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(location: SourceLocation, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            location,
            message_text: message.into(),
        }
    }

    pub fn warning(location: SourceLocation, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            code,
            location,
            message_text: message.into(),
        }
    }
}

/// Replace `{0}`, `{1}`, ... placeholders in a message template.
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Sink for diagnostics produced by the lattice core.
pub trait ErrorReporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Reporter that keeps every diagnostic in memory, in report order.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category == DiagnosticCategory::Error)
    }

    pub fn count_with_code(&self, code: u32) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl ErrorReporter for DiagnosticCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Reporter that forwards diagnostics to `tracing` and drops them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.category {
            DiagnosticCategory::Error => tracing::error!(
                code = diagnostic.code,
                location = %diagnostic.location,
                "{}",
                diagnostic.message_text
            ),
            DiagnosticCategory::Warning => tracing::warn!(
                code = diagnostic.code,
                location = %diagnostic.location,
                "{}",
                diagnostic.message_text
            ),
            DiagnosticCategory::Message => tracing::info!(
                code = diagnostic.code,
                location = %diagnostic.location,
                "{}",
                diagnostic.message_text
            ),
        }
    }
}
