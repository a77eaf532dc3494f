//! Diagnostic collection for a compilation unit.
//!
//! Checks never stop at the first problem. Each one appends to a single
//! ordered [`Diagnostics`] sink that is passed explicitly through the walk, and
//! no stage clears what an earlier stage reported.
//!
//! # Example
//!
//! ```
//! use jmm_core::{Diagnostics, Span, Stage};
//!
//! let mut diagnostics = Diagnostics::new();
//! diagnostics.error(Stage::Semantic, Span::new(4, 9), "Variable not defined: x");
//!
//! assert!(diagnostics.has_errors());
//! assert_eq!(diagnostics.to_string(), "4:9: error: Variable not defined: x\n");
//! ```

use std::fmt;

use crate::Span;

/// The pipeline stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Stage {
    /// Symbol table and semantic checks.
    Semantic,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Semantic => write!(f, "semantic"),
        }
    }
}

/// Severity of a diagnostic.
///
/// Every semantic rule violation is an error; this backend emits no warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Severity {
    /// The unit must not proceed to code generation.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Stage that reported it.
    pub stage: Stage,
    /// Severity level.
    pub severity: Severity,
    /// Position of the offending node.
    pub span: Span,
    /// Message text.
    pub message: String,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(stage: Stage, span: Span, message: impl Into<String>) -> Self {
        Self {
            stage,
            severity: Severity::Error,
            span,
            message: message.into(),
        }
    }

    /// Line of the offending node (1-based).
    pub fn line(&self) -> u32 {
        self.span.line
    }

    /// Column of the offending node (1-based).
    pub fn column(&self) -> u32 {
        self.span.col
    }

    /// Whether this diagnostic blocks code generation.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.span.line, self.span.col, self.severity, self.message
        )
    }
}

/// An ordered collection of diagnostics for one compilation unit.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates a new, empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Append an error diagnostic.
    pub fn error(&mut self, stage: Stage, span: Span, message: impl Into<String>) {
        self.push(Diagnostic::error(stage, span, message));
    }

    /// Append every diagnostic from another collection, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Returns `true` if the collection contains any error diagnostics.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Returns `true` if no diagnostic was recorded.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Iterate over all diagnostics in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Iterate over error diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Total number of diagnostics.
    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Message texts in report order.
    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    /// Number of diagnostics whose message starts with `prefix`.
    pub fn count_starting_with(&self, prefix: &str) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.message.starts_with(prefix))
            .count()
    }

    /// Consume the collection, returning the diagnostics.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
