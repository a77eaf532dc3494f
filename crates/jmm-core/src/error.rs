//! Error types for the compiler backend.
//!
//! Semantic rule violations are not errors in this sense: they are collected
//! as [`Diagnostic`](crate::Diagnostic)s and the walk continues. The types here
//! cover the cases that stop the pipeline.
//!
//! ## Error Hierarchy
//!
//! ```text
//! JmmError (top-level wrapper)
//! ├── FatalError     - malformed AST structure, raised before analysis
//! ├── InternalError  - parser/backend contract violations
//! ├── BuildError     - failure reported by the external IR-graph builder
//! └── Rejected       - analysis produced error diagnostics
//! ```

use thiserror::Error;

use crate::Span;

// ============================================================================
// Fatal structural errors
// ============================================================================

/// The AST does not have the shape the backend requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    /// The root node has no children.
    #[error("empty program: the root node has no children")]
    EmptyProgram,

    /// The last top-level child is not a class declaration.
    #[error("expected a class declaration as the last top-level node, found {found}")]
    MissingClassDecl {
        /// Kind of the node found instead.
        found: String,
    },

    /// A node lacks an attribute the backend cannot do without.
    #[error("at {span}: {kind} node is missing attribute '{attribute}'")]
    MissingAttribute {
        /// Kind of the node.
        kind: String,
        /// Missing attribute key.
        attribute: &'static str,
        /// Where the node is.
        span: Span,
    },
}

// ============================================================================
// Internal faults
// ============================================================================

/// A node kind, operator or IR shape reached a component with no case for it.
///
/// These are never reported as diagnostics: they mean the parser and the
/// backend disagree about the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    /// A binary expression carries an operator the backend does not know.
    #[error("at {span}: unknown operator '{op}' in {kind}")]
    UnknownOperator {
        /// The operator text.
        op: String,
        /// Kind of the expression node.
        kind: String,
        /// Where the expression is.
        span: Span,
    },

    /// A non-expression node was handed to expression typing or lowering.
    #[error("at {span}: {kind} is not an expression")]
    NotAnExpression {
        /// Kind of the node.
        kind: String,
        /// Where the node is.
        span: Span,
    },

    /// A non-statement node was handed to statement lowering.
    #[error("at {span}: {kind} is not a statement")]
    NotAStatement {
        /// Kind of the node.
        kind: String,
        /// Where the node is.
        span: Span,
    },

    /// A node has no enclosing method where one is required.
    #[error("at {span}: {kind} is outside any method")]
    OutsideMethod {
        /// Kind of the node.
        kind: String,
        /// Where the node is.
        span: Span,
    },

    /// An IR operand has no virtual register in its method's var table.
    #[error("operand '{name}' has no register in method '{method}'")]
    UnresolvedRegister {
        /// Operand name.
        name: String,
        /// Method being emitted.
        method: String,
    },

    /// An IR instruction or operand shape the bytecode emitter cannot lower.
    #[error("cannot lower {what} in method '{method}'")]
    UnsupportedInstruction {
        /// Description of the offending IR.
        what: String,
        /// Method being emitted.
        method: String,
    },

    /// A method name with no symbol table entry.
    #[error("no symbol table entry for method '{name}'")]
    UnknownMethod {
        /// Method name.
        name: String,
    },
}

impl InternalError {
    /// Get the source location, when the fault came from an AST node.
    pub fn span(&self) -> Option<Span> {
        match self {
            InternalError::UnknownOperator { span, .. } => Some(*span),
            InternalError::NotAnExpression { span, .. } => Some(*span),
            InternalError::NotAStatement { span, .. } => Some(*span),
            InternalError::OutsideMethod { span, .. } => Some(*span),
            InternalError::UnresolvedRegister { .. } => None,
            InternalError::UnsupportedInstruction { .. } => None,
            InternalError::UnknownMethod { .. } => None,
        }
    }
}

// ============================================================================
// External builder
// ============================================================================

/// Failure reported by the external IR-graph builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("IR graph builder failed: {message}")]
pub struct BuildError {
    /// Builder-supplied description.
    pub message: String,
}

impl BuildError {
    /// Create a builder error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// The unified error type for a pipeline invocation.
///
/// Each phase-specific error converts with `?`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JmmError {
    /// Malformed AST.
    #[error(transparent)]
    Fatal(#[from] FatalError),

    /// Parser/backend contract violation.
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// External IR-graph builder failure.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Semantic analysis reported errors; no IR or bytecode was produced.
    #[error("compilation rejected with {errors} semantic error(s)")]
    Rejected {
        /// Number of error diagnostics.
        errors: usize,
    },
}

impl JmmError {
    /// Check if this is a fatal structural error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, JmmError::Fatal(_))
    }

    /// Check if this is an internal fault.
    pub fn is_internal(&self) -> bool {
        matches!(self, JmmError::Internal(_))
    }

    /// Check if the unit was rejected by analysis.
    pub fn is_rejected(&self) -> bool {
        matches!(self, JmmError::Rejected { .. })
    }
}

/// Result alias for the backend.
pub type Result<T> = std::result::Result<T, JmmError>;

// ============================================================================
// Tests
// ============================================================================
