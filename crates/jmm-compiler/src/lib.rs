//! Java-- compiler backend
//!
//! Semantic analysis and code generation for one compilation unit.
//!
//! ## Architecture
//!
//! ```text
//! Ast ─► SymbolTable ─► Analyzer ─► Diagnostics
//!                  └──► OllirGenerator ─► IR text ─► IrGraphBuilder ─► ClassUnit
//!                                                                        │
//!                                               JasminGenerator ◄────────┘
//! ```
//!
//! ## Modules
//!
//! - [`symbol_table`]: per-class declarations
//! - [`types`]: expression typing and name binding
//! - [`analysis`]: the semantic checks
//! - [`ollir`]: lowering to three-address IR text
//! - [`ir`]: the structured IR graph and the builder seam
//! - [`jasmin`]: bytecode assembly emission
//! - [`operators`]: operator parsing

pub mod analysis;
pub mod ir;
pub mod jasmin;
pub mod ollir;
pub mod operators;
pub mod symbol_table;
pub mod types;

pub use analysis::Analyzer;
pub use ir::{ClassUnit, IrGraphBuilder, IrType};
pub use jasmin::{JasminGenerator, JasminOptions, StackLimit, push_constant};
pub use ollir::{OllirGenerator, ollir_type};
pub use symbol_table::{MethodSignature, SymbolTable};
pub use types::{Binding, ExprTyper};
