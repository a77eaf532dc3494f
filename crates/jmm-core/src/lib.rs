//! Core types shared by every stage of the backend.
//!
//! - [`Span`]: source positions recorded by the parser
//! - [`Type`]: the scalar/array/varargs type model
//! - [`Symbol`]: a named, typed declaration
//! - [`Diagnostics`]: the ordered diagnostic sink for one compilation unit
//! - [`JmmError`]: fatal, internal and builder errors

pub mod diagnostics;
pub mod error;
pub mod span;
pub mod symbol;
pub mod types;

pub use diagnostics::{Diagnostic, Diagnostics, Severity, Stage};
pub use error::{BuildError, FatalError, InternalError, JmmError, Result};
pub use span::Span;
pub use symbol::{Symbol, find_symbol};
pub use types::{Type, are_types_assignable, names};
