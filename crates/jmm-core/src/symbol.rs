//! Named, typed declarations.

use std::fmt;

use crate::Type;

/// A declared name with its type: a field, parameter or local variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// Declared name.
    pub name: String,
    /// Declared type.
    pub ty: Type,
}

impl Symbol {
    /// Create a new symbol.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// Find a symbol by name in a declaration list.
///
/// Returns the first match, mirroring declaration order.
pub fn find_symbol<'a>(symbols: &'a [Symbol], name: &str) -> Option<&'a Symbol> {
    symbols.iter().find(|s| s.name == name)
}
