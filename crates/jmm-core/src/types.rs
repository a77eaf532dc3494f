//! Type - the value types of the language.
//!
//! A [`Type`] is one of three shapes over a type name:
//!
//! ```text
//! int        -> Type::Scalar("int")
//! int[]      -> Type::Array("int")
//! int...     -> Type::Varargs("int")
//! Foo        -> Type::Scalar("Foo")
//! ```
//!
//! Type names are `int`, `boolean`, `String`, `void` (return types only) or a
//! declared/imported class name. Equality is structural: both the shape and
//! the name must match.

use std::fmt::{self, Display, Formatter};

/// Well-known type names.
pub mod names {
    /// 32-bit integer.
    pub const INT: &str = "int";
    /// Boolean.
    pub const BOOLEAN: &str = "boolean";
    /// String.
    pub const STRING: &str = "String";
    /// The return type of methods with no value.
    pub const VOID: &str = "void";
}

/// A value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A single value: `int`, `boolean`, `Foo`.
    Scalar(String),
    /// An array of the named element type: `int[]`.
    Array(String),
    /// A variadic parameter, collapsing trailing arguments into an array: `int...`.
    Varargs(String),
}

impl Type {
    /// `int`
    pub fn int() -> Self {
        Type::Scalar(names::INT.to_string())
    }

    /// `boolean`
    pub fn boolean() -> Self {
        Type::Scalar(names::BOOLEAN.to_string())
    }

    /// `void`
    pub fn void() -> Self {
        Type::Scalar(names::VOID.to_string())
    }

    /// `int[]`
    pub fn int_array() -> Self {
        Type::Array(names::INT.to_string())
    }

    /// `int...`
    ///
    /// Variadic types are always int-element in this language.
    pub fn int_varargs() -> Self {
        Type::Varargs(names::INT.to_string())
    }

    /// A scalar of the given class (or primitive) name.
    pub fn class(name: impl Into<String>) -> Self {
        Type::Scalar(name.into())
    }

    /// Build a type from the parser's `value`/`isArray`/`isVarargs` attributes.
    ///
    /// A variadic declaration becomes `Varargs(int)` whatever its nominal name.
    pub fn from_parts(name: &str, is_array: bool, is_varargs: bool) -> Self {
        if is_varargs {
            Type::int_varargs()
        } else if is_array {
            Type::Array(name.to_string())
        } else {
            Type::Scalar(name.to_string())
        }
    }

    /// The type name, without array or varargs decoration.
    pub fn name(&self) -> &str {
        match self {
            Type::Scalar(name) | Type::Array(name) | Type::Varargs(name) => name,
        }
    }

    /// Whether values of this type are arrays (`Array` and `Varargs`).
    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_) | Type::Varargs(_))
    }

    /// Whether this is a variadic type.
    pub fn is_varargs(&self) -> bool {
        matches!(self, Type::Varargs(_))
    }

    /// Whether this is the scalar `int`.
    pub fn is_int(&self) -> bool {
        matches!(self, Type::Scalar(name) if name == names::INT)
    }

    /// Whether this is the scalar `boolean`.
    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Scalar(name) if name == names::BOOLEAN)
    }

    /// Whether this is `void`.
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Scalar(name) if name == names::VOID)
    }

    /// Whether the name is one of the built-in primitive names.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self.name(),
            names::INT | names::BOOLEAN | names::STRING | names::VOID
        )
    }

    /// The element type of an array or varargs type.
    pub fn element(&self) -> Option<Type> {
        match self {
            Type::Scalar(_) => None,
            Type::Array(name) | Type::Varargs(name) => Some(Type::Scalar(name.clone())),
        }
    }

    /// Whether a value of this type binds to a destination of type `dest`
    /// when name and array-ness must both match.
    ///
    /// `Varargs(T)` and `Array(T)` are interchangeable here; scalar versus
    /// array of the same name never is.
    pub fn matches_shape(&self, dest: &Type) -> bool {
        self.name() == dest.name() && self.is_array() == dest.is_array()
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::Scalar(name) => write!(f, "{}", name),
            Type::Array(name) => write!(f, "{}[]", name),
            Type::Varargs(name) => write!(f, "{}...", name),
        }
    }
}

/// Whether a value of `source` type can be assigned to `destination`.
///
/// Only the names are compared; callers that need matching array-ness use
/// [`Type::matches_shape`].
pub fn are_types_assignable(source: &Type, destination: &Type) -> bool {
    source.name() == destination.name()
}
