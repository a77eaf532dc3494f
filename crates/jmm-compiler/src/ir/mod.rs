//! Structured IR graph.
//!
//! The emitted IR text is turned into this model by an external
//! [`IrGraphBuilder`], which also assigns every named operand a virtual
//! register. The bytecode emitter only ever reads it.
//!
//! ```text
//! ClassUnit
//! ├── imports, fields
//! └── Method*
//!     ├── params, return type, access/flags
//!     ├── instructions: Vec<Instruction>
//!     ├── labels:    label -> instruction index
//!     └── var_table: name  -> Descriptor { reg, ty }
//! ```

mod instruction;
mod method;

pub use instruction::{BinaryOpKind, CallInstruction, CallKind, Element, Instruction};
pub use method::{AccessModifier, ClassUnit, Descriptor, Field, Method, MethodFlags};

use jmm_core::BuildError;

/// Type of an IR value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrType {
    Int32,
    Boolean,
    String,
    Void,
    /// Array of the boxed element type.
    Array(Box<IrType>),
    /// Reference to an instance of the named class.
    Object(String),
    /// The named class itself, as the target of a static call.
    Class(String),
    /// The receiver of an instance method of the named class.
    This(String),
}

impl IrType {
    /// `int[]`
    pub fn int_array() -> Self {
        IrType::Array(Box::new(IrType::Int32))
    }

    /// Whether values of this type live in the int opcode family.
    pub fn is_int_like(&self) -> bool {
        matches!(self, IrType::Int32 | IrType::Boolean)
    }

    /// Whether values of this type are references.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            IrType::String | IrType::Array(_) | IrType::Object(_) | IrType::This(_)
        )
    }
}

/// Turns IR text into a checked [`ClassUnit`] with var tables.
///
/// Parsing the IR syntax is the collaborator's job; the pipeline only
/// hands over the text and consumes the graph.
pub trait IrGraphBuilder {
    /// Build the graph for one compilation unit.
    fn build(&self, ir: &str) -> Result<ClassUnit, BuildError>;
}

impl<F> IrGraphBuilder for F
where
    F: Fn(&str) -> Result<ClassUnit, BuildError>,
{
    fn build(&self, ir: &str) -> Result<ClassUnit, BuildError> {
        self(ir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_families() {
        assert!(IrType::Int32.is_int_like());
        assert!(IrType::Boolean.is_int_like());
        assert!(!IrType::Void.is_int_like());
        assert!(IrType::int_array().is_reference());
        assert!(IrType::This("A".into()).is_reference());
        assert!(!IrType::Class("io".into()).is_reference());
    }

    #[test]
    fn closures_are_builders() {
        let builder = |_: &str| -> Result<ClassUnit, BuildError> { Ok(ClassUnit::new("A")) };
        assert_eq!(builder.build("A {}").unwrap().name, "A");

        let failing = |ir: &str| -> Result<ClassUnit, BuildError> {
            Err(BuildError::new(format!("cannot parse {} bytes", ir.len())))
        };
        assert_eq!(failing.build("xy").unwrap_err().message, "cannot parse 2 bytes");
    }
}
