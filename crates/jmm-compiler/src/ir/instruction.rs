//! IR instructions and operands.

use std::fmt;

use super::IrType;

/// An instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// An integer or boolean constant.
    Literal { value: i32, ty: IrType },
    /// A named value: variable, parameter, temporary, `this` or a class name.
    Operand { name: String, ty: IrType },
    /// `name[index]`, typed by the element.
    ArrayElement {
        name: String,
        index: Box<Element>,
        ty: IrType,
    },
}

impl Element {
    pub fn literal(value: i32) -> Self {
        Element::Literal {
            value,
            ty: IrType::Int32,
        }
    }

    pub fn boolean(value: bool) -> Self {
        Element::Literal {
            value: i32::from(value),
            ty: IrType::Boolean,
        }
    }

    pub fn operand(name: impl Into<String>, ty: IrType) -> Self {
        Element::Operand {
            name: name.into(),
            ty,
        }
    }

    /// `this` in a method of `class`.
    pub fn this(class: impl Into<String>) -> Self {
        Element::Operand {
            name: "this".to_string(),
            ty: IrType::This(class.into()),
        }
    }

    /// `name[index]` of an `int[]`.
    pub fn int_element(name: impl Into<String>, index: Element) -> Self {
        Element::ArrayElement {
            name: name.into(),
            index: Box::new(index),
            ty: IrType::Int32,
        }
    }

    pub fn ty(&self) -> &IrType {
        match self {
            Element::Literal { ty, .. }
            | Element::Operand { ty, .. }
            | Element::ArrayElement { ty, .. } => ty,
        }
    }

    /// The variable name, if this is not a literal.
    pub fn name(&self) -> Option<&str> {
        match self {
            Element::Literal { .. } => None,
            Element::Operand { name, .. } | Element::ArrayElement { name, .. } => Some(name),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Literal { value, .. } => write!(f, "{value}"),
            Element::Operand { name, .. } => write!(f, "{name}"),
            Element::ArrayElement { name, index, .. } => write!(f, "{name}[{index}]"),
        }
    }
}

/// Binary operators of the IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOpKind {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinaryOpKind {
    /// Whether the operator compares two ints.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOpKind::Lt | BinaryOpKind::Gt | BinaryOpKind::Le | BinaryOpKind::Ge
        )
    }
}

/// Invocation kind of a [`CallInstruction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    InvokeStatic,
    InvokeSpecial,
    InvokeVirtual,
    /// Object or array allocation.
    New,
    ArrayLength,
}

/// A call-like instruction.
///
/// `caller` is the class operand for static calls and allocations, the
/// receiver for instance calls, and the array for `arraylength`. Allocating
/// an array passes the size as the only argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInstruction {
    pub kind: CallKind,
    pub caller: Element,
    pub method: Option<String>,
    pub args: Vec<Element>,
    pub return_type: IrType,
}

impl CallInstruction {
    /// `invokestatic(class, "method", args)`
    pub fn invoke_static(
        class: impl Into<String>,
        method: impl Into<String>,
        args: Vec<Element>,
        return_type: IrType,
    ) -> Self {
        let class = class.into();
        Self {
            kind: CallKind::InvokeStatic,
            caller: Element::operand(class.clone(), IrType::Class(class)),
            method: Some(method.into()),
            args,
            return_type,
        }
    }

    /// `invokevirtual(receiver, "method", args)`
    pub fn invoke_virtual(
        receiver: Element,
        method: impl Into<String>,
        args: Vec<Element>,
        return_type: IrType,
    ) -> Self {
        Self {
            kind: CallKind::InvokeVirtual,
            caller: receiver,
            method: Some(method.into()),
            args,
            return_type,
        }
    }

    /// `invokespecial(receiver, "<init>")`
    pub fn init(receiver: Element) -> Self {
        Self {
            kind: CallKind::InvokeSpecial,
            caller: receiver,
            method: Some("<init>".to_string()),
            args: Vec::new(),
            return_type: IrType::Void,
        }
    }

    /// `new(Class)`
    pub fn new_object(class: impl Into<String>) -> Self {
        let class = class.into();
        Self {
            kind: CallKind::New,
            caller: Element::operand(class.clone(), IrType::Object(class.clone())),
            method: None,
            args: Vec::new(),
            return_type: IrType::Object(class),
        }
    }

    /// `new(array, size)`
    pub fn new_int_array(size: Element) -> Self {
        Self {
            kind: CallKind::New,
            caller: Element::operand("array", IrType::int_array()),
            method: None,
            args: vec![size],
            return_type: IrType::int_array(),
        }
    }

    /// `arraylength(array)`
    pub fn array_length(array: Element) -> Self {
        Self {
            kind: CallKind::ArrayLength,
            caller: array,
            method: None,
            args: Vec::new(),
            return_type: IrType::Int32,
        }
    }
}

/// One IR instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `dest := rhs`
    Assign {
        dest: Element,
        rhs: Box<Instruction>,
    },
    /// A single operand used as a value.
    SingleOp(Element),
    BinaryOp {
        op: BinaryOpKind,
        left: Element,
        right: Element,
    },
    /// `ret.T operand`; `operand` is `None` for `void`.
    Return {
        ty: IrType,
        operand: Option<Element>,
    },
    Call(CallInstruction),
    PutField {
        object: Element,
        field: Element,
        value: Element,
    },
    GetField {
        object: Element,
        field: Element,
    },
    /// `if (condition) goto label`
    CondBranch {
        condition: Box<Instruction>,
        label: String,
    },
    Goto(String),
}

impl Instruction {
    pub fn assign(dest: Element, rhs: Instruction) -> Self {
        Instruction::Assign {
            dest,
            rhs: Box::new(rhs),
        }
    }

    pub fn binary(op: BinaryOpKind, left: Element, right: Element) -> Self {
        Instruction::BinaryOp { op, left, right }
    }

    pub fn branch(condition: Instruction, label: impl Into<String>) -> Self {
        Instruction::CondBranch {
            condition: Box::new(condition),
            label: label.into(),
        }
    }

    /// Short description used in fault messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Instruction::Assign { .. } => "assignment",
            Instruction::SingleOp(_) => "single operand",
            Instruction::BinaryOp { .. } => "binary operation",
            Instruction::Return { .. } => "return",
            Instruction::Call(_) => "call",
            Instruction::PutField { .. } => "putfield",
            Instruction::GetField { .. } => "getfield",
            Instruction::CondBranch { .. } => "conditional branch",
            Instruction::Goto(_) => "goto",
        }
    }
}

impl From<CallInstruction> for Instruction {
    fn from(call: CallInstruction) -> Self {
        Instruction::Call(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_accessors() {
        let xs = Element::int_element("xs", Element::operand("i", IrType::Int32));
        assert_eq!(xs.name(), Some("xs"));
        assert_eq!(xs.ty(), &IrType::Int32);
        assert_eq!(xs.to_string(), "xs[i]");
        assert_eq!(Element::boolean(true), Element::Literal { value: 1, ty: IrType::Boolean });
        assert_eq!(Element::literal(3).name(), None);
    }

    #[test]
    fn constructors_fill_callers() {
        let call = CallInstruction::invoke_static("io", "println", vec![], IrType::Void);
        assert_eq!(call.caller, Element::operand("io", IrType::Class("io".into())));

        let alloc = CallInstruction::new_int_array(Element::literal(4));
        assert_eq!(alloc.return_type, IrType::int_array());
        assert_eq!(alloc.args.len(), 1);
    }

    #[test]
    fn comparisons() {
        assert!(BinaryOpKind::Lt.is_comparison());
        assert!(BinaryOpKind::Ge.is_comparison());
        assert!(!BinaryOpKind::And.is_comparison());
        assert!(!BinaryOpKind::Add.is_comparison());
    }
}
