//! Binary operators.
//!
//! The parser hands operators over as the `op` attribute string. They are
//! parsed once into closed enums here; an operator outside the grammar is an
//! [`InternalError::UnknownOperator`].

use jmm_ast::Node;
use jmm_core::InternalError;

/// Operator of a `BinaryExpr`: int operands, int result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOp {
    /// Parse an operator string.
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }

    /// The operator of a `BinaryExpr` node.
    pub fn of(node: Node<'_>) -> Result<Self, InternalError> {
        let op = node.get("op").unwrap_or_default();
        Self::parse(op).ok_or_else(|| unknown(node, op))
    }

    /// Source spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// Operator of a `BinaryBoolExpr`: boolean result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BooleanOp {
    /// Parse an operator string.
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "&&" => Some(Self::And),
            "||" => Some(Self::Or),
            "<" => Some(Self::Lt),
            ">" => Some(Self::Gt),
            "<=" => Some(Self::Le),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }

    /// The operator of a `BinaryBoolExpr` node.
    pub fn of(node: Node<'_>) -> Result<Self, InternalError> {
        let op = node.get("op").unwrap_or_default();
        Self::parse(op).ok_or_else(|| unknown(node, op))
    }

    /// Source spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }

    /// `&&` and `||` take boolean operands; comparisons take ints.
    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

fn unknown(node: Node<'_>, op: &str) -> InternalError {
    InternalError::UnknownOperator {
        op: op.to_string(),
        kind: node.kind().to_string(),
        span: node.span(),
    }
}
