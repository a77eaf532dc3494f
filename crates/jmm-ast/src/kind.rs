//! Node kinds.
//!
//! The parser tags every node with one of these kinds. The set is closed, so
//! every consumer matches on it exhaustively.

use std::fmt;

/// The kind tag of an AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // =========================================================================
    // Declarations
    // =========================================================================
    /// Root: imports followed by exactly one class declaration (last).
    Program,
    /// `import a.b.C;` - attribute `value` holds the qualified name.
    ImportDecl,
    /// `class Name [extends Super]` - attributes `name`, optional `superName`.
    ClassDecl,
    /// Field or local declaration - attribute `name`; child: `Type`.
    VarDecl,
    /// Type reference - attributes `value`, `isArray`, `isVarargs`.
    Type,
    /// Method - attributes `name`, `isPublic`, `isStatic`;
    /// children: return `Type`, `Param`*, `VarDecl`*, statements.
    MethodDecl,
    /// Method parameter - attribute `name`; child: `Type`.
    Param,

    // =========================================================================
    // Statements
    // =========================================================================
    /// `name = expr;`
    AssignStmt,
    /// `name[index] = expr;` - children: index, value.
    ArrayAssignStmt,
    /// `expr;`
    ExprStmt,
    /// `return [expr];`
    ReturnStmt,
    /// `if (cond) then else otherwise` - children: condition, then, else.
    IfElseStmt,
    /// `while (cond) body` - children: condition, body.
    WhileStmt,
    /// `{ stmts }`
    BlockStmt,

    // =========================================================================
    // Expressions
    // =========================================================================
    /// Integer literal - attribute `value`.
    IntegerLiteral,
    /// `true` / `false` - attribute `value`.
    BooleanLiteral,
    /// Name reference - attribute `name`.
    Identifier,
    /// `this`
    This,
    /// Arithmetic `+ - * /` - attribute `op`; children: left, right.
    BinaryExpr,
    /// Boolean-producing `&& || < > <= >=` - attribute `op`; children: left, right.
    BinaryBoolExpr,
    /// `receiver.name(args)` - attribute `name`; children: receiver, args.
    MethodCall,
    /// `array[index]` - children: array, index.
    ArrayAccess,
    /// `[e1, e2, ...]`
    ArrayLiteral,
    /// `new Name()` - attribute `name`.
    NewObject,
    /// `new int[size]` - child: size.
    NewArray,
    /// `array.length` - child: array.
    ArrayLength,
}

impl NodeKind {
    /// The kind name as the parser spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::ImportDecl => "ImportDecl",
            NodeKind::ClassDecl => "ClassDecl",
            NodeKind::VarDecl => "VarDecl",
            NodeKind::Type => "Type",
            NodeKind::MethodDecl => "MethodDecl",
            NodeKind::Param => "Param",
            NodeKind::AssignStmt => "AssignStmt",
            NodeKind::ArrayAssignStmt => "ArrayAssignStmt",
            NodeKind::ExprStmt => "ExprStmt",
            NodeKind::ReturnStmt => "ReturnStmt",
            NodeKind::IfElseStmt => "IfElseStmt",
            NodeKind::WhileStmt => "WhileStmt",
            NodeKind::BlockStmt => "BlockStmt",
            NodeKind::IntegerLiteral => "IntegerLiteral",
            NodeKind::BooleanLiteral => "BooleanLiteral",
            NodeKind::Identifier => "Identifier",
            NodeKind::This => "This",
            NodeKind::BinaryExpr => "BinaryExpr",
            NodeKind::BinaryBoolExpr => "BinaryBoolExpr",
            NodeKind::MethodCall => "MethodCall",
            NodeKind::ArrayAccess => "ArrayAccess",
            NodeKind::ArrayLiteral => "ArrayLiteral",
            NodeKind::NewObject => "NewObject",
            NodeKind::NewArray => "NewArray",
            NodeKind::ArrayLength => "ArrayLength",
        }
    }

    /// Whether nodes of this kind produce a value.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::IntegerLiteral
                | NodeKind::BooleanLiteral
                | NodeKind::Identifier
                | NodeKind::This
                | NodeKind::BinaryExpr
                | NodeKind::BinaryBoolExpr
                | NodeKind::MethodCall
                | NodeKind::ArrayAccess
                | NodeKind::ArrayLiteral
                | NodeKind::NewObject
                | NodeKind::NewArray
                | NodeKind::ArrayLength
        )
    }

    /// Whether nodes of this kind are statements in a method body.
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::AssignStmt
                | NodeKind::ArrayAssignStmt
                | NodeKind::ExprStmt
                | NodeKind::ReturnStmt
                | NodeKind::IfElseStmt
                | NodeKind::WhileStmt
                | NodeKind::BlockStmt
        )
    }

    /// Whether this is an integer or boolean literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, NodeKind::IntegerLiteral | NodeKind::BooleanLiteral)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_and_statement_sets_are_disjoint() {
        let all = [
            NodeKind::Program,
            NodeKind::ImportDecl,
            NodeKind::ClassDecl,
            NodeKind::VarDecl,
            NodeKind::Type,
            NodeKind::MethodDecl,
            NodeKind::Param,
            NodeKind::AssignStmt,
            NodeKind::ArrayAssignStmt,
            NodeKind::ExprStmt,
            NodeKind::ReturnStmt,
            NodeKind::IfElseStmt,
            NodeKind::WhileStmt,
            NodeKind::BlockStmt,
            NodeKind::IntegerLiteral,
            NodeKind::BooleanLiteral,
            NodeKind::Identifier,
            NodeKind::This,
            NodeKind::BinaryExpr,
            NodeKind::BinaryBoolExpr,
            NodeKind::MethodCall,
            NodeKind::ArrayAccess,
            NodeKind::ArrayLiteral,
            NodeKind::NewObject,
            NodeKind::NewArray,
            NodeKind::ArrayLength,
        ];
        for kind in all {
            assert!(!(kind.is_expression() && kind.is_statement()), "{kind}");
        }
    }

    #[test]
    fn display_uses_parser_spelling() {
        assert_eq!(NodeKind::MethodCall.to_string(), "MethodCall");
        assert_eq!(NodeKind::IfElseStmt.as_str(), "IfElseStmt");
    }

    #[test]
    fn literals() {
        assert!(NodeKind::IntegerLiteral.is_literal());
        assert!(NodeKind::BooleanLiteral.is_literal());
        assert!(!NodeKind::Identifier.is_literal());
    }
}
