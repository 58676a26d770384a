//! Expression AST nodes.
//!
//! Every FOOL program computes a value, so everything below a declaration
//! is an expression:
//! - Literals (integers, booleans, `null`)
//! - Binary operations (arithmetic, comparison, logical) and `!`
//! - Identifier references
//! - Function calls, method calls and object construction
//! - `if`-`then`-`else` and `print`

use fool_core::Span;

use crate::{BinaryOp, Ident, NodeId};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(LiteralExpr),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Logical negation
    Not(&'ast NotExpr<'ast>),
    /// Identifier reference
    Ident(&'ast IdentExpr<'ast>),
    /// Function call `f(args)`
    Call(&'ast CallExpr<'ast>),
    /// Method call `obj.m(args)`
    MethodCall(&'ast MethodCallExpr<'ast>),
    /// Object construction `new C(args)`
    New(&'ast NewExpr<'ast>),
    /// Conditional
    If(&'ast IfExpr<'ast>),
    /// `print(e)`
    Print(&'ast PrintExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Not(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Call(e) => e.span,
            Self::MethodCall(e) => e.span,
            Self::New(e) => e.span,
            Self::If(e) => e.span,
            Self::Print(e) => e.span,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr {
    /// The literal kind
    pub kind: LiteralKind,
    /// Source location
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// Integer literal
    Int(i32),
    /// Boolean literal
    Bool(bool),
    /// `null`
    Null,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    /// Left operand
    pub left: &'ast Expr<'ast>,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// `!operand`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotExpr<'ast> {
    pub operand: &'ast Expr<'ast>,
    pub span: Span,
}

/// A name used as a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentExpr<'ast> {
    pub id: NodeId,
    pub ident: Ident<'ast>,
    pub span: Span,
}

/// A call of a function (or, inside a class, of a sibling method).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub id: NodeId,
    /// The called name
    pub callee: Ident<'ast>,
    /// Arguments in source order
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

/// A call of a method on an object held by a variable, parameter or field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodCallExpr<'ast> {
    pub id: NodeId,
    /// The receiver
    pub object: Ident<'ast>,
    /// The method name
    pub method: Ident<'ast>,
    /// Arguments in source order
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `new C(args)`: one argument per field, in slot order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewExpr<'ast> {
    pub id: NodeId,
    pub class: Ident<'ast>,
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `if cond then { then_expr } else { else_expr }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfExpr<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_expr: &'ast Expr<'ast>,
    pub else_expr: &'ast Expr<'ast>,
    pub span: Span,
}

/// `print(expr)`: prints and yields the value of `expr`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintExpr<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}
