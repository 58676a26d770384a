//! Declaration AST nodes and program roots.

use fool_core::Span;

use crate::{Expr, Ident, NodeId, TypeExpr};

/// A program: the root handed to the compiler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Program<'ast> {
    /// `let <classes> <declarations> in <expr>`
    LetIn(&'ast LetInProgram<'ast>),
    /// A bare expression.
    Expr(&'ast Expr<'ast>),
}

impl Program<'_> {
    pub fn span(&self) -> Span {
        match self {
            Program::LetIn(p) => p.span,
            Program::Expr(e) => e.span(),
        }
    }
}

/// A program with top-level classes and declarations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetInProgram<'ast> {
    /// Classes, in source order
    pub classes: &'ast [ClassDecl<'ast>],
    /// Functions and variables, in source order
    pub decls: &'ast [Decl<'ast>],
    /// The program's result expression
    pub body: &'ast Expr<'ast>,
    pub span: Span,
}

/// A declaration inside a `let` block or a function body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decl<'ast> {
    Fun(&'ast FunDecl<'ast>),
    Var(&'ast VarDecl<'ast>),
}

impl Decl<'_> {
    pub fn span(&self) -> Span {
        match self {
            Decl::Fun(f) => f.span,
            Decl::Var(v) => v.span,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Decl::Fun(f) => f.name.name,
            Decl::Var(v) => v.name.name,
        }
    }
}

/// A function declaration; also the shape of a method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunDecl<'ast> {
    pub id: NodeId,
    pub name: Ident<'ast>,
    pub ret: TypeExpr<'ast>,
    pub params: &'ast [ParamDecl<'ast>],
    /// Local declarations, evaluated in order on entry
    pub decls: &'ast [Decl<'ast>],
    pub body: &'ast Expr<'ast>,
    pub span: Span,
}

/// A method declaration.
pub type MethodDecl<'ast> = FunDecl<'ast>;

/// `var name: ty = init`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDecl<'ast> {
    pub id: NodeId,
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    pub init: &'ast Expr<'ast>,
    pub span: Span,
}

/// A function or method parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDecl<'ast> {
    pub id: NodeId,
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    pub span: Span,
}

/// A class field (declared in the class header, initialized by `new`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl<'ast> {
    pub id: NodeId,
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    pub span: Span,
}

/// A class declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDecl<'ast> {
    pub id: NodeId,
    pub name: Ident<'ast>,
    /// `extends` clause
    pub superclass: Option<Ident<'ast>>,
    /// Own fields, in source order
    pub fields: &'ast [FieldDecl<'ast>],
    /// Own methods, in source order
    pub methods: &'ast [MethodDecl<'ast>],
    pub span: Span,
}
