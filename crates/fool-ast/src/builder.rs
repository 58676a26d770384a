//! Arena-backed AST construction.
//!
//! [`AstBuilder`] is the interface an external front end (or a test) uses to
//! produce a tree the compiler accepts. It allocates every node in a
//! [`Bump`] arena and stamps it with a fresh [`NodeId`] and the current
//! source line.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use fool_ast::{AstBuilder, BinaryOp};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//!
//! // print((2 + 3) * 4)
//! let sum = b.binary(b.int(2), BinaryOp::Add, b.int(3));
//! let program = b.expr_program(b.print(b.binary(sum, BinaryOp::Mul, b.int(4))));
//! assert_eq!(program.span().line, 1);
//! ```

use std::cell::Cell;

use bumpalo::Bump;
use fool_core::Span;

use crate::{
    ArrowTypeExpr, BinaryExpr, BinaryOp, CallExpr, ClassDecl, Decl, Expr, FieldDecl, FunDecl,
    Ident, IdentExpr, IfExpr, LetInProgram, LiteralExpr, LiteralKind, MethodCallExpr, MethodDecl,
    NewExpr, NodeId, NotExpr, ParamDecl, PrintExpr, Program, TypeExpr, VarDecl,
};

/// Builds AST nodes in an arena.
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    next_id: Cell<u32>,
    line: Cell<u32>,
}

impl<'ast> AstBuilder<'ast> {
    /// Create a builder allocating into `arena`, starting at line 1.
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            next_id: Cell::new(0),
            line: Cell::new(1),
        }
    }

    /// Set the source line stamped on subsequently built nodes.
    pub fn set_line(&self, line: u32) {
        self.line.set(line);
    }

    /// Current source line.
    pub fn current_line(&self) -> u32 {
        self.line.get()
    }

    /// Number of node ids handed out so far.
    pub fn node_count(&self) -> u32 {
        self.next_id.get()
    }

    fn span(&self) -> Span {
        Span::line(self.line.get())
    }

    fn fresh_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId::new(id)
    }

    fn ident(&self, name: &str) -> Ident<'ast> {
        Ident::new(self.arena.alloc_str(name), self.span())
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    pub fn int(&self, value: i32) -> Expr<'ast> {
        self.literal(LiteralKind::Int(value))
    }

    pub fn bool(&self, value: bool) -> Expr<'ast> {
        self.literal(LiteralKind::Bool(value))
    }

    pub fn null(&self) -> Expr<'ast> {
        self.literal(LiteralKind::Null)
    }

    fn literal(&self, kind: LiteralKind) -> Expr<'ast> {
        Expr::Literal(LiteralExpr {
            kind,
            span: self.span(),
        })
    }

    pub fn binary(&self, left: Expr<'ast>, op: BinaryOp, right: Expr<'ast>) -> Expr<'ast> {
        Expr::Binary(self.arena.alloc(BinaryExpr {
            left: self.arena.alloc(left),
            op,
            right: self.arena.alloc(right),
            span: self.span(),
        }))
    }

    pub fn not(&self, operand: Expr<'ast>) -> Expr<'ast> {
        Expr::Not(self.arena.alloc(NotExpr {
            operand: self.arena.alloc(operand),
            span: self.span(),
        }))
    }

    /// An identifier used as a value.
    pub fn id(&self, name: &str) -> Expr<'ast> {
        Expr::Ident(self.arena.alloc(IdentExpr {
            id: self.fresh_id(),
            ident: self.ident(name),
            span: self.span(),
        }))
    }

    pub fn call(&self, callee: &str, args: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::Call(self.arena.alloc(CallExpr {
            id: self.fresh_id(),
            callee: self.ident(callee),
            args: self.arena.alloc_slice_copy(args),
            span: self.span(),
        }))
    }

    pub fn method_call(&self, object: &str, method: &str, args: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::MethodCall(self.arena.alloc(MethodCallExpr {
            id: self.fresh_id(),
            object: self.ident(object),
            method: self.ident(method),
            args: self.arena.alloc_slice_copy(args),
            span: self.span(),
        }))
    }

    pub fn new_object(&self, class: &str, args: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::New(self.arena.alloc(NewExpr {
            id: self.fresh_id(),
            class: self.ident(class),
            args: self.arena.alloc_slice_copy(args),
            span: self.span(),
        }))
    }

    pub fn if_then_else(
        &self,
        condition: Expr<'ast>,
        then_expr: Expr<'ast>,
        else_expr: Expr<'ast>,
    ) -> Expr<'ast> {
        Expr::If(self.arena.alloc(IfExpr {
            condition: self.arena.alloc(condition),
            then_expr: self.arena.alloc(then_expr),
            else_expr: self.arena.alloc(else_expr),
            span: self.span(),
        }))
    }

    pub fn print(&self, expr: Expr<'ast>) -> Expr<'ast> {
        Expr::Print(self.arena.alloc(PrintExpr {
            expr: self.arena.alloc(expr),
            span: self.span(),
        }))
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    pub fn ref_type(&self, class: &str) -> TypeExpr<'ast> {
        TypeExpr::Ref(self.arena.alloc_str(class))
    }

    pub fn arrow_type(&self, params: &[TypeExpr<'ast>], ret: TypeExpr<'ast>) -> TypeExpr<'ast> {
        TypeExpr::Arrow(self.arena.alloc(ArrowTypeExpr {
            params: self.arena.alloc_slice_copy(params),
            ret,
        }))
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    pub fn param(&self, name: &str, ty: TypeExpr<'ast>) -> ParamDecl<'ast> {
        ParamDecl {
            id: self.fresh_id(),
            name: self.ident(name),
            ty,
            span: self.span(),
        }
    }

    pub fn field(&self, name: &str, ty: TypeExpr<'ast>) -> FieldDecl<'ast> {
        FieldDecl {
            id: self.fresh_id(),
            name: self.ident(name),
            ty,
            span: self.span(),
        }
    }

    pub fn var(&self, name: &str, ty: TypeExpr<'ast>, init: Expr<'ast>) -> Decl<'ast> {
        Decl::Var(self.arena.alloc(VarDecl {
            id: self.fresh_id(),
            name: self.ident(name),
            ty,
            init: self.arena.alloc(init),
            span: self.span(),
        }))
    }

    pub fn fun(
        &self,
        name: &str,
        ret: TypeExpr<'ast>,
        params: &[ParamDecl<'ast>],
        decls: &[Decl<'ast>],
        body: Expr<'ast>,
    ) -> Decl<'ast> {
        Decl::Fun(self.arena.alloc(self.function(name, ret, params, decls, body)))
    }

    pub fn method(
        &self,
        name: &str,
        ret: TypeExpr<'ast>,
        params: &[ParamDecl<'ast>],
        decls: &[Decl<'ast>],
        body: Expr<'ast>,
    ) -> MethodDecl<'ast> {
        self.function(name, ret, params, decls, body)
    }

    fn function(
        &self,
        name: &str,
        ret: TypeExpr<'ast>,
        params: &[ParamDecl<'ast>],
        decls: &[Decl<'ast>],
        body: Expr<'ast>,
    ) -> FunDecl<'ast> {
        FunDecl {
            id: self.fresh_id(),
            name: self.ident(name),
            ret,
            params: self.arena.alloc_slice_copy(params),
            decls: self.arena.alloc_slice_copy(decls),
            body: self.arena.alloc(body),
            span: self.span(),
        }
    }

    pub fn class(
        &self,
        name: &str,
        superclass: Option<&str>,
        fields: &[FieldDecl<'ast>],
        methods: &[MethodDecl<'ast>],
    ) -> ClassDecl<'ast> {
        ClassDecl {
            id: self.fresh_id(),
            name: self.ident(name),
            superclass: superclass.map(|s| self.ident(s)),
            fields: self.arena.alloc_slice_copy(fields),
            methods: self.arena.alloc_slice_copy(methods),
            span: self.span(),
        }
    }

    // ==========================================================================
    // Programs
    // ==========================================================================

    pub fn let_in(
        &self,
        classes: &[ClassDecl<'ast>],
        decls: &[Decl<'ast>],
        body: Expr<'ast>,
    ) -> Program<'ast> {
        Program::LetIn(self.arena.alloc(LetInProgram {
            classes: self.arena.alloc_slice_copy(classes),
            decls: self.arena.alloc_slice_copy(decls),
            body: self.arena.alloc(body),
            span: self.span(),
        }))
    }

    pub fn expr_program(&self, body: Expr<'ast>) -> Program<'ast> {
        Program::Expr(self.arena.alloc(body))
    }
}
