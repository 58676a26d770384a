//! Type Check Pass (Pass 2) - validate every declaration and expression.
//!
//! This pass walks the tree again, reading the bindings recorded by the
//! symbol table pass, and computes the type of every expression. A rule
//! violation raises a [`TypeError`] that propagates with `?` up to the
//! nearest boundary, where it is recorded and checking resumes:
//!
//! - each class of the program
//! - each member of a class (field override, method)
//! - each declaration in a declaration list
//! - the program body
//!
//! [`TypeError::Incomplete`] is raised when a node lacks the binding it
//! needs (the symbol table pass already reported why); it is dropped
//! silently at the same boundaries.

use fool_ast::{BinaryExpr, BinaryOp, ClassDecl, Decl, Expr, FunDecl, LiteralKind, NodeId, Program};
use fool_core::{ClassType, Span, Type, TypeError};
use tracing::{debug, trace};

use crate::context::CompilationContext;
use crate::passes::signature;
use crate::symbols::UseSite;
use crate::type_rels::TypeRels;

/// Output of the type check pass.
#[derive(Debug, Default)]
pub struct TypeCheckOutput {
    /// Type of the program body, if it checked.
    pub program_type: Option<Type>,
    /// Collected errors.
    pub errors: Vec<TypeError>,
}

/// Pass 2: type check the program.
pub struct TypeCheckPass<'a> {
    ctx: &'a CompilationContext,
    rels: TypeRels<'a>,
    errors: Vec<TypeError>,
}

impl<'a> TypeCheckPass<'a> {
    /// Create a new type check pass over the bindings in `ctx`.
    pub fn new(ctx: &'a CompilationContext) -> Self {
        Self {
            ctx,
            rels: ctx.type_rels(),
            errors: Vec::new(),
        }
    }

    /// Run the pass on a program.
    #[tracing::instrument(skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, program: &Program<'_>) -> TypeCheckOutput {
        let program_type = match program {
            Program::LetIn(program) => {
                for class in program.classes {
                    self.check_class(class);
                }
                self.check_decls(program.decls);
                let result = self.check_expr(program.body);
                self.catch(result)
            }
            Program::Expr(body) => {
                let result = self.check_expr(body);
                self.catch(result)
            }
        };

        debug!(
            program_type = ?program_type,
            errors = self.errors.len(),
            "type check complete"
        );

        TypeCheckOutput {
            program_type,
            errors: self.errors,
        }
    }

    /// Record the error of a boundary, if any, and keep going.
    fn catch<T>(&mut self, result: Result<T, TypeError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(TypeError::Incomplete) => {
                trace!("skipping incomplete node");
                None
            }
            Err(error) => {
                debug!(%error, "type error");
                self.errors.push(error);
                None
            }
        }
    }

    fn is_subtype(&self, a: &Type, b: &Type) -> bool {
        self.rels.is_subtype(a, b)
    }

    fn use_site(&self, node: NodeId) -> Result<&'a UseSite, TypeError> {
        let ctx: &'a CompilationContext = self.ctx;
        ctx.symbols().use_site(node).ok_or(TypeError::Incomplete)
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    fn check_decls(&mut self, decls: &[Decl<'_>]) {
        for decl in decls {
            let result = self.check_decl(decl);
            self.catch(result);
        }
    }

    fn check_decl(&mut self, decl: &Decl<'_>) -> Result<(), TypeError> {
        match decl {
            Decl::Var(var) => {
                let declared = var.ty.to_type();
                let actual = self.check_expr(var.init)?;
                if !self.is_subtype(&actual, &declared) {
                    return Err(TypeError::IncompatibleValue {
                        name: var.name.name.to_string(),
                        span: var.span,
                    });
                }
                Ok(())
            }
            Decl::Fun(fun) => self.check_function(fun),
        }
    }

    /// Check a function or method: its local declarations, then its body
    /// against the declared return type.
    fn check_function(&mut self, fun: &FunDecl<'_>) -> Result<(), TypeError> {
        self.check_decls(fun.decls);

        let body = self.check_expr(fun.body)?;
        if !self.is_subtype(&body, &fun.ret.to_type()) {
            return Err(TypeError::WrongReturnType {
                name: fun.name.name.to_string(),
                span: fun.span,
            });
        }
        Ok(())
    }

    fn check_class(&mut self, class: &ClassDecl<'_>) {
        let ctx: &'a CompilationContext = self.ctx;
        let Some(info) = ctx.symbols().class(class.id) else {
            return;
        };

        if let Some(parent) = info.parent_type() {
            for field in class.fields.iter().filter(|field| info.is_override(field.id)) {
                let result = self.check_field_override(class, parent, field.id, field.name.name);
                self.catch(result);
            }
            for method in class.methods {
                let result = self.check_method_override(class, parent, method);
                self.catch(result);
            }
        }

        for method in class.methods {
            let result = self.check_function(method);
            self.catch(result);
        }
    }

    fn check_field_override(
        &self,
        class: &ClassDecl<'_>,
        parent: &ClassType,
        field: NodeId,
        name: &str,
    ) -> Result<(), TypeError> {
        let entry = self.ctx.symbols().declaration(field).ok_or(TypeError::Incomplete)?;
        let inherited = ClassType::field_slot(entry.offset)
            .and_then(|slot| parent.fields.get(slot))
            .ok_or(TypeError::Incomplete)?;

        if !self.is_subtype(&entry.ty, inherited) {
            return Err(TypeError::InvalidFieldOverride {
                class: class.name.name.to_string(),
                field: name.to_string(),
                span: class.span,
            });
        }
        Ok(())
    }

    fn check_method_override(
        &self,
        class: &ClassDecl<'_>,
        parent: &ClassType,
        method: &FunDecl<'_>,
    ) -> Result<(), TypeError> {
        let entry = self.ctx.symbols().declaration(method.id).ok_or(TypeError::Incomplete)?;
        let Some(inherited) = usize::try_from(entry.offset)
            .ok()
            .and_then(|slot| parent.methods.get(slot))
        else {
            // A new dispatch slot: nothing to override.
            return Ok(());
        };

        let own = Type::Method(signature(method));
        let ancestor = Type::Method(inherited.clone());
        // Any two methods share a shape, so compare the signatures directly.
        if !self.rels.is_override_compatible(&own, &ancestor) {
            return Err(TypeError::InvalidMethodOverride {
                class: class.name.name.to_string(),
                method: method.name.name.to_string(),
                span: class.span,
            });
        }
        Ok(())
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    fn check_expr(&mut self, expr: &Expr<'_>) -> Result<Type, TypeError> {
        match expr {
            Expr::Literal(literal) => Ok(match literal.kind {
                LiteralKind::Int(_) => Type::Int,
                LiteralKind::Bool(_) => Type::Bool,
                LiteralKind::Null => Type::Empty,
            }),
            Expr::Binary(binary) => self.check_binary(binary),
            Expr::Not(not) => {
                let operand = self.check_expr(not.operand)?;
                if !self.is_subtype(&operand, &Type::Bool) {
                    return Err(TypeError::NonBooleanOperand {
                        op: "not",
                        span: not.span,
                    });
                }
                Ok(Type::Bool)
            }
            Expr::Ident(ident) => {
                let site = self.use_site(ident.id)?;
                if !site.entry.ty.is_value() {
                    return Err(TypeError::FunctionAsValue {
                        name: ident.ident.name.to_string(),
                        span: ident.span,
                    });
                }
                Ok(site.entry.ty.clone())
            }
            Expr::Call(call) => {
                let site = self.use_site(call.id)?;
                let Some(sig) = site.entry.ty.signature() else {
                    return Err(TypeError::NotAFunction {
                        name: call.callee.name.to_string(),
                        span: call.span,
                    });
                };
                self.check_args(call.callee.name, &sig.params, call.args, call.span)?;
                Ok(sig.ret.as_ref().clone())
            }
            Expr::MethodCall(call) => {
                let site = self.use_site(call.id)?;
                if !matches!(site.entry.ty, Type::Ref(_)) {
                    return Err(TypeError::NotAReference {
                        receiver: call.object.name.to_string(),
                        method: call.method.name.to_string(),
                        span: call.span,
                    });
                }
                let ctx: &'a CompilationContext = self.ctx;
                let method = ctx.symbols().method(call.id).ok_or(TypeError::Incomplete)?;
                let Type::Method(sig) = &method.ty else {
                    return Err(TypeError::NotAMethod {
                        name: call.method.name.to_string(),
                        span: call.span,
                    });
                };
                self.check_args(call.method.name, &sig.params, call.args, call.span)?;
                Ok(sig.ret.as_ref().clone())
            }
            Expr::New(new) => {
                let site = self.use_site(new.id)?;
                let Type::Class(layout) = &site.entry.ty else {
                    return Err(TypeError::NotAClass {
                        name: new.class.name.to_string(),
                        span: new.span,
                    });
                };
                self.check_args(new.class.name, &layout.fields, new.args, new.span)?;
                Ok(Type::reference(new.class.name))
            }
            Expr::If(if_expr) => {
                let condition = self.check_expr(if_expr.condition)?;
                if !self.is_subtype(&condition, &Type::Bool) {
                    return Err(TypeError::NonBooleanCondition { span: if_expr.span });
                }
                let then_ty = self.check_expr(if_expr.then_expr)?;
                let else_ty = self.check_expr(if_expr.else_expr)?;
                self.rels
                    .join(&then_ty, &else_ty)
                    .ok_or(TypeError::IncompatibleBranches { span: if_expr.span })
            }
            Expr::Print(print) => self.check_expr(print.expr),
        }
    }

    fn check_binary(&mut self, binary: &BinaryExpr<'_>) -> Result<Type, TypeError> {
        let op = binary.op;
        let left = self.check_expr(binary.left)?;
        let right = self.check_expr(binary.right)?;

        if op == BinaryOp::Equal {
            if !(self.is_subtype(&left, &right) || self.is_subtype(&right, &left)) {
                return Err(TypeError::IncompatibleEqual { span: binary.span });
            }
            return Ok(Type::Bool);
        }

        if op.is_logical() {
            if !(self.is_subtype(&left, &Type::Bool) && self.is_subtype(&right, &Type::Bool)) {
                return Err(TypeError::NonBooleanOperand {
                    op: op.describe(),
                    span: binary.span,
                });
            }
            return Ok(Type::Bool);
        }

        if !(self.is_subtype(&left, &Type::Int) && self.is_subtype(&right, &Type::Int)) {
            return Err(TypeError::NonIntegerOperand {
                op: op.describe(),
                span: binary.span,
            });
        }
        Ok(if op.is_relational() { Type::Bool } else { Type::Int })
    }

    /// Check arity, then each argument against its formal, left to right.
    fn check_args(
        &mut self,
        name: &str,
        formals: &[Type],
        args: &[Expr<'_>],
        span: Span,
    ) -> Result<(), TypeError> {
        if formals.len() != args.len() {
            return Err(TypeError::WrongArgumentCount {
                name: name.to_string(),
                expected: formals.len(),
                found: args.len(),
                span,
            });
        }
        for (index, (arg, formal)) in args.iter().zip(formals).enumerate() {
            let actual = self.check_expr(arg)?;
            if !self.is_subtype(&actual, formal) {
                return Err(TypeError::WrongArgumentType {
                    name: name.to_string(),
                    position: index + 1,
                    span,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::SymbolTablePass;
    use bumpalo::Bump;
    use fool_ast::{AstBuilder, TypeExpr};

    fn check(program: &Program<'_>) -> TypeCheckOutput {
        let mut ctx = CompilationContext::new();
        let symbols = SymbolTablePass::new(&mut ctx).run(program);
        assert!(symbols.errors.is_empty(), "{:?}", symbols.errors);
        TypeCheckPass::new(&ctx).run(program)
    }

    fn messages(output: &TypeCheckOutput) -> Vec<String> {
        output.errors.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn arithmetic_and_comparisons() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let sum = b.binary(b.int(2), BinaryOp::Add, b.bool(true));
        let cmp = b.binary(sum, BinaryOp::LessEqual, b.int(4));
        let program = b.expr_program(b.print(cmp));

        let output = check(&program);
        assert!(output.errors.is_empty());
        assert_eq!(output.program_type, Some(Type::Bool));
    }

    #[test]
    fn operand_errors() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let bad_and = b.binary(b.int(1), BinaryOp::And, b.bool(true));
        let program = b.expr_program(bad_and);
        assert_eq!(
            messages(&check(&program)),
            vec!["Type error: non boolean in and, line 1"]
        );

        let bad_mult = b.binary(b.bool(true), BinaryOp::Mul, b.null());
        let program = b.expr_program(bad_mult);
        assert_eq!(
            messages(&check(&program)),
            vec!["Type error: non integers in multiplication, line 1"]
        );

        let bad_not = b.not(b.int(3));
        let program = b.expr_program(bad_not);
        assert_eq!(
            messages(&check(&program)),
            vec!["Type error: non boolean in not, line 1"]
        );
    }

    #[test]
    fn equality_needs_related_operands() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let ok = b.binary(b.bool(true), BinaryOp::Equal, b.int(1));
        assert_eq!(check(&b.expr_program(ok)).program_type, Some(Type::Bool));

        let a = b.class("A", None, &[], &[]);
        let bad = b.binary(b.new_object("A", &[]), BinaryOp::Equal, b.int(1));
        let output = check(&b.let_in(&[a], &[], bad));
        assert_eq!(messages(&output), vec!["Type error: incompatible types in equal, line 1"]);
    }

    #[test]
    fn conditional_joins() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let mixed = b.if_then_else(b.bool(true), b.int(3), b.bool(true));
        assert_eq!(check(&b.expr_program(mixed)).program_type, Some(Type::Int));

        let a = b.class("A", None, &[], &[]);
        let class_b = b.class("B", Some("A"), &[], &[]);
        let o1 = b.var("o1", b.ref_type("B"), b.new_object("B", &[]));
        let o2 = b.var("o2", b.ref_type("A"), b.new_object("A", &[]));
        let body = b.if_then_else(b.bool(true), b.id("o1"), b.id("o2"));
        let output = check(&b.let_in(&[a, class_b], &[o1, o2], body));
        assert!(output.errors.is_empty());
        assert_eq!(output.program_type, Some(Type::reference("A")));
    }

    #[test]
    fn conditional_errors() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let bad_cond = b.if_then_else(b.int(1), b.int(2), b.int(3));
        assert_eq!(
            messages(&check(&b.expr_program(bad_cond))),
            vec!["Type error: non boolean condition in if, line 1"]
        );

        let a = b.class("A", None, &[], &[]);
        let unrelated = b.if_then_else(b.bool(false), b.new_object("A", &[]), b.int(1));
        assert_eq!(
            messages(&check(&b.let_in(&[a], &[], unrelated))),
            vec!["Type error: incompatible types in then-else branches, line 1"]
        );
    }

    #[test]
    fn call_argument_errors() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = b.fun(
            "f",
            TypeExpr::Int,
            &[b.param("x", TypeExpr::Int), b.param("y", TypeExpr::Bool)],
            &[],
            b.id("x"),
        );

        b.set_line(3);
        let arity = b.call("f", &[b.int(1)]);
        let output = check(&b.let_in(&[], &[f], arity));
        assert_eq!(
            messages(&output),
            vec!["Type error: wrong number of parameters in the invocation of 'f' (expected 2, found 1), line 3"]
        );

        let wrong = b.call("f", &[b.int(1), b.int(2)]);
        let output = check(&b.let_in(&[], &[f], wrong));
        assert!(matches!(
            output.errors[..],
            [TypeError::WrongArgumentType { position: 2, .. }]
        ));
    }

    #[test]
    fn identifier_usage_rules() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = b.fun("f", TypeExpr::Int, &[], &[], b.int(1));
        let output = check(&b.let_in(&[], &[f], b.id("f")));
        assert_eq!(
            messages(&output),
            vec!["Type error: wrong usage of function identifier 'f', line 1"]
        );

        let x = b.var("x", TypeExpr::Int, b.int(1));
        let output = check(&b.let_in(&[], &[x], b.call("x", &[])));
        assert!(matches!(output.errors[..], [TypeError::NotAFunction { .. }]));
    }

    #[test]
    fn declaration_errors_do_not_stop_siblings() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        b.set_line(1);
        let bad_var = b.var("x", TypeExpr::Bool, b.int(5));
        b.set_line(2);
        let bad_fun = b.fun("f", TypeExpr::Bool, &[], &[], b.int(1));
        b.set_line(3);
        let good = b.var("y", TypeExpr::Int, b.bool(true));
        let output = check(&b.let_in(&[], &[bad_var, bad_fun, good], b.id("y")));

        assert_eq!(
            messages(&output),
            vec![
                "Type error: incompatible value for variable 'x', line 1",
                "Type error: wrong return type for function 'f', line 2",
            ]
        );
        assert_eq!(output.program_type, Some(Type::Int));
    }

    #[test]
    fn new_checks_fields() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let point = b.class(
            "Point",
            None,
            &[b.field("x", TypeExpr::Int), b.field("y", TypeExpr::Int)],
            &[],
        );
        let ok = b.new_object("Point", &[b.int(1), b.bool(true)]);
        let output = check(&b.let_in(&[point], &[], ok));
        assert_eq!(output.program_type, Some(Type::reference("Point")));

        let short = b.new_object("Point", &[b.int(1)]);
        let output = check(&b.let_in(&[point], &[], short));
        assert!(matches!(
            output.errors[..],
            [TypeError::WrongArgumentCount { expected: 2, found: 1, .. }]
        ));
    }

    #[test]
    fn field_override_must_narrow() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let a = b.class("A", None, &[b.field("f", TypeExpr::Bool)], &[]);
        b.set_line(4);
        let bad = b.class("B", Some("A"), &[b.field("f", TypeExpr::Int)], &[]);
        let output = check(&b.let_in(&[a, bad], &[], b.int(0)));
        assert_eq!(
            messages(&output),
            vec!["Type error: invalid field override of 'B.f', line 4"]
        );

        let a = b.class("A", None, &[b.field("f", TypeExpr::Int)], &[]);
        let good = b.class("B", Some("A"), &[b.field("f", TypeExpr::Bool)], &[]);
        let output = check(&b.let_in(&[a, good], &[], b.int(0)));
        assert!(output.errors.is_empty());
    }

    #[test]
    fn method_override_rules() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let a = b.class("A", None, &[], &[b.method("m", TypeExpr::Int, &[], &[], b.int(1))]);
        let bad = b.class(
            "B",
            Some("A"),
            &[],
            &[b.method("m", TypeExpr::Int, &[b.param("x", TypeExpr::Int)], &[], b.int(1))],
        );
        let output = check(&b.let_in(&[a, bad], &[], b.int(0)));
        assert!(matches!(output.errors[..], [TypeError::InvalidMethodOverride { .. }]));

        let good = b.class(
            "B",
            Some("A"),
            &[],
            &[b.method("m", TypeExpr::Bool, &[], &[], b.bool(true))],
        );
        let output = check(&b.let_in(&[a, good], &[], b.int(0)));
        assert!(output.errors.is_empty());
    }

    #[test]
    fn method_calls() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let counter = b.class(
            "Counter",
            None,
            &[b.field("n", TypeExpr::Int)],
            &[b.method(
                "add",
                TypeExpr::Int,
                &[b.param("k", TypeExpr::Int)],
                &[],
                b.binary(b.id("n"), BinaryOp::Add, b.id("k")),
            )],
        );
        let c = b.var("c", b.ref_type("Counter"), b.new_object("Counter", &[b.int(1)]));
        let x = b.var("x", TypeExpr::Int, b.int(0));

        let ok = b.method_call("c", "add", &[b.int(2)]);
        let output = check(&b.let_in(&[counter], &[c, x], ok));
        assert_eq!(output.program_type, Some(Type::Int));

        let not_ref = b.method_call("x", "add", &[]);
        let output = check(&b.let_in(&[counter], &[c, x], not_ref));
        assert!(matches!(output.errors[..], [TypeError::NotAReference { .. }]));

        let field = b.method_call("c", "n", &[]);
        let output = check(&b.let_in(&[counter], &[c, x], field));
        assert!(matches!(output.errors[..], [TypeError::NotAMethod { .. }]));
    }

    #[test]
    fn incomplete_nodes_are_skipped() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let undeclared = b.var("x", TypeExpr::Int, b.id("missing"));
        let program = b.let_in(&[], &[undeclared], b.int(1));

        let mut ctx = CompilationContext::new();
        let symbols = SymbolTablePass::new(&mut ctx).run(&program);
        assert_eq!(symbols.errors.len(), 1);

        let output = TypeCheckPass::new(&ctx).run(&program);
        assert!(output.errors.is_empty());
        assert_eq!(output.program_type, Some(Type::Int));
    }
}
