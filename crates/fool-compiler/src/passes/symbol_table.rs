//! Symbol Table Pass (Pass 1) - resolve every name to a binding.
//!
//! This pass walks the AST depth-first and assigns every declaration its
//! nesting level, type and slot offset, then resolves every use-site to the
//! declaration it names. Results go into the [`SymbolTable`] side tables of
//! the [`CompilationContext`]; the tree itself is never modified.
//!
//! ## Responsibilities
//!
//! - Lay out frames: parameters at offsets `1, 2, ...`, locals at `-2, -3, ...`
//! - Lay out classes: fields at `-1, -2, ...`, methods at dispatch slots
//!   `0, 1, ...`, inherited members first and keeping their slots
//! - Register each class's virtual table and superclass link
//! - Resolve identifiers, calls, method calls and `new`
//!
//! ## Frame Layout
//!
//! ```text
//!   fp + n   parameter n
//!   ...
//!   fp + 1   parameter 1
//!   fp       access link
//!   fp - 1   return address
//!   fp - 2   first local declaration
//!   ...
//! ```
//!
//! The program's own frame has no parameters; its slot `-1` is a
//! placeholder so declarations also start at `-2`.
//!
//! Every problem is recorded as a [`BindingError`] and the walk continues.

use fool_ast::{
    ClassDecl, Decl, Expr, FieldDecl, FunDecl, LetInProgram, MethodDecl, NodeId, Program,
};
use fool_core::{BindingError, ClassType, Span, SymbolEntry, SymbolKind, Type};
use fool_registry::VirtualTable;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::context::CompilationContext;
use crate::passes::signature;
use crate::scope::ScopeStack;
use crate::symbols::{ClassInfo, UseSite};

/// Offset of the first local declaration in any frame.
const FIRST_LOCAL_OFFSET: i32 = -2;

/// Output of the symbol table pass.
#[derive(Debug, Default)]
pub struct SymbolTableOutput {
    /// Number of classes elaborated.
    pub classes_declared: usize,
    /// Number of use-sites resolved.
    pub uses_resolved: usize,
    /// Collected errors (the pass always runs to completion).
    pub errors: Vec<BindingError>,
}

/// Pass 1: build the symbol table.
pub struct SymbolTablePass<'a> {
    ctx: &'a mut CompilationContext,
    scopes: ScopeStack,
    /// Next offset for a local declaration at the current nesting level.
    decl_offset: i32,
    /// Class whose members are being elaborated.
    current_class: Option<String>,
    classes_declared: usize,
    errors: Vec<BindingError>,
}

impl<'a> SymbolTablePass<'a> {
    /// Create a new symbol table pass.
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self {
            ctx,
            scopes: ScopeStack::new(),
            decl_offset: FIRST_LOCAL_OFFSET,
            current_class: None,
            classes_declared: 0,
            errors: Vec::new(),
        }
    }

    /// Run the pass on a program.
    #[tracing::instrument(skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, program: &Program<'_>) -> SymbolTableOutput {
        match program {
            Program::LetIn(program) => self.visit_let_in(program),
            Program::Expr(body) => self.visit_expr(body),
        }

        debug!(
            classes = self.classes_declared,
            uses = self.ctx.symbols().use_count(),
            errors = self.errors.len(),
            "symbol table built"
        );

        SymbolTableOutput {
            classes_declared: self.classes_declared,
            uses_resolved: self.ctx.symbols().use_count(),
            errors: self.errors,
        }
    }

    fn visit_let_in(&mut self, program: &LetInProgram<'_>) {
        self.scopes.push_scope();
        self.decl_offset = FIRST_LOCAL_OFFSET;

        for class in program.classes {
            self.visit_class(class);
        }
        for decl in program.decls {
            self.visit_decl(decl);
        }
        self.visit_expr(program.body);

        self.scopes.pop_scope();
    }

    fn report(&mut self, error: BindingError) {
        debug!(%error, "binding error");
        self.errors.push(error);
    }

    /// Declare `name` in the current scope, reporting a duplicate.
    fn declare(&mut self, kind: SymbolKind, name: &str, span: Span, entry: SymbolEntry) {
        if self.scopes.declare(name, entry).is_some() {
            self.report(BindingError::Duplicate {
                kind,
                name: name.to_string(),
                span,
            });
        }
    }

    /// Allocate the next local slot at the current nesting level.
    fn next_local(&mut self) -> i32 {
        let offset = self.decl_offset;
        self.decl_offset -= 1;
        offset
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    fn visit_decl(&mut self, decl: &Decl<'_>) {
        match decl {
            Decl::Var(var) => {
                // The initializer cannot see the variable it initializes.
                self.visit_expr(var.init);

                let entry =
                    SymbolEntry::new(self.scopes.nesting_level(), var.ty.to_type(), self.next_local());
                self.declare(SymbolKind::Variable, var.name.name, var.span, entry.clone());
                self.ctx.symbols_mut().declare(var.id, entry);
            }
            Decl::Fun(fun) => {
                let ty = Type::Arrow(signature(fun));
                let entry = SymbolEntry::new(self.scopes.nesting_level(), ty, self.next_local());
                self.declare(SymbolKind::Function, fun.name.name, fun.span, entry.clone());
                self.ctx.symbols_mut().declare(fun.id, entry);

                self.visit_body(fun);
            }
        }
    }

    /// Open the scope of a function or method body and resolve its contents.
    fn visit_body(&mut self, fun: &FunDecl<'_>) {
        self.scopes.push_scope();
        let saved_offset = self.decl_offset;
        self.decl_offset = FIRST_LOCAL_OFFSET;
        let level = self.scopes.nesting_level();

        for (index, param) in fun.params.iter().enumerate() {
            let entry = SymbolEntry::new(level, param.ty.to_type(), index as i32 + 1);
            self.declare(SymbolKind::Parameter, param.name.name, param.span, entry.clone());
            self.ctx.symbols_mut().declare(param.id, entry);
        }
        for decl in fun.decls {
            self.visit_decl(decl);
        }
        self.visit_expr(fun.body);

        self.scopes.pop_scope();
        self.decl_offset = saved_offset;
    }

    // ==========================================================================
    // Classes
    // ==========================================================================

    fn visit_class(&mut self, class: &ClassDecl<'_>) {
        let name = class.name.name;
        debug!(class = name, "elaborating class");

        // Start from the superclass's layout and members, if it resolves.
        let (mut layout, table, superclass, super_entry) = match class.superclass {
            None => (ClassType::new(), VirtualTable::default(), None, None),
            Some(parent) => {
                let inherited = self
                    .ctx
                    .classes()
                    .virtual_table(parent.name)
                    .cloned()
                    .zip(self.scopes.lookup_global(parent.name).cloned());
                match inherited {
                    Some((table, entry)) => {
                        let layout = match &entry.ty {
                            Type::Class(parent_layout) => parent_layout.clone(),
                            _ => ClassType::new(),
                        };
                        (layout, table, Some(parent.name.to_string()), Some(entry))
                    }
                    None => {
                        self.report(BindingError::SuperclassNotDeclared {
                            class: name.to_string(),
                            superclass: parent.name.to_string(),
                            span: parent.span,
                        });
                        (ClassType::new(), VirtualTable::default(), None, None)
                    }
                }
            }
        };

        // The class itself occupies a slot of the program frame.
        let level = self.scopes.nesting_level();
        let class_offset = self.next_local();
        let entry = SymbolEntry::new(level, Type::Class(layout.clone()), class_offset);
        self.declare(SymbolKind::Class, name, class.span, entry.clone());
        self.ctx.symbols_mut().declare(class.id, entry);

        self.ctx
            .classes_mut()
            .register(name, superclass.clone(), table.clone());
        self.scopes.push_table(table);
        let saved_class = self.current_class.replace(name.to_string());

        let mut own_names = FxHashSet::default();
        let mut overriding_fields = FxHashSet::default();
        self.visit_fields(name, class.fields, &mut layout, &mut own_names, &mut overriding_fields);
        self.visit_methods(name, class.methods, &mut layout, &mut own_names);

        self.scopes.pop_scope();
        self.current_class = saved_class;

        // Publish the finished layout.
        let entry = SymbolEntry::new(level, Type::Class(layout.clone()), class_offset);
        self.scopes.update_global(name, entry.clone());
        let symbols = self.ctx.symbols_mut();
        symbols.declare(class.id, entry);
        symbols.finish_class(name, &layout);
        symbols.add_class(
            class.id,
            ClassInfo {
                name: name.to_string(),
                ty: layout,
                superclass,
                super_entry,
                overriding_fields,
            },
        );
        self.classes_declared += 1;
    }

    /// Bind a member in the class scope and in the class's registered table.
    fn bind_member(&mut self, class: &str, member: &str, entry: SymbolEntry) {
        self.scopes.declare(member, entry.clone());
        self.ctx.classes_mut().insert_member(class, member, entry);
    }

    fn visit_fields(
        &mut self,
        class: &str,
        fields: &[FieldDecl<'_>],
        layout: &mut ClassType,
        own_names: &mut FxHashSet<String>,
        overriding: &mut FxHashSet<NodeId>,
    ) {
        let level = self.scopes.nesting_level();
        let inherited = layout.fields.len();

        for field in fields {
            let name = field.name.name;
            let ty = field.ty.to_type();

            if !own_names.insert(name.to_string()) {
                self.report(BindingError::Duplicate {
                    kind: SymbolKind::Field,
                    name: name.to_string(),
                    span: field.span,
                });
            }

            let offset = match self.scopes.lookup_local(name).cloned() {
                None => {
                    layout.fields.push(ty.clone());
                    ClassType::field_offset(layout.fields.len() - 1)
                }
                Some(existing) if existing.is_method() => {
                    self.report(BindingError::FieldOverridesMethod {
                        class: class.to_string(),
                        field: name.to_string(),
                        span: field.span,
                    });
                    continue;
                }
                Some(existing) => existing.offset,
            };

            // Reusing a slot replaces the field's type there.
            if let Some(slot) = ClassType::field_slot(offset) {
                if let Some(current) = layout.fields.get_mut(slot) {
                    *current = ty.clone();
                }
                if slot < inherited {
                    overriding.insert(field.id);
                }
            }

            let entry = SymbolEntry::new(level, ty, offset);
            self.bind_member(class, name, entry.clone());
            self.ctx.symbols_mut().declare(field.id, entry);
        }
    }

    fn visit_methods(
        &mut self,
        class: &str,
        methods: &[MethodDecl<'_>],
        layout: &mut ClassType,
        own_names: &mut FxHashSet<String>,
    ) {
        let level = self.scopes.nesting_level();

        for method in methods {
            let name = method.name.name;
            let sig = signature(method);

            let duplicate = !own_names.insert(name.to_string());
            if duplicate {
                self.report(BindingError::Duplicate {
                    kind: SymbolKind::Method,
                    name: name.to_string(),
                    span: method.span,
                });
            }

            let slot = match self.scopes.lookup_local(name).cloned() {
                None => {
                    layout.methods.push(sig.clone());
                    Some(layout.methods.len() - 1)
                }
                // An own field of the same name is already reported as a duplicate.
                Some(existing) if !existing.is_method() => {
                    if !duplicate {
                        self.report(BindingError::MethodOverridesField {
                            class: class.to_string(),
                            method: name.to_string(),
                            span: method.span,
                        });
                    }
                    None
                }
                Some(existing) => {
                    let slot = existing.offset as usize;
                    if let Some(current) = layout.methods.get_mut(slot) {
                        *current = sig.clone();
                    }
                    Some(slot)
                }
            };

            // Bound before the body so the method can call itself.
            if let Some(slot) = slot {
                let entry = SymbolEntry::new(level, Type::Method(sig), slot as i32);
                self.bind_member(class, name, entry.clone());
                self.ctx.symbols_mut().declare(method.id, entry);
            }

            self.visit_body(method);
        }
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    fn resolve(
        &mut self,
        kind: SymbolKind,
        node: NodeId,
        name: &str,
        span: Span,
    ) -> Option<SymbolEntry> {
        match self.scopes.lookup(name).cloned() {
            Some(entry) => {
                let site = UseSite::new(entry.clone(), self.scopes.nesting_level());
                self.ctx.symbols_mut().bind_use(node, site);
                Some(entry)
            }
            None => {
                self.report(BindingError::Undeclared {
                    kind,
                    name: name.to_string(),
                    span,
                });
                None
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr<'_>) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Binary(binary) => {
                self.visit_expr(binary.left);
                self.visit_expr(binary.right);
            }
            Expr::Not(not) => self.visit_expr(not.operand),
            Expr::Ident(ident) => {
                self.resolve(SymbolKind::Value, ident.id, ident.ident.name, ident.span);
            }
            Expr::Call(call) => {
                self.resolve(SymbolKind::Function, call.id, call.callee.name, call.span);
                self.visit_args(call.args);
            }
            Expr::MethodCall(call) => {
                let object =
                    self.resolve(SymbolKind::Object, call.id, call.object.name, call.span);
                if let Some(Type::Ref(class)) = object.map(|entry| entry.ty) {
                    match self.ctx.classes().member(&class, call.method.name).cloned() {
                        Some(method) => self.ctx.symbols_mut().bind_method(call.id, method),
                        None => self.report(BindingError::MethodNotDeclared {
                            class,
                            method: call.method.name.to_string(),
                            span: call.span,
                        }),
                    }
                }
                self.visit_args(call.args);
            }
            Expr::New(new) => {
                let class = new.class.name;
                let entry = self
                    .scopes
                    .lookup_global(class)
                    .filter(|_| self.ctx.classes().contains(class))
                    .cloned();
                match entry {
                    Some(entry) => {
                        let site = UseSite::new(entry, self.scopes.nesting_level());
                        let symbols = self.ctx.symbols_mut();
                        symbols.bind_use(new.id, site);
                        if self.current_class.as_deref() == Some(class) {
                            symbols.defer_new(class, new.id);
                        }
                    }
                    None => self.report(BindingError::ClassNotDeclared {
                        name: class.to_string(),
                        span: new.span,
                    }),
                }
                self.visit_args(new.args);
            }
            Expr::If(if_expr) => {
                self.visit_expr(if_expr.condition);
                self.visit_expr(if_expr.then_expr);
                self.visit_expr(if_expr.else_expr);
            }
            Expr::Print(print) => self.visit_expr(print.expr),
        }
    }

    fn visit_args(&mut self, args: &[Expr<'_>]) {
        for arg in args {
            self.visit_expr(arg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use fool_ast::{AstBuilder, BinaryOp, TypeExpr};

    fn run(program: &Program<'_>) -> (CompilationContext, SymbolTableOutput) {
        let mut ctx = CompilationContext::new();
        let output = SymbolTablePass::new(&mut ctx).run(program);
        (ctx, output)
    }

    fn ident_id(expr: &Expr<'_>) -> NodeId {
        match expr {
            Expr::Ident(ident) => ident.id,
            _ => panic!("expected identifier"),
        }
    }

    #[test]
    fn global_declarations_start_below_placeholder() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let x = b.var("x", TypeExpr::Int, b.int(1));
        let y = b.var("y", TypeExpr::Bool, b.bool(true));
        let program = b.let_in(&[], &[x, y], b.id("y"));

        let (ctx, output) = run(&program);
        assert!(output.errors.is_empty());

        let (Decl::Var(x), Decl::Var(y)) = (x, y) else {
            panic!("expected variables");
        };
        assert_eq!(ctx.symbols().declaration(x.id).map(|e| e.offset), Some(-2));
        assert_eq!(ctx.symbols().declaration(y.id).map(|e| e.offset), Some(-3));
    }

    #[test]
    fn function_frames_and_static_levels() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        // let var g = 1; fun f(a: int, b: int): int let var l = a; in l + g in ...
        let g = b.var("g", TypeExpr::Int, b.int(1));
        let local = b.var("l", TypeExpr::Int, b.id("a"));
        let use_g = b.id("g");
        let body = b.binary(b.id("l"), BinaryOp::Add, use_g);
        let f = b.fun(
            "f",
            TypeExpr::Int,
            &[b.param("a", TypeExpr::Int), b.param("b", TypeExpr::Int)],
            &[local],
            body,
        );
        let program = b.let_in(&[], &[g, f], b.call("f", &[b.int(1), b.int(2)]));

        let (ctx, output) = run(&program);
        assert!(output.errors.is_empty(), "{:?}", output.errors);

        let Decl::Fun(fun) = f else { panic!("expected function") };
        let params: Vec<_> = fun
            .params
            .iter()
            .filter_map(|p| ctx.symbols().declaration(p.id))
            .map(|e| (e.nesting_level, e.offset))
            .collect();
        assert_eq!(params, vec![(1, 1), (1, 2)]);

        let Decl::Var(local) = local else { panic!("expected variable") };
        assert_eq!(ctx.symbols().declaration(local.id).map(|e| e.offset), Some(-2));
        assert_eq!(ctx.symbols().declaration(fun.id).map(|e| (e.nesting_level, e.offset)), Some((0, -3)));

        let site = ctx.symbols().use_site(ident_id(&use_g)).cloned();
        assert_eq!(site.map(|s| (s.entry.nesting_level, s.nesting_level, s.hops())), Some((0, 1, 1)));
    }

    #[test]
    fn duplicate_variable_reported_and_replaced() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let first = b.var("x", TypeExpr::Int, b.int(1));
        b.set_line(2);
        let second = b.var("x", TypeExpr::Bool, b.bool(false));
        let use_x = b.id("x");
        let program = b.let_in(&[], &[first, second], use_x);

        let (ctx, output) = run(&program);
        assert_eq!(output.errors.len(), 1);
        assert_eq!(
            output.errors[0].to_string(),
            "Binding error: variable 'x' already declared, line 2"
        );
        let site = ctx.symbols().use_site(ident_id(&use_x)).cloned();
        assert_eq!(site.map(|s| s.entry.ty), Some(Type::Bool));
    }

    #[test]
    fn undeclared_names_are_reported() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = b.binary(b.id("x"), BinaryOp::Add, b.call("f", &[]));
        let program = b.expr_program(body);

        let (_, output) = run(&program);
        let messages: Vec<_> = output.errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Binding error: variable or parameter 'x' not declared, line 1",
                "Binding error: function 'f' not declared, line 1",
            ]
        );
    }

    #[test]
    fn class_layout_with_inheritance() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);

        let a = b.class(
            "A",
            None,
            &[b.field("x", TypeExpr::Int), b.field("y", TypeExpr::Bool)],
            &[
                b.method("m", TypeExpr::Int, &[], &[], b.id("x")),
                b.method("n", TypeExpr::Bool, &[], &[], b.id("y")),
            ],
        );
        let override_y = b.field("y", TypeExpr::Bool);
        let z = b.field("z", TypeExpr::Int);
        let n = b.method("n", TypeExpr::Bool, &[], &[], b.bool(false));
        let k = b.method("k", TypeExpr::Int, &[], &[], b.id("z"));
        let class_b = b.class("B", Some("A"), &[override_y, z], &[n, k]);
        let program = b.let_in(&[a, class_b], &[], b.int(0));

        let (ctx, output) = run(&program);
        assert!(output.errors.is_empty(), "{:?}", output.errors);
        assert_eq!(output.classes_declared, 2);

        let table = ctx.classes().virtual_table("B").cloned().unwrap_or_default();
        let offset = |name: &str| table.get(name).map(|e| e.offset);
        assert_eq!(offset("x"), Some(-1));
        assert_eq!(offset("y"), Some(-2));
        assert_eq!(offset("z"), Some(-3));
        assert_eq!(offset("m"), Some(0));
        assert_eq!(offset("n"), Some(1));
        assert_eq!(offset("k"), Some(2));

        let info = ctx.symbols().class(class_b.id).cloned().unwrap_or_default();
        assert_eq!(info.ty.fields.len(), 3);
        assert_eq!(info.ty.methods.len(), 3);
        assert!(info.is_override(override_y.id));
        assert!(!info.is_override(z.id));
        assert_eq!(info.superclass.as_deref(), Some("A"));
        assert_eq!(info.parent_type().map(|p| p.fields.len()), Some(2));

        // Class slots in the program frame.
        assert_eq!(ctx.symbols().declaration(a.id).map(|e| e.offset), Some(-2));
        assert_eq!(ctx.symbols().declaration(class_b.id).map(|e| e.offset), Some(-3));
        assert!(ctx.classes().is_ancestor("B", "A"));
    }

    #[test]
    fn duplicate_field_second_wins() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let first = b.field("f", TypeExpr::Int);
        let second = b.field("f", TypeExpr::Bool);
        let class = b.class("A", None, &[first, second], &[]);
        let program = b.let_in(&[class], &[], b.int(0));

        let (ctx, output) = run(&program);
        assert_eq!(output.errors.len(), 1);
        assert!(matches!(
            output.errors[0],
            BindingError::Duplicate { kind: SymbolKind::Field, .. }
        ));

        let entry = ctx.classes().member("A", "f").cloned();
        assert_eq!(entry.map(|e| (e.ty, e.offset)), Some((Type::Bool, -1)));
        let info = ctx.symbols().class(class.id).cloned().unwrap_or_default();
        assert_eq!(info.ty.fields, vec![Type::Bool]);
    }

    #[test]
    fn member_kind_clashes() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let a = b.class(
            "A",
            None,
            &[b.field("f", TypeExpr::Int)],
            &[b.method("m", TypeExpr::Int, &[], &[], b.int(1))],
        );
        let bad = b.class(
            "B",
            Some("A"),
            &[b.field("m", TypeExpr::Int)],
            &[b.method("f", TypeExpr::Int, &[], &[], b.int(1))],
        );
        let program = b.let_in(&[a, bad], &[], b.int(0));

        let (_, output) = run(&program);
        assert!(matches!(output.errors[0], BindingError::FieldOverridesMethod { .. }));
        assert!(matches!(output.errors[1], BindingError::MethodOverridesField { .. }));
    }

    #[test]
    fn method_named_like_own_field_is_only_a_duplicate() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let a = b.class(
            "A",
            None,
            &[b.field("x", TypeExpr::Int)],
            &[b.method("x", TypeExpr::Int, &[], &[], b.int(1))],
        );
        let program = b.let_in(&[a], &[], b.int(0));

        let (_, output) = run(&program);
        assert_eq!(output.errors.len(), 1, "{:?}", output.errors);
        assert!(matches!(output.errors[0], BindingError::Duplicate { .. }));
    }

    #[test]
    fn unknown_superclass_and_class() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let orphan = b.class("B", Some("Missing"), &[], &[]);
        let program = b.let_in(&[orphan], &[], b.new_object("Nope", &[]));

        let (_, output) = run(&program);
        assert!(matches!(output.errors[0], BindingError::SuperclassNotDeclared { .. }));
        assert!(matches!(output.errors[1], BindingError::ClassNotDeclared { .. }));
    }

    #[test]
    fn method_call_resolves_inherited_slot() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let a = b.class("A", None, &[], &[b.method("m", TypeExpr::Int, &[], &[], b.int(1))]);
        let class_b = b.class("B", Some("A"), &[], &[]);
        let obj = b.var("b", b.ref_type("B"), b.new_object("B", &[]));
        let call = b.method_call("b", "m", &[]);
        let program = b.let_in(&[a, class_b], &[obj], call);

        let (ctx, output) = run(&program);
        assert!(output.errors.is_empty(), "{:?}", output.errors);

        let Expr::MethodCall(call) = call else { panic!("expected method call") };
        let method = ctx.symbols().method(call.id).cloned();
        assert_eq!(method.map(|m| (m.offset, m.is_method())), Some((0, true)));
    }

    #[test]
    fn missing_method_is_reported() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let a = b.class("A", None, &[], &[]);
        let obj = b.var("a", b.ref_type("A"), b.new_object("A", &[]));
        let program = b.let_in(&[a], &[obj], b.method_call("a", "m", &[]));

        let (_, output) = run(&program);
        assert_eq!(
            output.errors[0].to_string(),
            "Binding error: method 'm' not declared in class 'A', line 1"
        );
    }

    #[test]
    fn new_inside_own_class_sees_final_layout() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let make = b.new_object("Node", &[b.int(1)]);
        let class = b.class(
            "Node",
            None,
            &[b.field("value", TypeExpr::Int)],
            &[b.method("copy", b.ref_type("Node"), &[], &[], make)],
        );
        let program = b.let_in(&[class], &[], b.int(0));

        let (ctx, output) = run(&program);
        assert!(output.errors.is_empty(), "{:?}", output.errors);

        let Expr::New(new) = make else { panic!("expected new") };
        let ty = ctx.symbols().use_site(new.id).map(|s| s.entry.ty.clone());
        let Some(Type::Class(layout)) = ty else { panic!("expected class type") };
        assert_eq!(layout.fields, vec![Type::Int]);
        assert_eq!(layout.methods.len(), 1);
    }
}
