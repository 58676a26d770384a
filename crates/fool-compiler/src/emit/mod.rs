//! Code Generation (Pass 3) - emit stack machine code.
//!
//! The [`CodeGenerator`] walks a checked tree and produces a [`CodeChunk`]:
//! the main program, `halt`, then every function and method body as an
//! out-of-line block headed by its label.
//!
//! # Calling Convention
//!
//! ```text
//! caller                          callee
//! ------                          ------
//! lfp            control link     label:  cfp         fp := sp (points at AL)
//! <arg n> .. <arg 1>                      lra         return address at fp-1
//! lfp, lw * hops access link              <locals>    at fp-2, fp-3, ...
//! push <code address>                     <body>
//! js                                      stm         result to $tm
//!                                         pop * locals, sra, pop (AL),
//!                                         pop * params, sfp (CL),
//!                                         ltm, lra, js
//! ```
//!
//! # Heap Layout
//!
//! Objects and dispatch tables are appended at `$hp`, which only grows.
//! An object is its field values (last field first) followed by the
//! dispatch pointer; the object's address is that of the dispatch pointer,
//! so field `-k` sits `k` words below it.
//!
//! The generator assumes a tree that passed both semantic passes. A node
//! missing its binding emits nothing.

mod labels;

use fool_ast::{BinaryExpr, BinaryOp, ClassDecl, Decl, Expr, FunDecl, LiteralKind, Program};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::bytecode::{CodeChunk, Instruction, Label};
use crate::context::CompilationContext;
use crate::symbols::UseSite;
pub use labels::LabelGenerator;

/// Default size of the target machine's memory, in words.
pub const DEFAULT_HEAP_SIZE: i32 = 10000;

/// Code generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Memory size of the target machine. The program frame starts there,
    /// so class slots are addressed as `heap_size + offset`.
    pub heap_size: i32,
    /// Interleave `/* ... */` comments naming classes, methods and calls.
    pub debug: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            heap_size: DEFAULT_HEAP_SIZE,
            debug: false,
        }
    }
}

/// Pass 3: generate code for a checked program.
pub struct CodeGenerator<'a> {
    ctx: &'a CompilationContext,
    options: CodegenOptions,
    labels: LabelGenerator,
    /// Out-of-line function and method bodies.
    functions: CodeChunk,
    /// Method labels by dispatch slot, per class generated so far.
    dispatch_tables: FxHashMap<String, Vec<Label>>,
}

impl<'a> CodeGenerator<'a> {
    /// Create a code generator reading bindings from `ctx`.
    pub fn new(ctx: &'a CompilationContext, options: CodegenOptions) -> Self {
        Self {
            ctx,
            options,
            labels: LabelGenerator::new(),
            functions: CodeChunk::new(),
            dispatch_tables: FxHashMap::default(),
        }
    }

    /// Generate the full listing for a program.
    #[tracing::instrument(skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate(mut self, program: &Program<'_>) -> CodeChunk {
        let mut code = CodeChunk::new();

        match program {
            Program::LetIn(program) => {
                // Placeholder for the return address slot of the program frame.
                code.push(Instruction::Push(0));
                for class in program.classes {
                    self.gen_class(class, &mut code);
                }
                self.comment(&mut code, || "end class code".to_string());
                for decl in program.decls {
                    self.gen_decl(decl, &mut code);
                }
                self.comment(&mut code, || "end decl code".to_string());
                self.gen_expr(program.body, &mut code);
            }
            Program::Expr(body) => self.gen_expr(body, &mut code),
        }
        code.push(Instruction::Halt);

        let functions = std::mem::take(&mut self.functions);
        code.append(functions);

        debug!(
            instructions = code.executable_len(),
            labels = self.labels.count(),
            "code generated"
        );
        code
    }

    fn comment(&self, code: &mut CodeChunk, text: impl FnOnce() -> String) {
        if self.options.debug {
            code.push(Instruction::Comment(text()));
        }
    }

    fn use_site(&self, node: fool_ast::NodeId) -> Option<&'a UseSite> {
        let ctx: &'a CompilationContext = self.ctx;
        ctx.symbols().use_site(node)
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// Push the value of a declaration into its frame slot.
    fn gen_decl(&mut self, decl: &Decl<'_>, code: &mut CodeChunk) {
        match decl {
            Decl::Var(var) => self.gen_expr(var.init, code),
            Decl::Fun(fun) => {
                let label = self.labels.fresh_function();
                self.gen_body(fun, label, format!("function {}", fun.name));
                code.push(Instruction::PushLabel(label));
            }
        }
    }

    /// Emit the out-of-line body of a function or method.
    fn gen_body(&mut self, fun: &FunDecl<'_>, label: Label, note: String) {
        let mut body = CodeChunk::new();
        self.comment(&mut body, || note);
        body.push(Instruction::Label(label));
        body.push(Instruction::Cfp);
        body.push(Instruction::Lra);
        for decl in fun.decls {
            self.gen_decl(decl, &mut body);
        }
        self.gen_expr(fun.body, &mut body);

        body.push(Instruction::Stm);
        body.extend(fun.decls.iter().map(|_| Instruction::Pop));
        body.push(Instruction::Sra);
        body.push(Instruction::Pop);
        body.extend(fun.params.iter().map(|_| Instruction::Pop));
        body.push(Instruction::Sfp);
        body.push(Instruction::Ltm);
        body.push(Instruction::Lra);
        body.push(Instruction::Js);

        self.functions.append(body);
    }

    /// Build the class's dispatch table, emit its methods, and write the
    /// table to the heap. The class slot receives the table's address.
    fn gen_class(&mut self, class: &ClassDecl<'_>, code: &mut CodeChunk) {
        let ctx: &'a CompilationContext = self.ctx;
        let Some(info) = ctx.symbols().class(class.id) else {
            return;
        };

        let mut table = info
            .superclass
            .as_ref()
            .and_then(|parent| self.dispatch_tables.get(parent))
            .cloned()
            .unwrap_or_default();

        for method in class.methods {
            let Some(entry) = ctx.symbols().declaration(method.id) else {
                continue;
            };
            let label = self.labels.fresh_function();
            let slot = entry.offset as usize;
            match table.get_mut(slot) {
                Some(inherited) => *inherited = label,
                None => table.push(label),
            }
            self.gen_body(method, label, format!("method {}.{}", class.name, method.name));
        }

        debug!(class = %class.name, slots = table.len(), "dispatch table built");

        self.comment(code, || format!("class {} declaration", class.name));
        code.push(Instruction::Lhp);
        for label in &table {
            code.push(Instruction::PushLabel(*label));
            code.push(Instruction::Lhp);
            code.push(Instruction::Sw);
            self.bump_heap_pointer(code);
        }

        self.dispatch_tables.insert(info.name.clone(), table);
    }

    /// `$hp := $hp + 1`
    fn bump_heap_pointer(&self, code: &mut CodeChunk) {
        code.push(Instruction::Push(1));
        code.push(Instruction::Lhp);
        code.push(Instruction::Add);
        code.push(Instruction::Shp);
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    fn gen_expr(&mut self, expr: &Expr<'_>, code: &mut CodeChunk) {
        match expr {
            Expr::Literal(literal) => code.push(Instruction::Push(match literal.kind {
                LiteralKind::Int(value) => value,
                LiteralKind::Bool(value) => i32::from(value),
                LiteralKind::Null => -1,
            })),
            Expr::Binary(binary) => self.gen_binary(binary, code),
            Expr::Not(not) => {
                code.push(Instruction::Push(1));
                self.gen_expr(not.operand, code);
                code.push(Instruction::Sub);
            }
            Expr::Ident(ident) => {
                let Some(site) = self.use_site(ident.id) else {
                    return;
                };
                self.gen_frame_address(site, code);
                code.push(Instruction::Push(site.entry.offset));
                code.push(Instruction::Add);
                code.push(Instruction::Lw);
            }
            Expr::Call(call) => {
                let Some(site) = self.use_site(call.id) else {
                    return;
                };
                self.comment(code, || format!("call {}", call.callee));
                code.push(Instruction::Lfp);
                self.gen_args_reversed(call.args, code);

                // Access link: the declaring frame, or the object for a
                // sibling method.
                self.gen_frame_address(site, code);
                code.push(Instruction::Stm);
                code.push(Instruction::Ltm);
                code.push(Instruction::Ltm);
                if site.entry.is_method() {
                    code.push(Instruction::Lw);
                }

                code.push(Instruction::Push(site.entry.offset));
                code.push(Instruction::Add);
                code.push(Instruction::Lw);
                code.push(Instruction::Js);
            }
            Expr::MethodCall(call) => {
                let ctx: &'a CompilationContext = self.ctx;
                let (Some(object), Some(method)) =
                    (self.use_site(call.id), ctx.symbols().method(call.id))
                else {
                    return;
                };
                self.comment(code, || format!("call {}.{}", call.object, call.method));
                code.push(Instruction::Lfp);
                self.gen_args_reversed(call.args, code);

                // Object address, used as access link and for dispatch.
                self.gen_frame_address(object, code);
                code.push(Instruction::Push(object.entry.offset));
                code.push(Instruction::Add);
                code.push(Instruction::Lw);
                code.push(Instruction::Stm);
                code.push(Instruction::Ltm);
                code.push(Instruction::Ltm);

                code.push(Instruction::Lw);
                code.push(Instruction::Push(method.offset));
                code.push(Instruction::Add);
                code.push(Instruction::Lw);
                code.push(Instruction::Js);
            }
            Expr::New(new) => {
                let Some(site) = self.use_site(new.id) else {
                    return;
                };
                self.comment(code, || format!("new {}", new.class));
                for arg in new.args {
                    self.gen_expr(arg, code);
                }
                for _ in new.args {
                    code.push(Instruction::Lhp);
                    code.push(Instruction::Sw);
                    self.bump_heap_pointer(code);
                }

                // Dispatch pointer from the class slot of the program frame.
                code.push(Instruction::Push(self.options.heap_size));
                code.push(Instruction::Push(site.entry.offset));
                code.push(Instruction::Add);
                code.push(Instruction::Lw);
                code.push(Instruction::Lhp);
                code.push(Instruction::Sw);

                code.push(Instruction::Lhp);
                self.bump_heap_pointer(code);
            }
            Expr::If(if_expr) => {
                let then_label = self.labels.fresh_label();
                let end_label = self.labels.fresh_label();
                self.gen_expr(if_expr.condition, code);
                code.push(Instruction::Push(1));
                code.push(Instruction::Beq(then_label));
                self.gen_expr(if_expr.else_expr, code);
                code.push(Instruction::Branch(end_label));
                code.push(Instruction::Label(then_label));
                self.gen_expr(if_expr.then_expr, code);
                code.push(Instruction::Label(end_label));
            }
            Expr::Print(print) => {
                self.gen_expr(print.expr, code);
                code.push(Instruction::Print);
            }
        }
    }

    fn gen_binary(&mut self, binary: &BinaryExpr<'_>, code: &mut CodeChunk) {
        match binary.op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::And => {
                self.gen_expr(binary.left, code);
                self.gen_expr(binary.right, code);
                code.push(match binary.op {
                    BinaryOp::Add => Instruction::Add,
                    BinaryOp::Sub => Instruction::Sub,
                    BinaryOp::Div => Instruction::Div,
                    // `and` of two 0/1 values is their product.
                    _ => Instruction::Mult,
                });
            }
            BinaryOp::Equal => {
                self.gen_expr(binary.left, code);
                self.gen_expr(binary.right, code);
                self.gen_select(code, Instruction::Beq);
            }
            BinaryOp::LessEqual => {
                self.gen_expr(binary.left, code);
                self.gen_expr(binary.right, code);
                self.gen_select(code, Instruction::Bleq);
            }
            BinaryOp::GreaterEqual => {
                self.gen_expr(binary.right, code);
                self.gen_expr(binary.left, code);
                self.gen_select(code, Instruction::Bleq);
            }
            BinaryOp::Or => {
                // The larger operand wins; both run, then the winner runs again.
                let left_label = self.labels.fresh_label();
                let end_label = self.labels.fresh_label();
                self.gen_expr(binary.right, code);
                self.gen_expr(binary.left, code);
                code.push(Instruction::Bleq(left_label));
                self.gen_expr(binary.right, code);
                code.push(Instruction::Branch(end_label));
                code.push(Instruction::Label(left_label));
                self.gen_expr(binary.left, code);
                code.push(Instruction::Label(end_label));
            }
        }
    }

    /// Turn the branch `test` over the two topmost values into 1 or 0.
    fn gen_select(&mut self, code: &mut CodeChunk, test: fn(Label) -> Instruction) {
        let true_label = self.labels.fresh_label();
        let end_label = self.labels.fresh_label();
        code.push(test(true_label));
        code.push(Instruction::Push(0));
        code.push(Instruction::Branch(end_label));
        code.push(Instruction::Label(true_label));
        code.push(Instruction::Push(1));
        code.push(Instruction::Label(end_label));
    }

    /// Push the address of the frame declaring `site`'s binding by
    /// following access links from the current frame.
    fn gen_frame_address(&self, site: &UseSite, code: &mut CodeChunk) {
        code.push(Instruction::Lfp);
        for _ in 0..site.hops() {
            code.push(Instruction::Lw);
        }
    }

    fn gen_args_reversed(&mut self, args: &[Expr<'_>], code: &mut CodeChunk) {
        for arg in args.iter().rev() {
            self.gen_expr(arg, code);
        }
    }
}
