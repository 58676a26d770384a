//! FOOL
//!
//! Compiler for FOOL, a small functional object-oriented language, from an
//! arena-allocated syntax tree to the textual listing of a stack virtual
//! machine.
//!
//! ```
//! use bumpalo::Bump;
//! use fool::{BinaryOp, Compiler};
//! use fool::ast::AstBuilder;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let sum = b.binary(b.int(2), BinaryOp::Add, b.int(3));
//! let program = b.expr_program(b.print(sum));
//!
//! let compiled = Compiler::new().compile(&program).unwrap();
//! assert_eq!(compiled.listing(), "push 2\npush 3\nadd\nprint\nhalt");
//! ```
//!
//! ## Crates
//!
//! - `fool-core`: types, symbol entries, diagnostics
//! - `fool-ast`: syntax tree and [`ast::AstBuilder`]
//! - `fool-registry`: class virtual tables and superclass links
//! - `fool-compiler`: the passes and the instruction set

use std::fmt;

use tracing::debug;

pub use fool_ast as ast;
pub use fool_ast::BinaryOp;
pub use fool_compiler::{
    CodeChunk, CompilationContext, CompileError, Instruction, Label, LabelKind, TypeRels,
};
pub use fool_core::{ArrowType, BindingError, ClassType, Span, SymbolEntry, Type, TypeError};
pub use fool_registry::ClassRegistry;

use fool_ast::Program;
use fool_compiler::{CodeGenerator, CodegenOptions, DEFAULT_HEAP_SIZE, SymbolTablePass, TypeCheckPass};

/// Compiler settings.
///
/// ```
/// use fool::CompilerOptions;
///
/// let options = CompilerOptions::new().with_heap_size(2048).with_debug(true);
/// assert_eq!(options.heap_size(), 2048);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerOptions {
    heap_size: i32,
    debug: bool,
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self {
            heap_size: DEFAULT_HEAP_SIZE,
            debug: false,
        }
    }

    /// Memory size of the target machine, in words.
    pub fn with_heap_size(mut self, heap_size: i32) -> Self {
        self.heap_size = heap_size;
        self
    }

    /// Annotate the listing with comments naming classes, methods and calls.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn heap_size(&self) -> i32 {
        self.heap_size
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    fn codegen(&self) -> CodegenOptions {
        CodegenOptions {
            heap_size: self.heap_size,
            debug: self.debug,
        }
    }
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// The output of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    code: CodeChunk,
    program_type: Type,
}

impl CompiledProgram {
    /// Generated code.
    pub fn code(&self) -> &CodeChunk {
        &self.code
    }

    /// Type of the program's body.
    pub fn program_type(&self) -> &Type {
        &self.program_type
    }

    /// Newline-joined listing for the stack machine.
    pub fn listing(&self) -> String {
        self.code.to_string()
    }
}

impl fmt::Display for CompiledProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Runs the passes over a program.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Run both semantic passes, returning the populated context.
    ///
    /// Both passes always run; the type checker skips whatever the symbol
    /// table pass could not bind.
    pub fn check(&self, program: &Program<'_>) -> Result<(CompilationContext, Type), CompileError> {
        let mut ctx = CompilationContext::new();

        let symbols = SymbolTablePass::new(&mut ctx).run(program);
        let types = TypeCheckPass::new(&ctx).run(program);

        debug!(
            binding_errors = symbols.errors.len(),
            type_errors = types.errors.len(),
            "semantic analysis finished"
        );

        match types.program_type {
            Some(ty) if symbols.errors.is_empty() && types.errors.is_empty() => Ok((ctx, ty)),
            _ => Err(CompileError::Semantic {
                binding_errors: symbols.errors,
                type_errors: types.errors,
            }),
        }
    }

    /// Check and generate code for a program.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(&self, program: &Program<'_>) -> Result<CompiledProgram, CompileError> {
        let (ctx, program_type) = self.check(program)?;
        let code = CodeGenerator::new(&ctx, self.options.codegen()).generate(program);
        Ok(CompiledProgram { code, program_type })
    }
}
