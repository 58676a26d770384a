//! FOOL Compiler
//!
//! Semantic analysis and code generation for FOOL programs, run as three
//! passes over an arena-allocated tree:
//!
//! - **Pass 1 (Symbol Table)**: resolve every name, lay out frames and
//!   classes, fill the side tables of the [`CompilationContext`]
//! - **Pass 2 (Type Check)**: check every expression and declaration,
//!   including override compatibility of class members
//! - **Pass 3 (Code Generation)**: emit stack machine code for a program
//!   that passed both checks
//!
//! ## Modules
//!
//! - [`bytecode`]: Instruction set and code chunks
//! - [`context`]: State shared by the passes
//! - [`emit`]: Code generator
//! - [`passes`]: Symbol table and type checking passes
//! - [`scope`]: Lexical scope stack
//! - [`symbols`]: Side tables of resolved bindings
//! - [`type_rels`]: Subtyping, override compatibility, joins

pub mod bytecode;
pub mod context;
pub mod emit;
pub mod passes;
pub mod scope;
pub mod symbols;
pub mod type_rels;

pub use bytecode::{CodeChunk, Instruction, Label, LabelKind};
pub use context::CompilationContext;
pub use emit::{CodeGenerator, CodegenOptions, DEFAULT_HEAP_SIZE};
pub use passes::{SymbolTableOutput, SymbolTablePass, TypeCheckOutput, TypeCheckPass};
pub use scope::{Scope, ScopeStack};
pub use symbols::{ClassInfo, SymbolTable, UseSite};
pub use type_rels::TypeRels;

pub use fool_core::{BindingError, TypeError};

use thiserror::Error;

/// Why a program produced no code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// Semantic analysis reported errors.
    #[error("compilation failed with {} error(s)", .binding_errors.len() + .type_errors.len())]
    Semantic {
        binding_errors: Vec<BindingError>,
        type_errors: Vec<TypeError>,
    },
}

impl CompileError {
    /// Total number of diagnostics.
    pub fn error_count(&self) -> usize {
        match self {
            CompileError::Semantic {
                binding_errors,
                type_errors,
            } => binding_errors.len() + type_errors.len(),
        }
    }

    /// Every diagnostic rendered as a message line, binding errors first.
    pub fn messages(&self) -> Vec<String> {
        match self {
            CompileError::Semantic {
                binding_errors,
                type_errors,
            } => binding_errors
                .iter()
                .map(ToString::to_string)
                .chain(type_errors.iter().map(ToString::to_string))
                .collect(),
        }
    }
}
