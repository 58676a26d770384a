//! Compiler passes.
//!
//! - [`symbol_table`]: Pass 1 - lay out frames and classes, resolve every name
//! - [`type_check`]: Pass 2 - type check declarations, expressions and overrides
//!
//! Code generation (Pass 3) lives in [`crate::emit`].

pub mod symbol_table;
pub mod type_check;

use fool_ast::FunDecl;
use fool_core::ArrowType;

pub use symbol_table::{SymbolTableOutput, SymbolTablePass};
pub use type_check::{TypeCheckOutput, TypeCheckPass};

/// Signature of a function or method declaration.
pub(crate) fn signature(fun: &FunDecl<'_>) -> ArrowType {
    ArrowType::new(
        fun.params.iter().map(|param| param.ty.to_type()).collect(),
        fun.ret.to_type(),
    )
}
