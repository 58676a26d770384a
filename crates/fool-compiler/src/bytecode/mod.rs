//! Target code types.
//!
//! - [`Instruction`] - The stack machine instruction set
//! - [`Label`] - Branch targets and function entry points
//! - [`CodeChunk`] - An instruction listing

mod chunk;
mod instruction;

pub use chunk::CodeChunk;
pub use instruction::{Instruction, Label, LabelKind};
