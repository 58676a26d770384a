//! Instruction listing.
//!
//! A `CodeChunk` is an ordered run of [`Instruction`]s. The generator
//! builds one for the main program and one per function or method body,
//! then concatenates them; `Display` renders the final newline-joined
//! listing handed to the stack machine.

use std::fmt;

use super::Instruction;

/// An ordered sequence of instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeChunk {
    code: Vec<Instruction>,
}

impl CodeChunk {
    /// Create a new empty chunk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.code.push(instruction);
    }

    /// Append every instruction of `other`.
    pub fn append(&mut self, other: CodeChunk) {
        self.code.extend(other.code);
    }

    /// Get the instructions.
    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    /// Number of instructions, labels and comments included.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Number of instructions the machine executes.
    pub fn executable_len(&self) -> usize {
        self.code.iter().filter(|i| i.is_executable()).count()
    }
}

impl Extend<Instruction> for CodeChunk {
    fn extend<I: IntoIterator<Item = Instruction>>(&mut self, iter: I) {
        self.code.extend(iter);
    }
}

impl FromIterator<Instruction> for CodeChunk {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self {
            code: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for CodeChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instruction) in self.code.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{instruction}")?;
        }
        Ok(())
    }
}
