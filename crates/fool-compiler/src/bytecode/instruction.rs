//! Stack machine instructions.
//!
//! This module defines the instruction set of the target stack machine.
//! Every instruction renders to one line of the textual listing the
//! machine loads; operands follow the mnemonic separated by a space.

use std::fmt;

/// Namespace of a generated label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// Branch target inside an expression (`label<n>`).
    Branch,
    /// Entry point of a function or method body (`function<n>`).
    Function,
}

/// A code label, unique within one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label {
    kind: LabelKind,
    index: u32,
}

impl Label {
    pub fn new(kind: LabelKind, index: u32) -> Self {
        Self { kind, index }
    }

    pub fn kind(&self) -> LabelKind {
        self.kind
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LabelKind::Branch => write!(f, "label{}", self.index),
            LabelKind::Function => write!(f, "function{}", self.index),
        }
    }
}

/// One stack machine instruction.
///
/// Binary operations pop the right operand first: `push 7; push 2; sub`
/// leaves `5`. Conditional branches pop two values the same way and
/// compare `left` against `right`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    // =========================================================================
    // Stack
    // =========================================================================
    /// Push an integer.
    Push(i32),
    /// Push the code address of a label.
    PushLabel(Label),
    /// Discard the top of stack.
    Pop,

    // =========================================================================
    // Arithmetic
    // =========================================================================
    Add,
    Sub,
    Mult,
    Div,

    // =========================================================================
    // Control Flow
    // =========================================================================
    /// Branch if `left == right`.
    Beq(Label),
    /// Branch if `left <= right`.
    Bleq(Label),
    /// Branch unconditionally.
    Branch(Label),
    /// Pop an address, save the next instruction's address in `$ra`, jump.
    Js,
    /// Stop the machine.
    Halt,

    // =========================================================================
    // Memory
    // =========================================================================
    /// Pop an address, push the word stored there.
    Lw,
    /// Pop an address, pop a value, store the value there.
    Sw,

    // =========================================================================
    // Registers
    // =========================================================================
    /// `$fp = $sp`
    Cfp,
    /// Pop into `$fp`.
    Sfp,
    /// Push `$fp`.
    Lfp,
    /// Pop into `$ra`.
    Sra,
    /// Push `$ra`.
    Lra,
    /// Pop into `$tm`.
    Stm,
    /// Push `$tm`.
    Ltm,
    /// Push `$hp`.
    Lhp,
    /// Pop into `$hp`.
    Shp,

    // =========================================================================
    // Output and Annotations
    // =========================================================================
    /// Print the top of stack without popping it.
    Print,
    /// Define a label at this position.
    Label(Label),
    /// A `/* ... */` annotation the machine skips.
    Comment(String),
}

impl Instruction {
    /// Get the mnemonic of this instruction (empty for label definitions
    /// and comments).
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Push(_) | Instruction::PushLabel(_) => "push",
            Instruction::Pop => "pop",
            Instruction::Add => "add",
            Instruction::Sub => "sub",
            Instruction::Mult => "mult",
            Instruction::Div => "div",
            Instruction::Beq(_) => "beq",
            Instruction::Bleq(_) => "bleq",
            Instruction::Branch(_) => "b",
            Instruction::Js => "js",
            Instruction::Halt => "halt",
            Instruction::Lw => "lw",
            Instruction::Sw => "sw",
            Instruction::Cfp => "cfp",
            Instruction::Sfp => "sfp",
            Instruction::Lfp => "lfp",
            Instruction::Sra => "sra",
            Instruction::Lra => "lra",
            Instruction::Stm => "stm",
            Instruction::Ltm => "ltm",
            Instruction::Lhp => "lhp",
            Instruction::Shp => "shp",
            Instruction::Print => "print",
            Instruction::Label(_) | Instruction::Comment(_) => "",
        }
    }

    /// Whether the machine executes this line (labels and comments it skips).
    pub fn is_executable(&self) -> bool {
        !matches!(self, Instruction::Label(_) | Instruction::Comment(_))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(value) => write!(f, "push {value}"),
            Instruction::PushLabel(label)
            | Instruction::Beq(label)
            | Instruction::Bleq(label)
            | Instruction::Branch(label) => write!(f, "{} {label}", self.mnemonic()),
            Instruction::Label(label) => write!(f, "{label}:"),
            Instruction::Comment(text) => write!(f, "/* {text} */"),
            _ => f.write_str(self.mnemonic()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_names() {
        assert_eq!(Label::new(LabelKind::Branch, 3).to_string(), "label3");
        assert_eq!(Label::new(LabelKind::Function, 0).to_string(), "function0");
    }

    #[test]
    fn instruction_text() {
        let l = Label::new(LabelKind::Branch, 1);
        let f = Label::new(LabelKind::Function, 2);

        assert_eq!(Instruction::Push(-1).to_string(), "push -1");
        assert_eq!(Instruction::PushLabel(f).to_string(), "push function2");
        assert_eq!(Instruction::Bleq(l).to_string(), "bleq label1");
        assert_eq!(Instruction::Branch(l).to_string(), "b label1");
        assert_eq!(Instruction::Label(f).to_string(), "function2:");
        assert_eq!(Instruction::Mult.to_string(), "mult");
        assert_eq!(Instruction::Comment("class A".into()).to_string(), "/* class A */");
    }

    #[test]
    fn executable_lines() {
        let l = Label::new(LabelKind::Branch, 0);
        assert!(Instruction::Halt.is_executable());
        assert!(!Instruction::Label(l).is_executable());
        assert!(!Instruction::Comment(String::new()).is_executable());
    }
}
