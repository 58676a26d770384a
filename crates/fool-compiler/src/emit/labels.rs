//! Fresh label allocation.
//!
//! Branch labels and function labels are numbered independently, each from
//! zero, so every label of one compilation is distinct.

use crate::bytecode::{Label, LabelKind};

/// Hands out fresh labels.
#[derive(Debug, Default)]
pub struct LabelGenerator {
    branches: u32,
    functions: u32,
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh branch target.
    pub fn fresh_label(&mut self) -> Label {
        let label = Label::new(LabelKind::Branch, self.branches);
        self.branches += 1;
        label
    }

    /// A fresh function or method entry point.
    pub fn fresh_function(&mut self) -> Label {
        let label = Label::new(LabelKind::Function, self.functions);
        self.functions += 1;
        label
    }

    /// Number of labels handed out so far.
    pub fn count(&self) -> u32 {
        self.branches + self.functions
    }
}
