//! CompilationContext - state threaded through the passes.

use fool_registry::ClassRegistry;

use crate::symbols::SymbolTable;
use crate::type_rels::TypeRels;

/// Per-compilation state: the class registry and the binding side tables.
///
/// Created empty for each compilation. The symbol table pass fills it; the
/// type checker and the code generator only read it.
#[derive(Debug, Default)]
pub struct CompilationContext {
    classes: ClassRegistry,
    symbols: SymbolTable,
}

impl CompilationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    /// Type relations over this compilation's classes.
    pub fn type_rels(&self) -> TypeRels<'_> {
        TypeRels::new(&self.classes)
    }
}
