//! Lexical scope management for the symbol table pass.
//!
//! This module provides [`ScopeStack`], the stack of name -> binding maps
//! the symbol table pass keeps while walking the tree. It handles:
//! - One scope per nesting level (program, function body, class members)
//! - Duplicate detection within a single scope
//! - Innermost-first lookup through the enclosing scopes

use fool_core::SymbolEntry;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Names declared in one scope.
pub type Scope = FxHashMap<String, SymbolEntry>;

/// Stack of lexical scopes; the innermost scope is last.
///
/// The index of a scope in the stack is its nesting level, so the
/// outermost (program) scope is level 0.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Scope Management
    // ==========================================================================

    /// Enter a new empty scope.
    pub fn push_scope(&mut self) {
        self.push_table(Scope::default());
    }

    /// Enter a scope pre-populated with `table` (a class's inherited members).
    pub fn push_table(&mut self, table: Scope) {
        self.scopes.push(table);
        trace!(level = self.nesting_level(), "enter scope");
    }

    /// Exit the innermost scope, returning its bindings.
    pub fn pop_scope(&mut self) -> Option<Scope> {
        let level = self.nesting_level();
        let scope = self.scopes.pop();
        trace!(level, "exit scope");
        scope
    }

    /// Nesting level of the innermost scope (0 when no scope is open).
    pub fn nesting_level(&self) -> u32 {
        self.scopes.len().saturating_sub(1) as u32
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    // ==========================================================================
    // Declaration and Lookup
    // ==========================================================================

    /// Declare `name` in the innermost scope.
    ///
    /// The new binding always replaces an existing one; the previous binding
    /// from the same scope is returned so the caller can report a duplicate.
    /// Declaring with no open scope is a no-op.
    pub fn declare(&mut self, name: impl Into<String>, entry: SymbolEntry) -> Option<SymbolEntry> {
        self.scopes.last_mut()?.insert(name.into(), entry)
    }

    /// Look up `name` from the innermost scope outward.
    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Look up `name` in the innermost scope only.
    pub fn lookup_local(&self, name: &str) -> Option<&SymbolEntry> {
        self.scopes.last()?.get(name)
    }

    /// Look up `name` in the outermost (program) scope only.
    pub fn lookup_global(&self, name: &str) -> Option<&SymbolEntry> {
        self.scopes.first()?.get(name)
    }

    /// Replace the binding of `name` in the outermost scope, if present.
    pub fn update_global(&mut self, name: &str, entry: SymbolEntry) {
        if let Some(slot) = self.scopes.first_mut().and_then(|scope| scope.get_mut(name)) {
            *slot = entry;
        }
    }
}
