//! ClassRegistry - per-compilation class tables.
//!
//! This module provides [`ClassRegistry`], the storage every pass consults
//! for class information. It holds two tables keyed by class name:
//!
//! - **Virtual tables**: name -> [`SymbolEntry`] for every field and method
//!   of the class, inherited members included. Fields carry negative object
//!   offsets, methods carry dispatch slots.
//! - **Superclass links**: class -> direct superclass (`None` for a root).
//!
//! # Lifecycle
//!
//! The registry is created empty for each compilation, filled by the symbol
//! table pass as classes are elaborated in source order, and only read after
//! that. A class is registered before its members are elaborated so that
//! calls on the class's own instances resolve inside its method bodies.
//!
//! # Example
//!
//! ```
//! use fool_core::{SymbolEntry, Type};
//! use fool_registry::{ClassRegistry, VirtualTable};
//!
//! let mut registry = ClassRegistry::new();
//! registry.register("Account", None, VirtualTable::default());
//! registry.insert_member("Account", "balance", SymbolEntry::new(1, Type::Int, -1));
//!
//! let inherited = registry.virtual_table("Account").cloned().unwrap_or_default();
//! registry.register("Savings", Some("Account".into()), inherited);
//! assert!(registry.member("Savings", "balance").is_some());
//! assert!(registry.is_ancestor("Savings", "Account"));
//! ```

use fool_core::SymbolEntry;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Compile-time virtual table: member name -> binding.
pub type VirtualTable = FxHashMap<String, SymbolEntry>;

/// Class tables shared by the compiler passes.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    /// Virtual table of each class.
    tables: FxHashMap<String, VirtualTable>,

    /// Direct superclass of each class.
    superclasses: FxHashMap<String, Option<String>>,
}

impl ClassRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a class with its starting virtual table.
    ///
    /// Re-registering a name replaces both its table and its superclass link.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        superclass: Option<String>,
        table: VirtualTable,
    ) {
        let name = name.into();
        debug!(class = %name, superclass = ?superclass, members = table.len(), "registering class");
        self.superclasses.insert(name.clone(), superclass);
        self.tables.insert(name, table);
    }

    /// Add or replace a member in a registered class's virtual table.
    ///
    /// Returns the previous binding, or `None` if the member is new or the
    /// class is not registered.
    pub fn insert_member(
        &mut self,
        class: &str,
        member: impl Into<String>,
        entry: SymbolEntry,
    ) -> Option<SymbolEntry> {
        self.tables
            .get_mut(class)
            .and_then(|table| table.insert(member.into(), entry))
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Check if a class is registered.
    pub fn contains(&self, class: &str) -> bool {
        self.tables.contains_key(class)
    }

    /// Get a class's virtual table.
    pub fn virtual_table(&self, class: &str) -> Option<&VirtualTable> {
        self.tables.get(class)
    }

    /// Look up a member binding of a class (own or inherited).
    pub fn member(&self, class: &str, member: &str) -> Option<&SymbolEntry> {
        self.tables.get(class)?.get(member)
    }

    /// Get the direct superclass of a class.
    pub fn superclass(&self, class: &str) -> Option<&str> {
        self.superclasses.get(class)?.as_deref()
    }

    /// Iterate over the proper ancestors of a class, nearest first.
    ///
    /// The walk stops after as many steps as there are registered classes,
    /// so a malformed cyclic chain cannot loop forever.
    pub fn ancestors<'a>(&'a self, class: &'a str) -> Ancestors<'a> {
        Ancestors {
            registry: self,
            current: class,
            remaining: self.superclasses.len(),
        }
    }

    /// Whether `ancestor` is `class` itself or one of its ancestors.
    pub fn is_ancestor(&self, class: &str, ancestor: &str) -> bool {
        class == ancestor || self.ancestors(class).any(|c| c == ancestor)
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no class has been registered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Iterator over a class's superclass chain.
pub struct Ancestors<'a> {
    registry: &'a ClassRegistry,
    current: &'a str,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let parent = self.registry.superclass(self.current)?;
        self.current = parent;
        Some(parent)
    }
}
