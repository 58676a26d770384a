//! Side tables of resolved bindings.
//!
//! The symbol table pass never touches the AST. Everything it resolves is
//! recorded here, keyed by the [`NodeId`] of the node it belongs to, and the
//! later passes read it back:
//!
//! | Table          | Keyed by                                   | Holds         |
//! |----------------|--------------------------------------------|---------------|
//! | declarations   | fun, var, param, field, method, class node | [`SymbolEntry`] |
//! | uses           | identifier, call, method call, `new` node  | [`UseSite`]   |
//! | methods        | method call node                           | [`SymbolEntry`] of the method |
//! | classes        | class node                                 | [`ClassInfo`] |

use fool_ast::NodeId;
use fool_core::{ClassType, SymbolEntry, Type};
use rustc_hash::{FxHashMap, FxHashSet};

/// A resolved use of a name.
#[derive(Debug, Clone, PartialEq)]
pub struct UseSite {
    /// Binding the name resolved to.
    pub entry: SymbolEntry,
    /// Nesting level at which the name is used.
    pub nesting_level: u32,
}

impl UseSite {
    pub fn new(entry: SymbolEntry, nesting_level: u32) -> Self {
        Self {
            entry,
            nesting_level,
        }
    }

    /// Number of access links to follow from the using frame to the
    /// declaring frame.
    pub fn hops(&self) -> u32 {
        self.nesting_level.saturating_sub(self.entry.nesting_level)
    }
}

/// What the symbol table pass learned about a class declaration.
#[derive(Debug, Clone, Default)]
pub struct ClassInfo {
    /// Class name.
    pub name: String,
    /// Final slot layout, inherited members included.
    pub ty: ClassType,
    /// Declared superclass, if it was resolved.
    pub superclass: Option<String>,
    /// Binding of the superclass declaration (its class type is the parent layout).
    pub super_entry: Option<SymbolEntry>,
    /// Own fields that reuse an inherited slot.
    pub overriding_fields: FxHashSet<NodeId>,
}

impl ClassInfo {
    /// Layout of the superclass, if any.
    pub fn parent_type(&self) -> Option<&ClassType> {
        match self.super_entry.as_ref().map(|entry| &entry.ty) {
            Some(Type::Class(parent)) => Some(parent),
            _ => None,
        }
    }

    pub fn is_override(&self, field: NodeId) -> bool {
        self.overriding_fields.contains(&field)
    }
}

/// Binding side tables for one compilation.
#[derive(Debug, Default)]
pub struct SymbolTable {
    declarations: FxHashMap<NodeId, SymbolEntry>,
    uses: FxHashMap<NodeId, UseSite>,
    methods: FxHashMap<NodeId, SymbolEntry>,
    classes: FxHashMap<NodeId, ClassInfo>,
    /// `new` sites naming a class whose layout is still being built.
    pending_new: FxHashMap<String, Vec<NodeId>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Recording
    // ==========================================================================

    /// Record the binding created by a declaration.
    pub fn declare(&mut self, node: NodeId, entry: SymbolEntry) {
        self.declarations.insert(node, entry);
    }

    /// Record the binding a use-site resolved to.
    pub fn bind_use(&mut self, node: NodeId, site: UseSite) {
        self.uses.insert(node, site);
    }

    /// Record the method a method call resolved to.
    pub fn bind_method(&mut self, node: NodeId, entry: SymbolEntry) {
        self.methods.insert(node, entry);
    }

    /// Record a class declaration's results.
    pub fn add_class(&mut self, node: NodeId, info: ClassInfo) {
        self.classes.insert(node, info);
    }

    /// Remember a `new` site whose class is still being elaborated.
    pub fn defer_new(&mut self, class: &str, node: NodeId) {
        self.pending_new
            .entry(class.to_string())
            .or_default()
            .push(node);
    }

    /// Give deferred `new` sites of `class` its final layout.
    pub fn finish_class(&mut self, class: &str, ty: &ClassType) {
        let Some(nodes) = self.pending_new.remove(class) else {
            return;
        };
        for node in nodes {
            if let Some(site) = self.uses.get_mut(&node) {
                site.entry.ty = Type::Class(ty.clone());
            }
        }
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    pub fn declaration(&self, node: NodeId) -> Option<&SymbolEntry> {
        self.declarations.get(&node)
    }

    pub fn use_site(&self, node: NodeId) -> Option<&UseSite> {
        self.uses.get(&node)
    }

    pub fn method(&self, node: NodeId) -> Option<&SymbolEntry> {
        self.methods.get(&node)
    }

    pub fn class(&self, node: NodeId) -> Option<&ClassInfo> {
        self.classes.get(&node)
    }

    /// Number of resolved use-sites.
    pub fn use_count(&self) -> usize {
        self.uses.len()
    }

    /// Number of recorded declarations.
    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }
}
