//! FOOL core crate.
//!
//! Data model shared by every compiler pass:
//!
//! - [`Span`]: source positions carried by AST nodes and diagnostics
//! - [`Type`], [`ArrowType`], [`ClassType`]: semantic types
//! - [`SymbolEntry`]: a resolved binding (nesting level, type, offset)
//! - [`BindingError`], [`TypeError`]: diagnostics of the semantic passes

mod entry;
mod error;
mod span;
mod types;

pub use entry::SymbolEntry;
pub use error::{BindingError, SymbolKind, TypeError};
pub use span::Span;
pub use types::{ArrowType, ClassType, Type};
