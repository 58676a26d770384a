//! FOOL class registry.
//!
//! Holds the per-class virtual tables and superclass links built by the
//! symbol table pass and consulted by type relations and code generation.

mod registry;

pub use registry::{Ancestors, ClassRegistry, VirtualTable};
