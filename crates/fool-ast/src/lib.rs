//! Abstract Syntax Tree (AST) for FOOL.
//!
//! This crate provides:
//! - AST node definitions for programs, declarations and expressions
//! - Type annotations ([`TypeExpr`]) and their lowering to semantic types
//! - [`AstBuilder`] for producing arena-allocated trees
//!
//! All nodes borrow from a [`bumpalo::Bump`] arena and are `Copy`. Nodes
//! that bindings attach to carry a [`NodeId`]; the compiler keeps the
//! bindings in side tables keyed by it, so the tree is never mutated after
//! construction.

mod builder;
pub mod decl;
pub mod expr;
mod node;
pub mod ops;
pub mod types;

pub use builder::AstBuilder;
pub use decl::*;
pub use expr::*;
pub use node::{Ident, NodeId};
pub use ops::BinaryOp;
pub use types::{ArrowTypeExpr, TypeExpr};
