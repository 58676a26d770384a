//! Type annotations as written in declarations.

use fool_core::Type;

/// A type annotation.
///
/// Annotations are arena data; [`TypeExpr::to_type`] lowers them to the
/// owned [`Type`] the passes work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeExpr<'ast> {
    /// `int`
    Int,
    /// `bool`
    Bool,
    /// A class name used as a reference type.
    Ref(&'ast str),
    /// `(params) -> ret`
    Arrow(&'ast ArrowTypeExpr<'ast>),
}

/// A function type annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowTypeExpr<'ast> {
    pub params: &'ast [TypeExpr<'ast>],
    pub ret: TypeExpr<'ast>,
}

impl TypeExpr<'_> {
    /// Lower the annotation to a semantic type.
    pub fn to_type(&self) -> Type {
        match self {
            TypeExpr::Int => Type::Int,
            TypeExpr::Bool => Type::Bool,
            TypeExpr::Ref(class) => Type::reference(*class),
            TypeExpr::Arrow(arrow) => Type::arrow(
                arrow.params.iter().map(TypeExpr::to_type).collect(),
                arrow.ret.to_type(),
            ),
        }
    }
}
