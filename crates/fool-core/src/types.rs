//! Semantic types.
//!
//! [`Type`] is the closed set of types the checker computes and the symbol
//! table stores in every [`SymbolEntry`](crate::SymbolEntry):
//!
//! ```text
//! Type
//! ├── Int, Bool          - primitives (Bool <: Int)
//! ├── Arrow(ArrowType)   - function signature
//! ├── Method(ArrowType)  - method signature (lives in a dispatch slot)
//! ├── Ref(name)          - reference to an instance of a class
//! ├── Class(ClassType)   - the class itself: field and method slot layout
//! └── Empty              - type of `null`, bottom of the reference types
//! ```

use std::fmt;

/// A semantic type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Integer.
    Int,
    /// Boolean (0/1 at runtime, a subtype of `Int`).
    Bool,
    /// Function signature.
    Arrow(ArrowType),
    /// Reference to an object of the named class.
    Ref(String),
    /// Class declaration: slot-ordered field types and method signatures.
    Class(ClassType),
    /// Method signature.
    Method(ArrowType),
    /// Type of the `null` literal.
    Empty,
}

impl Type {
    /// Build an arrow type.
    pub fn arrow(params: Vec<Type>, ret: Type) -> Self {
        Type::Arrow(ArrowType::new(params, ret))
    }

    /// Build a method type.
    pub fn method(params: Vec<Type>, ret: Type) -> Self {
        Type::Method(ArrowType::new(params, ret))
    }

    /// Build a reference type.
    pub fn reference(class: impl Into<String>) -> Self {
        Type::Ref(class.into())
    }

    /// The signature of a function or method type.
    pub fn signature(&self) -> Option<&ArrowType> {
        match self {
            Type::Arrow(sig) | Type::Method(sig) => Some(sig),
            _ => None,
        }
    }

    /// The class name of a reference type.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Ref(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this is `Int` or `Bool`.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Int | Type::Bool)
    }

    /// Whether a value of this type is a plain value an identifier may denote.
    ///
    /// Function, method and class bindings are not values: they can only be
    /// called or instantiated.
    pub fn is_value(&self) -> bool {
        !matches!(self, Type::Arrow(_) | Type::Method(_) | Type::Class(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Arrow(sig) => write!(f, "{sig}"),
            Type::Method(sig) => write!(f, "method {sig}"),
            Type::Ref(name) => write!(f, "{name}"),
            Type::Class(class) => write!(
                f,
                "class({} fields, {} methods)",
                class.fields.len(),
                class.methods.len()
            ),
            Type::Empty => write!(f, "null"),
        }
    }
}

/// A function signature: ordered parameter types and a return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrowType {
    /// Parameter types in declaration order.
    pub params: Vec<Type>,
    /// Return type.
    pub ret: Box<Type>,
}

impl ArrowType {
    pub fn new(params: Vec<Type>, ret: Type) -> Self {
        Self {
            params,
            ret: Box::new(ret),
        }
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for ArrowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ") -> {}", self.ret)
    }
}

/// Slot layout of a class.
///
/// `fields[i]` is the type of the field at object offset `-(i + 1)`;
/// `methods[i]` is the signature in dispatch slot `i`. Inherited members come
/// first and keep the index their introducing class gave them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ClassType {
    /// Field types, slot-ordered.
    pub fields: Vec<Type>,
    /// Method signatures, dispatch-slot-ordered.
    pub methods: Vec<ArrowType>,
}

impl ClassType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot index of a field offset (`-1` is slot 0).
    pub fn field_slot(offset: i32) -> Option<usize> {
        if offset < 0 {
            Some((-offset - 1) as usize)
        } else {
            None
        }
    }

    /// Object offset of the field in slot `index`.
    pub fn field_offset(index: usize) -> i32 {
        -(index as i32) - 1
    }
}
