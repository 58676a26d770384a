//! Diagnostics for the semantic passes.
//!
//! ## Error Hierarchy
//!
//! ```text
//! BindingError - symbol table errors, collected, never abort the pass
//! TypeError    - type checking errors, raised and caught at the nearest
//!                declaration or class member boundary
//! └── Incomplete - not an error: the node lacks the bindings needed to
//!                  check it and is skipped silently
//! ```
//!
//! Both error kinds render as `"<Kind> error: <description>, line <n>"`.

use std::fmt;

use thiserror::Error;

use crate::Span;

/// What kind of declaration or use a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Variable,
    Parameter,
    Class,
    Field,
    Method,
    /// An identifier used as the receiver of a method call.
    Object,
    /// An identifier used as a value (variable or parameter).
    Value,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Variable => "variable",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Class => "class",
            SymbolKind::Field => "field",
            SymbolKind::Method => "method",
            SymbolKind::Object => "object",
            SymbolKind::Value => "variable or parameter",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Binding Errors
// ============================================================================

/// Errors found while building the symbol table.
///
/// All of them are non-fatal: the pass records the error and keeps going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingError {
    /// A name was declared twice in the same scope.
    #[error("Binding error: {kind} '{name}' already declared, line {}", .span.line)]
    Duplicate {
        kind: SymbolKind,
        name: String,
        span: Span,
    },

    /// A name could not be resolved in any enclosing scope.
    #[error("Binding error: {kind} '{name}' not declared, line {}", .span.line)]
    Undeclared {
        kind: SymbolKind,
        name: String,
        span: Span,
    },

    /// A class extends a class that has not been declared before it.
    #[error("Binding error: superclass '{superclass}' of class '{class}' not declared, line {}", .span.line)]
    SuperclassNotDeclared {
        class: String,
        superclass: String,
        span: Span,
    },

    /// `new` names a class that does not exist.
    #[error("Binding error: class '{name}' not declared, line {}", .span.line)]
    ClassNotDeclared { name: String, span: Span },

    /// A method call names a member the receiver's class does not have.
    #[error("Binding error: method '{method}' not declared in class '{class}', line {}", .span.line)]
    MethodNotDeclared {
        class: String,
        method: String,
        span: Span,
    },

    /// A field reuses the name of an inherited method.
    #[error("Binding error: field '{class}.{field}' cannot override a method, line {}", .span.line)]
    FieldOverridesMethod {
        class: String,
        field: String,
        span: Span,
    },

    /// A method reuses the name of an inherited field.
    #[error("Binding error: method '{class}.{method}' cannot override a field, line {}", .span.line)]
    MethodOverridesField {
        class: String,
        method: String,
        span: Span,
    },
}

impl BindingError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            BindingError::Duplicate { span, .. } => *span,
            BindingError::Undeclared { span, .. } => *span,
            BindingError::SuperclassNotDeclared { span, .. } => *span,
            BindingError::ClassNotDeclared { span, .. } => *span,
            BindingError::MethodNotDeclared { span, .. } => *span,
            BindingError::FieldOverridesMethod { span, .. } => *span,
            BindingError::MethodOverridesField { span, .. } => *span,
        }
    }
}

// ============================================================================
// Type Errors
// ============================================================================

/// Errors raised by the type checker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    /// An arithmetic or relational operand is not an integer.
    #[error("Type error: non integers in {op}, line {}", .span.line)]
    NonIntegerOperand { op: &'static str, span: Span },

    /// A logical operand is not a boolean.
    #[error("Type error: non boolean in {op}, line {}", .span.line)]
    NonBooleanOperand { op: &'static str, span: Span },

    /// The operands of `==` are unrelated.
    #[error("Type error: incompatible types in equal, line {}", .span.line)]
    IncompatibleEqual { span: Span },

    /// The condition of an `if` is not a boolean.
    #[error("Type error: non boolean condition in if, line {}", .span.line)]
    NonBooleanCondition { span: Span },

    /// The branches of an `if` have no common supertype.
    #[error("Type error: incompatible types in then-else branches, line {}", .span.line)]
    IncompatibleBranches { span: Span },

    /// A call names something that is not a function.
    #[error("Type error: invocation of a non-function '{name}', line {}", .span.line)]
    NotAFunction { name: String, span: Span },

    /// A method call names a member that is not a method.
    #[error("Type error: invocation of a non-method '{name}', line {}", .span.line)]
    NotAMethod { name: String, span: Span },

    /// A method call's receiver is not an object reference.
    #[error("Type error: invocation of method '{method}' on non-reference '{receiver}', line {}", .span.line)]
    NotAReference {
        receiver: String,
        method: String,
        span: Span,
    },

    /// `new` names something that is not a class.
    #[error("Type error: instantiation of non-class '{name}', line {}", .span.line)]
    NotAClass { name: String, span: Span },

    /// A call or `new` passes the wrong number of arguments.
    #[error("Type error: wrong number of parameters in the invocation of '{name}' (expected {expected}, found {found}), line {}", .span.line)]
    WrongArgumentCount {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// An argument is not a subtype of the matching formal.
    #[error("Type error: wrong type for {position}-th parameter in the invocation of '{name}', line {}", .span.line)]
    WrongArgumentType {
        name: String,
        /// 1-based position of the offending argument.
        position: usize,
        span: Span,
    },

    /// A function, method or class name is used as a value.
    #[error("Type error: wrong usage of function identifier '{name}', line {}", .span.line)]
    FunctionAsValue { name: String, span: Span },

    /// A function body does not produce its declared return type.
    #[error("Type error: wrong return type for function '{name}', line {}", .span.line)]
    WrongReturnType { name: String, span: Span },

    /// A variable initializer does not match the declared type.
    #[error("Type error: incompatible value for variable '{name}', line {}", .span.line)]
    IncompatibleValue { name: String, span: Span },

    /// An overriding field's type is not a subtype of the inherited one.
    #[error("Type error: invalid field override of '{class}.{field}', line {}", .span.line)]
    InvalidFieldOverride {
        class: String,
        field: String,
        span: Span,
    },

    /// An overriding method's signature is not compatible with the inherited one.
    #[error("Type error: invalid method override of '{class}.{method}', line {}", .span.line)]
    InvalidMethodOverride {
        class: String,
        method: String,
        span: Span,
    },

    /// The node is missing bindings the symbol table pass could not attach.
    ///
    /// Never reported: the binding error that caused it already was.
    #[error("incomplete type")]
    Incomplete,
}

impl TypeError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Option<Span> {
        match self {
            TypeError::NonIntegerOperand { span, .. } => Some(*span),
            TypeError::NonBooleanOperand { span, .. } => Some(*span),
            TypeError::IncompatibleEqual { span } => Some(*span),
            TypeError::NonBooleanCondition { span } => Some(*span),
            TypeError::IncompatibleBranches { span } => Some(*span),
            TypeError::NotAFunction { span, .. } => Some(*span),
            TypeError::NotAMethod { span, .. } => Some(*span),
            TypeError::NotAReference { span, .. } => Some(*span),
            TypeError::NotAClass { span, .. } => Some(*span),
            TypeError::WrongArgumentCount { span, .. } => Some(*span),
            TypeError::WrongArgumentType { span, .. } => Some(*span),
            TypeError::FunctionAsValue { span, .. } => Some(*span),
            TypeError::WrongReturnType { span, .. } => Some(*span),
            TypeError::IncompatibleValue { span, .. } => Some(*span),
            TypeError::InvalidFieldOverride { span, .. } => Some(*span),
            TypeError::InvalidMethodOverride { span, .. } => Some(*span),
            TypeError::Incomplete => None,
        }
    }

    /// Whether this is the silent incomplete-type signal.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, TypeError::Incomplete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_error_format() {
        let err = BindingError::Duplicate {
            kind: SymbolKind::Field,
            name: "balance".into(),
            span: Span::line(4),
        };
        assert_eq!(
            err.to_string(),
            "Binding error: field 'balance' already declared, line 4"
        );
        assert_eq!(err.span(), Span::line(4));
    }

    #[test]
    fn type_error_format() {
        let err = TypeError::WrongArgumentType {
            name: "f".into(),
            position: 2,
            span: Span::new(9, 3),
        };
        assert_eq!(
            err.to_string(),
            "Type error: wrong type for 2-th parameter in the invocation of 'f', line 9"
        );
    }

    #[test]
    fn incomplete_has_no_span() {
        assert!(TypeError::Incomplete.is_incomplete());
        assert!(TypeError::Incomplete.span().is_none());
        assert!(!TypeError::IncompatibleEqual { span: Span::line(1) }.is_incomplete());
    }
}
