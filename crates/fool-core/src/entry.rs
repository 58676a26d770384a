//! Symbol table entries.

use crate::Type;

/// A resolved binding: where a declaration lives and what type it has.
///
/// The meaning of `offset` depends on the kind of declaration:
///
/// | Declaration            | Offset                                        |
/// |------------------------|-----------------------------------------------|
/// | parameter              | `1, 2, ...` above the frame's access link     |
/// | local (var/fun/class)  | `-2, -3, ...` below the return address        |
/// | field                  | `-1, -2, ...` below the object's dispatch word |
/// | method                 | `0, 1, ...` dispatch table slot                |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Nesting level of the scope that declared the name.
    pub nesting_level: u32,
    /// Declared type.
    pub ty: Type,
    /// Slot offset (see table above).
    pub offset: i32,
}

impl SymbolEntry {
    pub fn new(nesting_level: u32, ty: Type, offset: i32) -> Self {
        Self {
            nesting_level,
            ty,
            offset,
        }
    }

    /// Whether this entry is a method occupying a dispatch slot.
    pub fn is_method(&self) -> bool {
        matches!(self.ty, Type::Method(_))
    }
}
