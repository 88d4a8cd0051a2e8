//! The canonical primitive type enum.
//!
//! One closed [`TypeInfo`] is shared by the lexer keyword table, the AST, the
//! verifier, and codegen, so there is never a conversion between competing
//! type enumerations. `Invalid` exists only for unresolved or erroneous
//! expressions and must never reach codegen.

use std::fmt;

/// A scar primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeInfo {
    /// Unresolved or erroneous. Verifier-internal only.
    Invalid,
    Void,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    Str,
}

impl TypeInfo {
    pub fn is_signed_integer(self) -> bool {
        matches!(self, TypeInfo::I8 | TypeInfo::I16 | TypeInfo::I32 | TypeInfo::I64)
    }

    pub fn is_unsigned_integer(self) -> bool {
        matches!(self, TypeInfo::U8 | TypeInfo::U16 | TypeInfo::U32 | TypeInfo::U64)
    }

    pub fn is_integer(self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    pub fn is_float(self) -> bool {
        matches!(self, TypeInfo::F32 | TypeInfo::F64)
    }

    /// Integer or float.
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Width in bits for numeric and bool/char types, 0 otherwise.
    pub fn bit_width(self) -> u32 {
        match self {
            TypeInfo::Bool => 1,
            TypeInfo::I8 | TypeInfo::U8 => 8,
            TypeInfo::I16 | TypeInfo::U16 => 16,
            TypeInfo::I32 | TypeInfo::U32 | TypeInfo::F32 | TypeInfo::Char => 32,
            TypeInfo::I64 | TypeInfo::U64 | TypeInfo::F64 => 64,
            TypeInfo::Invalid | TypeInfo::Void | TypeInfo::Str => 0,
        }
    }

    /// True if `self` and `other` are both integers or both floats.
    pub fn same_base_category(self, other: TypeInfo) -> bool {
        (self.is_integer() && other.is_integer()) || (self.is_float() && other.is_float())
    }

    /// The wider of two same-base-category types.
    ///
    /// Ties go to `self`, so `i32` vs `u32` keeps the left operand's
    /// signedness.
    pub fn larger(self, other: TypeInfo) -> TypeInfo {
        debug_assert!(self.same_base_category(other));
        if other.bit_width() > self.bit_width() {
            other
        } else {
            self
        }
    }

    /// Source-level spelling of the type.
    pub fn name(self) -> &'static str {
        match self {
            TypeInfo::Invalid => "<invalid>",
            TypeInfo::Void => "void",
            TypeInfo::Bool => "bool",
            TypeInfo::I8 => "i8",
            TypeInfo::I16 => "i16",
            TypeInfo::I32 => "i32",
            TypeInfo::I64 => "i64",
            TypeInfo::U8 => "u8",
            TypeInfo::U16 => "u16",
            TypeInfo::U32 => "u32",
            TypeInfo::U64 => "u64",
            TypeInfo::F32 => "f32",
            TypeInfo::F64 => "f64",
            TypeInfo::Char => "char",
            TypeInfo::Str => "str",
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(TypeInfo::I8.is_signed_integer());
        assert!(TypeInfo::U64.is_unsigned_integer());
        assert!(TypeInfo::F32.is_float());
        assert!(!TypeInfo::Bool.is_numeric());
        assert!(!TypeInfo::Str.is_numeric());
    }

    #[test]
    fn test_larger_same_category() {
        assert_eq!(TypeInfo::I8.larger(TypeInfo::I32), TypeInfo::I32);
        assert_eq!(TypeInfo::U64.larger(TypeInfo::U16), TypeInfo::U64);
        assert_eq!(TypeInfo::F32.larger(TypeInfo::F64), TypeInfo::F64);
        // Tie keeps the left operand's signedness.
        assert_eq!(TypeInfo::I32.larger(TypeInfo::U32), TypeInfo::I32);
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeInfo::I32.to_string(), "i32");
        assert_eq!(TypeInfo::Void.to_string(), "void");
    }
}
