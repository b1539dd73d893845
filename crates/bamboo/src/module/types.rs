// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors stored in a [`crate::Module`]'s type table.

use super::array::Array;
use super::class::Class;
use super::method::Method;
use super::numeric::Numeric;
use super::structs::Struct;
use std::fmt;

/// Wire layout of a type. Used for dispatch instead of downcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subtype {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    /// Same layout as `Uint8`, printed as text.
    Char,
    Float32,
    Float64,

    /// Fixed-length text.
    String,
    /// Variable-length text, prefixed with a size tag.
    Varstring,
    /// Fixed-length binary data.
    Blob,
    /// Variable-length binary data, prefixed with a size tag.
    Varblob,
    /// Fixed element count with fixed-size elements.
    Array,
    /// Variable element count or variable-size elements, prefixed with a size tag.
    Vararray,

    Struct,
    Method,

    Invalid,
}

impl Subtype {
    pub fn is_numeric(&self) -> bool {
        self.numeric_width().is_some()
    }

    pub fn is_integer(&self) -> bool {
        self.is_numeric() && !self.is_floating()
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            Subtype::Int8 | Subtype::Int16 | Subtype::Int32 | Subtype::Int64
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Subtype::Float32 | Subtype::Float64)
    }

    /// True for strings, blobs and general arrays.
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Subtype::String
                | Subtype::Varstring
                | Subtype::Blob
                | Subtype::Varblob
                | Subtype::Array
                | Subtype::Vararray
        )
    }

    /// True for the variants that carry a size tag on the wire.
    pub fn is_variable_array(&self) -> bool {
        matches!(
            self,
            Subtype::Varstring | Subtype::Varblob | Subtype::Vararray
        )
    }

    /// Byte width of a numeric subtype.
    pub fn numeric_width(&self) -> Option<usize> {
        match self {
            Subtype::Int8 | Subtype::Uint8 | Subtype::Char => Some(1),
            Subtype::Int16 | Subtype::Uint16 => Some(2),
            Subtype::Int32 | Subtype::Uint32 | Subtype::Float32 => Some(4),
            Subtype::Int64 | Subtype::Uint64 | Subtype::Float64 => Some(8),
            _ => None,
        }
    }

    /// Inclusive integer domain of an integer subtype.
    pub(crate) fn integer_bounds(&self) -> Option<(i128, i128)> {
        match self {
            Subtype::Int8 => Some((i8::MIN.into(), i8::MAX.into())),
            Subtype::Int16 => Some((i16::MIN.into(), i16::MAX.into())),
            Subtype::Int32 => Some((i32::MIN.into(), i32::MAX.into())),
            Subtype::Int64 => Some((i64::MIN.into(), i64::MAX.into())),
            Subtype::Uint8 | Subtype::Char => Some((0, u8::MAX.into())),
            Subtype::Uint16 => Some((0, u16::MAX.into())),
            Subtype::Uint32 => Some((0, u32::MAX.into())),
            Subtype::Uint64 => Some((0, u64::MAX.into())),
            _ => None,
        }
    }
}

/// Lowercase schema name of a subtype.
pub fn format_subtype(subtype: Subtype) -> &'static str {
    match subtype {
        Subtype::Int8 => "int8",
        Subtype::Int16 => "int16",
        Subtype::Int32 => "int32",
        Subtype::Int64 => "int64",
        Subtype::Uint8 => "uint8",
        Subtype::Uint16 => "uint16",
        Subtype::Uint32 => "uint32",
        Subtype::Uint64 => "uint64",
        Subtype::Char => "char",
        Subtype::Float32 => "float32",
        Subtype::Float64 => "float64",
        Subtype::String => "string",
        Subtype::Varstring => "varstring",
        Subtype::Blob => "blob",
        Subtype::Varblob => "varblob",
        Subtype::Array => "array",
        Subtype::Vararray => "vararray",
        Subtype::Struct => "struct",
        Subtype::Method => "method",
        Subtype::Invalid => "invalid",
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(format_subtype(*self))
    }
}

/// Handle to a type in a module's type table.
///
/// Builtin types live at fixed handles in every module. Handles are only
/// meaningful for the module that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef(pub(crate) u32);

impl TypeRef {
    pub const INVALID: TypeRef = TypeRef(0);
    pub const CHAR: TypeRef = TypeRef(1);
    pub const INT8: TypeRef = TypeRef(2);
    pub const INT16: TypeRef = TypeRef(3);
    pub const INT32: TypeRef = TypeRef(4);
    pub const INT64: TypeRef = TypeRef(5);
    pub const UINT8: TypeRef = TypeRef(6);
    pub const UINT16: TypeRef = TypeRef(7);
    pub const UINT32: TypeRef = TypeRef(8);
    pub const UINT64: TypeRef = TypeRef(9);
    pub const FLOAT32: TypeRef = TypeRef(10);
    pub const FLOAT64: TypeRef = TypeRef(11);
    /// Unbounded `char[]`.
    pub const STRING: TypeRef = TypeRef(12);
    /// Unbounded `uint8[]`.
    pub const BLOB: TypeRef = TypeRef(13);

    pub(crate) const BUILTIN_COUNT: usize = 14;

    /// The unconstrained numeric builtins, in handle order.
    pub(crate) const NUMERIC_BUILTINS: [(TypeRef, Subtype); 11] = [
        (TypeRef::CHAR, Subtype::Char),
        (TypeRef::INT8, Subtype::Int8),
        (TypeRef::INT16, Subtype::Int16),
        (TypeRef::INT32, Subtype::Int32),
        (TypeRef::INT64, Subtype::Int64),
        (TypeRef::UINT8, Subtype::Uint8),
        (TypeRef::UINT16, Subtype::Uint16),
        (TypeRef::UINT32, Subtype::Uint32),
        (TypeRef::UINT64, Subtype::Uint64),
        (TypeRef::FLOAT32, Subtype::Float32),
        (TypeRef::FLOAT64, Subtype::Float64),
    ];

    /// Position in the type table.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_builtin(self) -> bool {
        self.index() < Self::BUILTIN_COUNT
    }

    /// Handle of the unconstrained builtin for a numeric subtype.
    pub fn builtin_numeric(subtype: Subtype) -> Option<TypeRef> {
        Self::NUMERIC_BUILTINS
            .iter()
            .find(|(_, s)| *s == subtype)
            .map(|(r, _)| *r)
    }
}

/// The variant data of a [`Type`].
#[derive(Debug, Clone)]
pub enum TypeKind {
    Invalid,
    Numeric(Numeric),
    Array(Array),
    Struct(Struct),
    Class(Class),
    Method(Method),
}

/// A type in the schema.
#[derive(Debug, Clone)]
pub struct Type {
    pub(crate) alias: Option<String>,
    pub(crate) kind: TypeKind,
}

impl Type {
    pub(crate) fn new(kind: TypeKind) -> Self {
        Self { alias: None, kind }
    }

    pub(crate) fn invalid() -> Self {
        Self::new(TypeKind::Invalid)
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn subtype(&self) -> Subtype {
        match &self.kind {
            TypeKind::Invalid => Subtype::Invalid,
            TypeKind::Numeric(n) => n.subtype(),
            TypeKind::Array(a) => a.subtype(),
            TypeKind::Struct(_) | TypeKind::Class(_) => Subtype::Struct,
            TypeKind::Method(_) => Subtype::Method,
        }
    }

    pub fn has_alias(&self) -> bool {
        self.alias.is_some()
    }

    /// The name this type was declared with through a typedef, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn as_numeric(&self) -> Option<&Numeric> {
        match &self.kind {
            TypeKind::Numeric(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match &self.kind {
            TypeKind::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Struct view of a struct or class.
    pub fn as_struct(&self) -> Option<&Struct> {
        match &self.kind {
            TypeKind::Struct(s) => Some(s),
            TypeKind::Class(c) => Some(c.as_struct()),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match &self.kind {
            TypeKind::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&Method> {
        match &self.kind {
            TypeKind::Method(m) => Some(m),
            _ => None,
        }
    }

    pub(crate) fn as_struct_mut(&mut self) -> Option<&mut Struct> {
        match &mut self.kind {
            TypeKind::Struct(s) => Some(s),
            TypeKind::Class(c) => Some(c.as_struct_mut()),
            _ => None,
        }
    }

    pub(crate) fn as_class_mut(&mut self) -> Option<&mut Class> {
        match &mut self.kind {
            TypeKind::Class(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn as_method_mut(&mut self) -> Option<&mut Method> {
        match &mut self.kind {
            TypeKind::Method(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtype_widths() {
        assert_eq!(Subtype::Char.numeric_width(), Some(1));
        assert_eq!(Subtype::Int16.numeric_width(), Some(2));
        assert_eq!(Subtype::Float32.numeric_width(), Some(4));
        assert_eq!(Subtype::Uint64.numeric_width(), Some(8));
        assert_eq!(Subtype::Varstring.numeric_width(), None);
    }

    #[test]
    fn test_subtype_families() {
        assert!(Subtype::Int8.is_signed());
        assert!(!Subtype::Uint8.is_signed());
        assert!(Subtype::Float64.is_floating());
        assert!(Subtype::Char.is_integer());
        assert!(Subtype::Varblob.is_variable_array());
        assert!(!Subtype::Blob.is_variable_array());
        assert!(Subtype::Blob.is_array());
        assert!(!Subtype::Struct.is_array());
    }

    #[test]
    fn test_builtin_handles() {
        assert_eq!(TypeRef::builtin_numeric(Subtype::Int16), Some(TypeRef::INT16));
        assert_eq!(TypeRef::builtin_numeric(Subtype::Struct), None);
        assert!(TypeRef::BLOB.is_builtin());
        assert!(!TypeRef(TypeRef::BUILTIN_COUNT as u32).is_builtin());
    }

    #[test]
    fn test_downcasts_on_invalid() {
        let ty = Type::invalid();
        assert_eq!(ty.subtype(), Subtype::Invalid);
        assert!(ty.as_numeric().is_none());
        assert!(ty.as_array().is_none());
        assert!(ty.as_struct().is_none());
        assert!(ty.as_method().is_none());
    }
}
