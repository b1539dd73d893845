// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structured values and their conversion to and from the wire format.
//!
//! A [`Value`] is interpreted against a type from a [`crate::Module`]:
//! [`crate::Datagram::add_value`] packs it, and
//! [`crate::DatagramIterator::read_value`] unpacks it. Integer types with a
//! divisor greater than one read back as [`Value::Float`] in real units.

mod default;
mod pack;

use crate::module::{Number, NumericRange, Subtype};
use crate::wire::DatagramError;
use std::fmt;

/// A value of any schema type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Packs into any integer type as 0 or 1.
    Bool(bool),
    Char(u8),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Blob(Vec<u8>),
    /// Elements of a general array.
    Array(Vec<Value>),
    /// Values of a struct's or class's fields, in wire order.
    Struct(Vec<Value>),
    /// Arguments of a method, in order.
    Method(Vec<Value>),
}

impl Value {
    /// Short name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Blob(_) => "blob",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
            Value::Method(_) => "method",
        }
    }

    /// The numeric payload of a scalar value.
    pub fn as_number(&self) -> Option<Number> {
        match *self {
            Value::Bool(b) => Some(Number::Unsigned(u64::from(b))),
            Value::Char(c) => Some(Number::Unsigned(u64::from(c))),
            Value::Int(v) => Some(Number::Signed(v)),
            Value::Uint(v) => Some(Number::Unsigned(v)),
            Value::Float(v) => Some(Number::Floating(v)),
            _ => None,
        }
    }
}

macro_rules! impl_value_from {
    ($variant:ident, $($type:ty),+) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Value::$variant(v.into())
                }
            }
        )+
    };
}

impl_value_from!(Bool, bool);
impl_value_from!(Int, i8, i16, i32, i64);
impl_value_from!(Uint, u8, u16, u32, u64);
impl_value_from!(Float, f32, f64);
impl_value_from!(String, String, &str);
impl_value_from!(Blob, Vec<u8>, &[u8]);

/// A value does not fit the type it is packed against, or bytes do not
/// decode as the expected type.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueError {
    TypeMismatch { expected: Subtype, found: &'static str },
    /// An array or composite has the wrong number of elements.
    LengthMismatch { expected: NumericRange, found: usize },
    /// A number is outside the type's domain, range or modulus.
    OutOfRange { value: Number, subtype: Subtype },
    /// The type cannot hold values (the invalid type, or a bad handle).
    UnsupportedType { subtype: Subtype },
    /// Bytes were left over after decoding one value.
    TrailingData { remaining: usize },
    Datagram(DatagramError),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::TypeMismatch { expected, found } => {
                write!(f, "expected a value for {}, found {}", expected, found)
            }
            ValueError::LengthMismatch { expected, found } => {
                write!(f, "length {} is outside {}", found, expected)
            }
            ValueError::OutOfRange { value, subtype } => {
                write!(f, "value {} is out of range for {}", value, subtype)
            }
            ValueError::UnsupportedType { subtype } => {
                write!(f, "{} types cannot hold values", subtype)
            }
            ValueError::TrailingData { remaining } => {
                write!(f, "{} bytes left after the value", remaining)
            }
            ValueError::Datagram(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ValueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ValueError::Datagram(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DatagramError> for ValueError {
    fn from(e: DatagramError) -> Self {
        ValueError::Datagram(e)
    }
}
