// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types shared across the crate.
//!
//! Lookups by name or id return `Option`; only positional accessors
//! (`nth_*`) report [`IndexError`], and only mutations report [`SchemaError`].

use crate::value::ValueError;
use crate::wire::DatagramError;
use std::fmt;

/// A schema mutation was rejected. The module is left unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Another type, typedef, field or parameter already uses this name.
    NameConflict { name: String },
    /// Structs, classes, typedefs and class fields need a name.
    EmptyName,
    /// Divisors must be at least one.
    InvalidDivisor,
    /// The modulus is not positive or does not fit the numeric subtype.
    InvalidModulus { modulus: f64 },
    /// The range kind or bounds do not fit the numeric subtype.
    InvalidRange { reason: String },
    /// Adding this parent would make a class its own ancestor.
    InheritanceCycle { class: String, parent: String },
    /// The parent is already an ancestor of the class.
    DuplicateParent { class: String, parent: String },
    /// Two distinct fields with the same id would be visible in one class.
    FieldIdConflict { class: String, id: u32 },
    /// The type cannot be used in this position.
    InvalidType { reason: String },
    /// A handle does not refer to anything in this module.
    UnknownHandle { what: &'static str, index: usize },
    /// All atomic fields of a molecular must carry the same keywords.
    KeywordMismatch { field: String },
    /// The default value does not match the slot's type.
    InvalidDefault(ValueError),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::NameConflict { name } => write!(f, "name '{}' is already in use", name),
            SchemaError::EmptyName => write!(f, "name must not be empty"),
            SchemaError::InvalidDivisor => write!(f, "divisor must be at least 1"),
            SchemaError::InvalidModulus { modulus } => {
                write!(f, "modulus {} is not valid for this type", modulus)
            }
            SchemaError::InvalidRange { reason } => write!(f, "invalid range: {}", reason),
            SchemaError::InheritanceCycle { class, parent } => write!(
                f,
                "class '{}' cannot inherit from '{}': inheritance cycle",
                class, parent
            ),
            SchemaError::DuplicateParent { class, parent } => {
                write!(f, "'{}' is already an ancestor of '{}'", parent, class)
            }
            SchemaError::FieldIdConflict { class, id } => {
                write!(f, "field id {} is defined twice in class '{}'", id, class)
            }
            SchemaError::InvalidType { reason } => write!(f, "invalid type: {}", reason),
            SchemaError::UnknownHandle { what, index } => {
                write!(f, "unknown {} handle {}", what, index)
            }
            SchemaError::KeywordMismatch { field } => write!(
                f,
                "field '{}' has different keywords than the molecular's other fields",
                field
            ),
            SchemaError::InvalidDefault(e) => write!(f, "invalid default value: {}", e),
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchemaError::InvalidDefault(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValueError> for SchemaError {
    fn from(e: ValueError) -> Self {
        SchemaError::InvalidDefault(e)
    }
}

/// A positional accessor was called with an index past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexError {
    /// What was being indexed (e.g. "field", "class").
    pub what: &'static str,
    pub index: usize,
    pub len: usize,
}

impl IndexError {
    pub(crate) fn new(what: &'static str, index: usize, len: usize) -> Self {
        Self { what, index, len }
    }

    /// Index into `items`, reporting an `IndexError` on a bad position.
    pub(crate) fn get<'a, T>(what: &'static str, items: &'a [T], index: usize) -> std::result::Result<&'a T, Self> {
        items.get(index).ok_or(Self::new(what, index, items.len()))
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} index {} out of range (len {})",
            self.what, self.index, self.len
        )
    }
}

impl std::error::Error for IndexError {}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Schema(SchemaError),
    Index(IndexError),
    Datagram(DatagramError),
    Value(ValueError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Schema(e) => write!(f, "schema error: {}", e),
            Error::Index(e) => write!(f, "index error: {}", e),
            Error::Datagram(e) => write!(f, "datagram error: {}", e),
            Error::Value(e) => write!(f, "value error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Schema(e) => Some(e),
            Error::Index(e) => Some(e),
            Error::Datagram(e) => Some(e),
            Error::Value(e) => Some(e),
        }
    }
}

impl From<SchemaError> for Error {
    fn from(e: SchemaError) -> Self {
        Error::Schema(e)
    }
}

impl From<IndexError> for Error {
    fn from(e: IndexError) -> Self {
        Error::Index(e)
    }
}

impl From<DatagramError> for Error {
    fn from(e: DatagramError) -> Self {
        Error::Datagram(e)
    }
}

impl From<ValueError> for Error {
    fn from(e: ValueError) -> Self {
        Error::Value(e)
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
