// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # bamboo - schema definitions for distributed classes
//!
//! A [`Module`] holds the schema of a distributed application: numeric types
//! with divisors, moduli and ranges, arrays, structs, classes with multiple
//! inheritance, methods, keywords and imports. Values of those types travel
//! in [`Datagram`]s using a compact little-endian wire format.
//!
//! ## Quick Start
//!
//! ```rust
//! use bamboo::{Datagram, DatagramIterator, Field, Module, TypeRef, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut module = Module::new();
//!     let avatar = module.add_class("Avatar")?;
//!     module.add_field(avatar, Field::new("name", TypeRef::STRING).with_keyword("required"))?;
//!     module.add_field(avatar, Field::new("hp", TypeRef::UINT16))?;
//!
//!     let mut dg = Datagram::new();
//!     let value = Value::Struct(vec![Value::from("Flippy"), Value::Uint(100)]);
//!     dg.add_value(&module, avatar, &value)?;
//!
//!     let mut it = DatagramIterator::new(&dg);
//!     assert_eq!(it.read_value(&module, avatar)?, value);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules Overview
//!
//! - [`module`] - Schema registry and type descriptions (start here)
//! - [`wire`] - Datagram writer and bounds-checked reader
//! - [`value`] - Structured values, defaults and validation
//! - [`hash`] - Legacy dcparser hash and MD5 fingerprint
//! - [`config`] - Size tag width and datagram limits
//!
//! ## Features
//!
//! - `sizetag32`: 32-bit size tags instead of 16-bit ones
//! - `fingerprint` (default): [`hash::fingerprint`], using `md-5`
//! - `serde`: `Serialize`/`Deserialize` for [`DatagramConfig`]
//! - `config-loaders`: load [`DatagramConfig`] from YAML

/// Wire constants and datagram limits.
pub mod config;
/// Error types shared across the crate.
pub mod error;
/// Schema hashes (legacy dcparser hash, MD5 fingerprint).
pub mod hash;
/// Schema registry: types, fields, classes, methods, imports.
pub mod module;
/// Structured values and their packed form.
pub mod value;
/// Little-endian datagram codec.
pub mod wire;

pub use config::DatagramConfig;
pub use error::{Error, IndexError, Result, SchemaError};
pub use hash::legacy_hash;
pub use module::{
    Array, Class, Field, FieldId, Import, KeywordList, Method, Module, Number, NumberKind, Numeric,
    NumericRange, Parameter, Struct, Subtype, Type, TypeKind, TypeRef,
};
pub use value::{Value, ValueError};
pub use wire::{Datagram, DatagramError, DatagramIterator};
