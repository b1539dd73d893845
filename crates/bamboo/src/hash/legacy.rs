// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Hash compatible with the legacy dcparser.
//!
//! The hash covers every struct and class in id order: names, parent ids,
//! declared fields, field keywords and the legacy type codes of field types.
//! Float32 fields, unbound methods and invalid types do not contribute.

use super::HashGenerator;
use crate::module::{Class, Field, KeywordList, Module, Numeric, NumericRange, Struct, Subtype, TypeKind, TypeRef};

// Legacy type codes.
const L_INT8: i32 = 0;
const L_INT16: i32 = 1;
const L_INT32: i32 = 2;
const L_INT64: i32 = 3;
const L_UINT8: i32 = 4;
const L_UINT16: i32 = 5;
const L_UINT32: i32 = 6;
const L_UINT64: i32 = 7;
const L_FLOAT64: i32 = 8;
const L_STRING: i32 = 9;
const L_BLOB: i32 = 10;
const L_CHAR: i32 = 19;

/// Keywords that hash as a bit set. Any other keyword switches the field to
/// hashing its keyword names.
const LEGACY_KEYWORDS: [(&str, i32); 9] = [
    ("required", 0x0001),
    ("broadcast", 0x0002),
    ("ownrecv", 0x0004),
    ("ram", 0x0008),
    ("db", 0x0010),
    ("clsend", 0x0020),
    ("clrecv", 0x0040),
    ("ownsend", 0x0080),
    ("airecv", 0x0100),
];

/// Compute the legacy hash of a module.
pub fn legacy_hash(module: &Module) -> u32 {
    let mut hasher = LegacyHasher {
        module,
        hashgen: HashGenerator::new(),
    };
    hasher.hash_module();
    hasher.hashgen.hash()
}

struct LegacyHasher<'m> {
    module: &'m Module,
    hashgen: HashGenerator,
}

impl<'m> LegacyHasher<'m> {
    fn hash_module(&mut self) {
        self.hashgen.add_int(1);
        self.hashgen
            .add_int((self.module.num_structs() + self.module.num_classes()) as i32);

        for id in 0..self.module.num_types() {
            let Some(ty) = self.module.type_by_id(id as u32) else {
                log::warn!("[legacy_hash] no type with id {}, hash is incomplete", id);
                return;
            };
            self.hash_composite(ty);
        }
    }

    fn hash_composite(&mut self, ty: TypeRef) {
        let Some(entry) = self.module.type_of(ty) else {
            return;
        };
        if let Some(cls) = entry.as_class() {
            self.hash_class(cls);
        } else if let Some(strct) = entry.as_struct() {
            self.hash_struct(strct);
        }
    }

    fn composite_id(&self, ty: TypeRef) -> i32 {
        self.module
            .type_of(ty)
            .and_then(|t| t.as_struct())
            .and_then(Struct::id)
            .map_or(-1, |id| id as i32)
    }

    fn hash_class(&mut self, cls: &'m Class) {
        self.hashgen.add_string(cls.name());
        self.hashgen.add_int(cls.num_parents() as i32);
        for &parent in cls.parents() {
            let id = self.composite_id(parent);
            self.hashgen.add_int(id);
        }

        if let Some(ctor) = cls.constructor() {
            self.hash_field(ctor);
        }

        self.hashgen.add_int(cls.num_base_fields() as i32);
        for &id in cls.base_fields() {
            if let Some(field) = self.module.field_by_id(id) {
                self.hash_field(field);
            }
        }
    }

    fn hash_struct(&mut self, strct: &'m Struct) {
        self.hashgen.add_string(strct.name());
        self.hashgen.add_int(1);
        self.hashgen.add_int(0);

        self.hashgen.add_int(strct.num_fields() as i32);
        for &id in strct.fields() {
            if let Some(field) = self.module.field_by_id(id) {
                self.hash_field(field);
            }
        }
    }

    fn hash_field(&mut self, field: &'m Field) {
        if let Some(atomics) = field.atomics() {
            self.hashgen.add_string(field.name());
            self.hashgen.add_int(field.id().value() as i32);
            self.hashgen.add_int(atomics.len() as i32);
            for &id in atomics {
                if let Some(atomic) = self.module.field_by_id(id) {
                    self.hash_field(atomic);
                }
            }
            return;
        }

        if let Some(method) = self.module.type_of(field.ty()).and_then(|t| t.as_method()) {
            self.hashgen.add_string(field.name());
            self.hashgen.add_int(field.id().value() as i32);
            self.hashgen.add_int(method.num_parameters() as i32);
            for param in method.parameters() {
                self.hash_type(param.ty());
            }
            self.hash_keywords(field.keywords());
            return;
        }

        if !field.keywords().is_empty() {
            self.hash_keywords(field.keywords());
        }
        self.hash_type(field.ty());
    }

    fn hash_keywords(&mut self, keywords: &KeywordList) {
        let mut flags = Some(0i32);
        for keyword in keywords.iter() {
            flags = flags.and_then(|acc| {
                LEGACY_KEYWORDS
                    .iter()
                    .find(|(name, _)| *name == keyword)
                    .map(|(_, flag)| acc | flag)
            });
        }

        match flags {
            Some(flags) => self.hashgen.add_int(flags),
            None => {
                self.hashgen.add_int(keywords.num_keywords() as i32);
                for keyword in keywords.sorted() {
                    self.hashgen.add_string(keyword);
                }
            }
        }
    }

    fn hash_count_range(&mut self, range: NumericRange) {
        if range.is_nan() {
            return;
        }
        self.hashgen.add_int(1);
        self.hashgen.add_int(range.min().as_u64() as i32);
        self.hashgen.add_int(range.max().as_u64() as i32);
    }

    fn hash_type(&mut self, ty: TypeRef) {
        let Some(entry) = self.module.type_of(ty) else {
            log::warn!("[legacy_hash] invalid type ignored");
            return;
        };
        match entry.kind() {
            TypeKind::Struct(_) | TypeKind::Class(_) => self.hash_composite(ty),
            TypeKind::Array(array) => match array.subtype() {
                Subtype::Blob | Subtype::Varblob => {
                    let code = if ty == TypeRef::BLOB || entry.alias() == Some("blob") {
                        L_BLOB
                    } else {
                        L_UINT8
                    };
                    self.hashgen.add_int(code);
                    self.hashgen.add_int(1);
                    self.hash_count_range(array.range());
                }
                Subtype::String | Subtype::Varstring => {
                    let code = if ty == TypeRef::STRING || entry.alias() == Some("string") {
                        L_STRING
                    } else {
                        L_CHAR
                    };
                    self.hashgen.add_int(code);
                    self.hashgen.add_int(1);
                    self.hash_count_range(array.range());
                }
                _ => {
                    self.hash_type(array.element_type());
                    self.hash_count_range(array.range());
                }
            },
            TypeKind::Numeric(numeric) => self.hash_numeric(numeric),
            TypeKind::Method(_) => log::warn!("[legacy_hash] unbound method ignored"),
            TypeKind::Invalid => log::warn!("[legacy_hash] invalid type ignored"),
        }
    }

    fn hash_numeric(&mut self, numeric: &Numeric) {
        let code = match numeric.subtype() {
            Subtype::Int8 => L_INT8,
            Subtype::Int16 => L_INT16,
            Subtype::Int32 => L_INT32,
            Subtype::Int64 => L_INT64,
            Subtype::Uint8 => L_UINT8,
            Subtype::Uint16 => L_UINT16,
            Subtype::Uint32 => L_UINT32,
            Subtype::Uint64 => L_UINT64,
            Subtype::Char => L_CHAR,
            Subtype::Float64 => {
                self.hash_float(numeric);
                return;
            }
            other => {
                log::warn!("[legacy_hash] {} ignored", other);
                return;
            }
        };
        self.hashgen.add_int(code);

        let divisor = f64::from(numeric.divisor());
        self.hashgen.add_int(numeric.divisor() as i32);
        if let Some(modulus) = numeric.modulus() {
            self.hashgen.add_int((modulus * divisor + 0.5).floor() as u32 as i32);
        }
        if numeric.has_range() {
            let range = numeric.range();
            self.hashgen.add_int(1);
            self.hashgen.add_int((range.min().as_f64() * divisor + 0.5).floor() as i32);
            self.hashgen.add_int((range.max().as_f64() * divisor + 0.5).floor() as i32);
        }
    }

    fn hash_float(&mut self, numeric: &Numeric) {
        let divisor = f64::from(numeric.divisor());
        self.hashgen.add_int(L_FLOAT64);
        self.hashgen.add_int(numeric.divisor() as i32);
        if let Some(modulus) = numeric.modulus() {
            self.hashgen.add_int((modulus * divisor) as i32);
        }
        if numeric.has_range() {
            let range = numeric.range();
            self.hashgen.add_int(1);
            self.hashgen.add_int((range.min().as_f64() * divisor) as i32);
            self.hashgen.add_int((range.max().as_f64() * divisor) as i32);
        }
    }
}
