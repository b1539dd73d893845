// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! MD5 fingerprint of a module's full contents.

use crate::module::{Field, Module, TypeKind, TypeRef};
use md5::{Digest, Md5};
use std::fmt;

/// 16-byte digest identifying a module's schema.
///
/// Unlike [`super::legacy_hash`], every type detail contributes: float32
/// fields, defaults, imports, typedef aliases and module keywords.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaHash(pub [u8; 16]);

impl SchemaHash {
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Debug for SchemaHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaHash({})", self)
    }
}

impl fmt::Display for SchemaHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Compute the fingerprint of a module.
pub fn fingerprint(module: &Module) -> SchemaHash {
    let mut writer = Canonical {
        module,
        hasher: Md5::new(),
    };
    writer.module();
    let digest = writer.hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest);
    SchemaHash(bytes)
}

/// Feeds a length-prefixed description of the module to the hasher.
struct Canonical<'m> {
    module: &'m Module,
    hasher: Md5,
}

impl Canonical<'_> {
    fn int(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    fn bytes(&mut self, data: &[u8]) {
        self.int(data.len() as u64);
        self.hasher.update(data);
    }

    fn text(&mut self, s: &str) {
        self.bytes(s.as_bytes());
    }

    fn module(&mut self) {
        let module = self.module;
        self.int(module.num_imports() as u64);
        for import in module.imports() {
            self.text(import.module());
            self.int(import.num_symbols() as u64);
            for symbol in import.symbols() {
                self.text(symbol);
            }
        }

        self.int(module.num_keywords() as u64);
        for keyword in module.keywords().sorted() {
            self.text(keyword);
        }

        self.int(module.num_types() as u64);
        for id in 0..module.num_types() {
            if let Some(ty) = module.type_by_id(id as u32) {
                self.composite(ty);
            }
        }
    }

    fn composite(&mut self, ty: TypeRef) {
        let module = self.module;
        let Some(entry) = module.type_of(ty) else {
            return;
        };
        if let Some(cls) = entry.as_class() {
            self.text("class");
            self.text(cls.name());
            self.int(cls.num_parents() as u64);
            for &parent in cls.parents() {
                self.reference(parent);
            }
            for keyword in cls.keywords().sorted() {
                self.text(keyword);
            }
            if let Some(ctor) = cls.constructor() {
                self.field(ctor);
            }
            self.int(cls.num_base_fields() as u64);
            for &id in cls.base_fields() {
                if let Some(field) = module.field_by_id(id) {
                    self.field(field);
                }
            }
        } else if let Some(strct) = entry.as_struct() {
            self.text("struct");
            self.text(strct.name());
            self.int(strct.num_fields() as u64);
            for &id in strct.fields() {
                if let Some(field) = module.field_by_id(id) {
                    self.field(field);
                }
            }
        }
    }

    fn field(&mut self, field: &Field) {
        self.text(field.name());
        self.int(u64::from(field.id().value()));
        self.int(field.keywords().num_keywords() as u64);
        for keyword in field.keywords().sorted() {
            self.text(keyword);
        }
        match field.atomics() {
            Some(atomics) => {
                self.text("molecular");
                for id in atomics {
                    self.int(u64::from(id.value()));
                }
            }
            None => self.reference(field.ty()),
        }
        self.bytes(field.default_value().unwrap_or_default());
    }

    /// Describe a field or parameter type. Structs and classes are
    /// described by id, so recursion stops at composites.
    fn reference(&mut self, ty: TypeRef) {
        let module = self.module;
        let Some(entry) = module.type_of(ty) else {
            self.text("invalid");
            return;
        };
        self.text(&entry.subtype().to_string());
        self.text(entry.alias().unwrap_or_default());
        match entry.kind() {
            TypeKind::Invalid => {}
            TypeKind::Numeric(numeric) => self.text(&numeric.to_string()),
            TypeKind::Array(array) => {
                self.text(&array.range().to_string());
                self.reference(array.element_type());
            }
            TypeKind::Struct(strct) => {
                self.int(strct.id().map_or(u64::MAX, u64::from));
            }
            TypeKind::Class(cls) => {
                self.int(cls.id().map_or(u64::MAX, u64::from));
            }
            TypeKind::Method(method) => {
                self.int(method.num_parameters() as u64);
                for param in method.parameters() {
                    self.text(param.name());
                    self.reference(param.ty());
                    self.bytes(param.default_value().unwrap_or_default());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Numeric, Subtype};

    fn sample(modulus: Option<f64>) -> Module {
        let mut module = Module::new();
        let mut angle = Numeric::new(Subtype::Uint16).unwrap();
        if let Some(m) = modulus {
            angle.set_modulus(m).unwrap();
        }
        let angle = module.add_numeric(angle);
        let s = module.add_struct("Pose").unwrap();
        module.add_field(s, Field::new("heading", angle)).unwrap();
        module
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(fingerprint(&sample(None)), fingerprint(&sample(None)));
        assert_eq!(fingerprint(&sample(None)).to_string().len(), 32);
    }

    #[test]
    fn test_fingerprint_sees_constraints() {
        assert_ne!(fingerprint(&sample(None)), fingerprint(&sample(Some(360.0))));
    }

    #[test]
    fn test_fingerprint_sees_float32() {
        let build = |ty: TypeRef| {
            let mut module = Module::new();
            let s = module.add_struct("S").unwrap();
            module.add_field(s, Field::new("f", ty)).unwrap();
            fingerprint(&module)
        };
        assert_ne!(build(TypeRef::FLOAT32), build(TypeRef::INT32));
    }
}
