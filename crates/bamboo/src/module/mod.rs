// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema registry.
//!
//! A [`Module`] owns every type, field and parameter of one protocol. Types
//! live in an arena addressed by [`TypeRef`] handles and fields in an arena
//! addressed by [`FieldId`]s, so parent links, element types and owners are
//! plain handles rather than pointers.
//!
//! # Example
//!
//! ```
//! use bamboo::{Field, Module, TypeRef};
//!
//! let mut module = Module::new();
//! let point = module.add_struct("Point").unwrap();
//! module.add_field(point, Field::new("x", TypeRef::INT16)).unwrap();
//! module.add_field(point, Field::new("y", TypeRef::INT16)).unwrap();
//!
//! assert_eq!(module.struct_by_name("Point"), Some(point));
//! assert_eq!(module.fixed_size(point), 4);
//! ```

mod array;
mod class;
mod field;
mod import;
mod keywords;
mod method;
mod number;
mod numeric;
mod structs;
mod types;


pub use array::Array;
pub use class::Class;
pub use field::{Field, FieldId};
pub use import::Import;
pub use keywords::KeywordList;
pub use method::{Method, Parameter};
pub use number::{Number, NumberKind, NumericRange};
pub use numeric::Numeric;
pub use structs::Struct;
pub use types::{format_subtype, Subtype, Type, TypeKind, TypeRef};

use crate::error::{IndexError, SchemaError};
use std::collections::{HashMap, HashSet};

/// The root registry of one protocol.
///
/// Build it once, then share it read-only. Structs and classes share one
/// namespace and one dense id space starting at 0.
#[derive(Debug, Clone)]
pub struct Module {
    types: Vec<Type>,
    fields: Vec<Field>,

    types_by_id: Vec<TypeRef>,
    types_by_name: HashMap<String, TypeRef>,
    classes: Vec<TypeRef>,
    structs: Vec<TypeRef>,

    imports: Vec<Import>,
    keywords: KeywordList,
}

impl Default for Module {
    fn default() -> Self {
        Self::new()
    }
}

impl Module {
    /// An empty module holding only the builtin types.
    pub fn new() -> Self {
        let mut types = Vec::with_capacity(TypeRef::BUILTIN_COUNT);
        types.push(Type::invalid());
        for (_, subtype) in TypeRef::NUMERIC_BUILTINS {
            match Numeric::new(subtype) {
                Ok(n) => types.push(Type::new(TypeKind::Numeric(n))),
                Err(_) => types.push(Type::invalid()),
            }
        }
        let var = NumericRange::unbounded();
        for (element, subtype) in [(TypeRef::CHAR, Subtype::Char), (TypeRef::UINT8, Subtype::Uint8)] {
            match Array::new(element, subtype, true, var) {
                Ok(a) => types.push(Type::new(TypeKind::Array(a))),
                Err(_) => types.push(Type::invalid()),
            }
        }
        debug_assert_eq!(types.len(), TypeRef::BUILTIN_COUNT);

        Self {
            types,
            fields: Vec::new(),
            types_by_id: Vec::new(),
            types_by_name: HashMap::new(),
            classes: Vec::new(),
            structs: Vec::new(),
            imports: Vec::new(),
            keywords: KeywordList::new(),
        }
    }

    // ===================================================================
    // Types
    // ===================================================================

    pub fn type_of(&self, ty: TypeRef) -> Option<&Type> {
        self.types.get(ty.index())
    }

    pub fn subtype_of(&self, ty: TypeRef) -> Option<Subtype> {
        self.type_of(ty).map(Type::subtype)
    }

    /// Number of entries in the type table, builtins included.
    #[cfg(test)]
    pub(crate) fn type_count(&self) -> usize {
        self.types.len()
    }

    pub(crate) fn push_type(&mut self, ty: Type) -> TypeRef {
        let handle = TypeRef(self.types.len() as u32);
        self.types.push(ty);
        handle
    }

    /// Number of structs and classes.
    pub fn num_types(&self) -> usize {
        self.types_by_id.len()
    }

    /// Struct or class with the given module id.
    pub fn type_by_id(&self, id: u32) -> Option<TypeRef> {
        self.types_by_id.get(id as usize).copied()
    }

    /// Struct, class or typedef with the given name.
    pub fn type_by_name(&self, name: &str) -> Option<TypeRef> {
        self.types_by_name.get(name).copied()
    }

    pub(crate) fn check_new_type_name(&self, name: &str) -> Result<(), SchemaError> {
        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        if self.types_by_name.contains_key(name) {
            log::warn!("[Module] type name '{}' is already in use", name);
            return Err(SchemaError::NameConflict {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Index a new struct or class by name and by the next module id.
    pub(crate) fn register_named_type(&mut self, name: &str, ty: TypeRef) {
        self.types_by_name.insert(name.to_string(), ty);
        self.types_by_id.push(ty);
    }

    /// Add a numeric type and return its handle.
    pub fn add_numeric(&mut self, numeric: Numeric) -> TypeRef {
        log::trace!("[Module::add_numeric] {}", numeric);
        self.push_type(Type::new(TypeKind::Numeric(numeric)))
    }

    /// Add an array of `element` with an element-count range.
    pub fn add_array(&mut self, element: TypeRef, range: NumericRange) -> Result<TypeRef, SchemaError> {
        let subtype = self.subtype_of(element).ok_or(SchemaError::UnknownHandle {
            what: "type",
            index: element.index(),
        })?;
        let element_is_fixed = self.has_fixed_size(element);
        let array = Array::new(element, subtype, element_is_fixed, range)?;
        Ok(self.push_type(Type::new(TypeKind::Array(array))))
    }

    /// Register `name` as another name for `ty`.
    pub fn add_typedef(&mut self, name: &str, ty: TypeRef) -> Result<(), SchemaError> {
        self.check_new_type_name(name)?;
        if self.subtype_of(ty).map_or(true, |s| s == Subtype::Invalid) {
            return Err(SchemaError::InvalidType {
                reason: format!("typedef '{}' must name a valid type", name),
            });
        }
        self.types_by_name.insert(name.to_string(), ty);
        log::debug!("[Module::add_typedef] '{}' -> {:?}", name, ty);
        Ok(())
    }

    /// Give a non-builtin type a display alias and index it under that name.
    pub fn set_alias(&mut self, ty: TypeRef, alias: &str) -> Result<(), SchemaError> {
        if ty.is_builtin() {
            return Err(SchemaError::InvalidType {
                reason: "builtin types cannot be aliased".into(),
            });
        }
        self.check_new_type_name(alias)?;
        let entry = self.types.get_mut(ty.index()).ok_or(SchemaError::UnknownHandle {
            what: "type",
            index: ty.index(),
        })?;
        entry.alias = Some(alias.to_string());
        self.types_by_name.insert(alias.to_string(), ty);
        Ok(())
    }

    /// True if `target` is `ty` or is reachable from it through elements,
    /// fields or parameters.
    pub(crate) fn type_contains(&self, ty: TypeRef, target: TypeRef) -> bool {
        self.type_contains_with(ty, target, &HashMap::new(), &mut HashSet::new())
    }

    /// [`Module::type_contains`] with the field lists of the classes in
    /// `pending` taken from there instead of from the module.
    pub(crate) fn type_contains_with(
        &self,
        ty: TypeRef,
        target: TypeRef,
        pending: &HashMap<TypeRef, Vec<FieldId>>,
        visited: &mut HashSet<TypeRef>,
    ) -> bool {
        if ty == target {
            return true;
        }
        if !visited.insert(ty) {
            return false;
        }
        let Some(entry) = self.type_of(ty) else {
            return false;
        };
        match &entry.kind {
            TypeKind::Array(a) => self.type_contains_with(a.element_type(), target, pending, visited),
            TypeKind::Struct(_) | TypeKind::Class(_) => {
                let fields = match pending.get(&ty) {
                    Some(list) => list.as_slice(),
                    None => entry.as_struct().map_or(&[][..], Struct::fields),
                };
                fields.iter().any(|id| {
                    self.field_by_id(*id)
                        .map_or(false, |f| self.type_contains_with(f.ty, target, pending, visited))
                })
            }
            TypeKind::Method(m) => m
                .parameters()
                .iter()
                .any(|p| self.type_contains_with(p.ty(), target, pending, visited)),
            TypeKind::Invalid | TypeKind::Numeric(_) => false,
        }
    }

    // ===================================================================
    // Sizes
    // ===================================================================

    /// Wire size of a type in bytes, or 0 if the size varies.
    pub fn fixed_size(&self, ty: TypeRef) -> usize {
        let Some(entry) = self.type_of(ty) else {
            return 0;
        };
        match &entry.kind {
            TypeKind::Invalid => 0,
            TypeKind::Numeric(n) => n.fixed_size(),
            TypeKind::Array(a) => {
                if a.subtype().is_variable_array() {
                    0
                } else {
                    a.array_size() * self.fixed_size(a.element_type())
                }
            }
            TypeKind::Struct(_) | TypeKind::Class(_) => {
                self.sum_fixed(self.wire_fields(ty).map(Field::ty))
            }
            TypeKind::Method(m) => self.sum_fixed(m.parameters().iter().map(Parameter::ty)),
        }
    }

    fn sum_fixed(&self, types: impl Iterator<Item = TypeRef>) -> usize {
        let mut total = 0;
        for ty in types {
            let size = self.fixed_size(ty);
            if size == 0 {
                return 0;
            }
            total += size;
        }
        total
    }

    pub fn has_fixed_size(&self, ty: TypeRef) -> bool {
        self.fixed_size(ty) > 0
    }

    // ===================================================================
    // Structs and classes
    // ===================================================================

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn nth_class(&self, n: usize) -> Result<TypeRef, IndexError> {
        IndexError::get("class", &self.classes, n).copied()
    }

    pub fn class_by_id(&self, id: u32) -> Option<TypeRef> {
        self.type_by_id(id).filter(|ty| self.is_class(*ty))
    }

    pub fn class_by_name(&self, name: &str) -> Option<TypeRef> {
        self.type_by_name(name).filter(|ty| self.is_class(*ty))
    }

    pub fn num_structs(&self) -> usize {
        self.structs.len()
    }

    pub fn nth_struct(&self, n: usize) -> Result<TypeRef, IndexError> {
        IndexError::get("struct", &self.structs, n).copied()
    }

    /// Plain struct (not class) with the given module id.
    pub fn struct_by_id(&self, id: u32) -> Option<TypeRef> {
        self.type_by_id(id).filter(|ty| self.is_plain_struct(*ty))
    }

    pub fn struct_by_name(&self, name: &str) -> Option<TypeRef> {
        self.type_by_name(name).filter(|ty| self.is_plain_struct(*ty))
    }

    fn is_class(&self, ty: TypeRef) -> bool {
        self.type_of(ty).and_then(Type::as_class).is_some()
    }

    fn is_plain_struct(&self, ty: TypeRef) -> bool {
        matches!(self.type_of(ty).map(Type::kind), Some(TypeKind::Struct(_)))
    }

    // ===================================================================
    // Fields
    // ===================================================================

    /// Number of fields registered anywhere in the module.
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// The fields that make up a struct or class value on the wire, in order.
    ///
    /// Molecular fields repeat their atomics and are skipped. Empty for
    /// anything that is not a struct or class.
    pub fn wire_fields(&self, ty: TypeRef) -> impl Iterator<Item = &Field> + '_ {
        self.type_of(ty)
            .and_then(Type::as_struct)
            .map_or(&[][..], Struct::fields)
            .iter()
            .filter_map(|id| self.field_by_id(*id))
            .filter(|f| !f.is_molecular())
    }

    /// Field of a struct or class, inherited fields included.
    pub fn field_by_name(&self, owner: TypeRef, name: &str) -> Option<&Field> {
        let id = self.type_of(owner)?.as_struct()?.field_id_by_name(name)?;
        self.field_by_id(id)
    }

    /// The `n`th field of a struct or class in wire order.
    pub fn nth_field(&self, owner: TypeRef, n: usize) -> Result<&Field, IndexError> {
        let fields = self
            .type_of(owner)
            .and_then(Type::as_struct)
            .map_or(&[][..], Struct::fields);
        let id = IndexError::get("field", fields, n)?;
        self.field_by_id(*id)
            .ok_or(IndexError::new("field", id.index(), self.fields.len()))
    }

    // ===================================================================
    // Keywords
    // ===================================================================

    /// Declare a module-level keyword. Returns false if already declared.
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        self.keywords.add_keyword(keyword)
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.has_keyword(keyword)
    }

    pub fn num_keywords(&self) -> usize {
        self.keywords.num_keywords()
    }

    pub fn nth_keyword(&self, n: usize) -> Result<&str, IndexError> {
        self.keywords.nth_keyword(n)
    }

    pub fn keywords(&self) -> &KeywordList {
        &self.keywords
    }
}
