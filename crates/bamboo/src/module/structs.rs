// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Plain structs and field registration.

use super::field::{Field, FieldId};
use super::types::{Type, TypeKind, TypeRef};
use super::Module;
use crate::error::{IndexError, SchemaError};
use std::collections::HashMap;

/// An ordered list of fields. Field order is wire order.
///
/// A class keeps its flattened field list (inherited and declared) in a
/// `Struct` too, sorted by field id.
#[derive(Debug, Clone, Default)]
pub struct Struct {
    id: Option<u32>,
    name: String,
    fields: Vec<FieldId>,
    ids_by_name: HashMap<String, FieldId>,
    indices_by_id: HashMap<FieldId, usize>,
}

impl Struct {
    pub(crate) fn new(id: Option<u32>, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Module type id. Anonymous structs (molecular field types) have none.
    pub fn id(&self) -> Option<u32> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn nth_field(&self, n: usize) -> Result<FieldId, IndexError> {
        IndexError::get("field", &self.fields, n).copied()
    }

    /// Field ids in wire order.
    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    pub fn field_id_by_name(&self, name: &str) -> Option<FieldId> {
        self.ids_by_name.get(name).copied()
    }

    pub fn has_field(&self, id: FieldId) -> bool {
        self.indices_by_id.contains_key(&id)
    }

    /// Position of a field in wire order.
    pub fn index_of(&self, id: FieldId) -> Option<usize> {
        self.indices_by_id.get(&id).copied()
    }

    /// Append a field. Empty names are not indexed.
    pub(crate) fn push_field(&mut self, id: FieldId, name: &str) -> Result<(), SchemaError> {
        if !name.is_empty() {
            if self.ids_by_name.contains_key(name) {
                return Err(SchemaError::NameConflict {
                    name: name.to_string(),
                });
            }
            self.ids_by_name.insert(name.to_string(), id);
        }
        self.indices_by_id.insert(id, self.fields.len());
        self.fields.push(id);
        Ok(())
    }

    /// Replace the whole field list.
    pub(crate) fn set_fields(&mut self, fields: Vec<(FieldId, String)>) {
        self.fields.clear();
        self.ids_by_name.clear();
        self.indices_by_id.clear();
        for (index, (id, name)) in fields.into_iter().enumerate() {
            if !name.is_empty() {
                self.ids_by_name.insert(name, id);
            }
            self.indices_by_id.insert(id, index);
            self.fields.push(id);
        }
    }
}

impl Module {
    /// Register a new, empty struct.
    pub fn add_struct(&mut self, name: &str) -> Result<TypeRef, SchemaError> {
        self.check_new_type_name(name)?;
        let id = self.types_by_id.len() as u32;
        let ty = self.push_type(Type::new(TypeKind::Struct(Struct::new(Some(id), name))));
        self.register_named_type(name, ty);
        self.structs.push(ty);
        log::debug!("[Module::add_struct] '{}' registered with id {}", name, id);
        Ok(ty)
    }

    /// Add a field to a struct or class and return its new id.
    ///
    /// Struct fields may be anonymous, but named fields must be unique.
    /// Class fields must be named; a class field shadows any inherited field
    /// with the same name.
    pub fn add_field(&mut self, owner: TypeRef, field: Field) -> Result<FieldId, SchemaError> {
        let owner_ty = self.type_of(owner).ok_or(SchemaError::UnknownHandle {
            what: "type",
            index: owner.index(),
        })?;
        if owner_ty.as_class().is_some() {
            return self.add_class_field(owner, field);
        }
        if owner_ty.as_struct().is_none() {
            return Err(SchemaError::InvalidType {
                reason: "fields can only be added to structs and classes".into(),
            });
        }
        if field.is_molecular() {
            return Err(SchemaError::InvalidType {
                reason: "structs cannot hold molecular fields".into(),
            });
        }
        self.check_field_type(owner, field.ty)?;

        let id = self.next_field_id();
        let strct = self
            .types
            .get_mut(owner.index())
            .and_then(Type::as_struct_mut)
            .ok_or(SchemaError::UnknownHandle {
                what: "struct",
                index: owner.index(),
            })?;
        strct.push_field(id, &field.name)?;

        log::debug!(
            "[Module::add_field] struct '{}' field '{}' id={}",
            strct.name(),
            field.name,
            id
        );
        self.adopt_field(id, owner, field);
        Ok(id)
    }

    pub(crate) fn next_field_id(&self) -> FieldId {
        FieldId(self.fields.len() as u32)
    }

    /// Store a field in the arena under `id`, which must be `next_field_id()`.
    pub(crate) fn adopt_field(&mut self, id: FieldId, owner: TypeRef, mut field: Field) {
        debug_assert_eq!(id, self.next_field_id());
        field.id = id;
        field.owner = Some(owner);
        self.fields.push(field);
    }
}
