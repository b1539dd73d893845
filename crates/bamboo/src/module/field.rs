// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fields of structs and classes.

use super::keywords::KeywordList;
use super::types::{Subtype, TypeRef};
use super::Module;
use crate::error::SchemaError;
use crate::value::Value;
use std::fmt;

/// Module-wide field identifier.
///
/// Ids are dense, assigned in registration order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub(crate) u32);

impl FieldId {
    /// Id of a field that has not been added to a struct.
    pub const UNASSIGNED: FieldId = FieldId(u32::MAX);

    pub fn value(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, typed slot in a struct or class.
///
/// Built with [`Field::new`] and handed to [`Module::add_field`], which
/// assigns the id and records the owner.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) id: FieldId,
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) default: Option<Vec<u8>>,
    pub(crate) keywords: KeywordList,
    pub(crate) owner: Option<TypeRef>,
    /// Constituent fields, for molecular fields only.
    pub(crate) atomics: Option<Vec<FieldId>>,
}

impl Field {
    pub fn new(name: &str, ty: TypeRef) -> Self {
        Self {
            id: FieldId::UNASSIGNED,
            name: name.to_string(),
            ty,
            default: None,
            keywords: KeywordList::new(),
            owner: None,
            atomics: None,
        }
    }

    /// A field without a name. Only plain structs accept these.
    pub fn anonymous(ty: TypeRef) -> Self {
        Self::new("", ty)
    }

    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keywords.add_keyword(keyword);
        self
    }

    pub fn with_keywords<'a>(mut self, keywords: impl IntoIterator<Item = &'a str>) -> Self {
        for kw in keywords {
            self.keywords.add_keyword(kw);
        }
        self
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    pub fn has_default_value(&self) -> bool {
        self.default.is_some()
    }

    /// The explicit default, packed in wire format.
    pub fn default_value(&self) -> Option<&[u8]> {
        self.default.as_deref()
    }

    pub fn keywords(&self) -> &KeywordList {
        &self.keywords
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.has_keyword(keyword)
    }

    /// The struct or class that declared this field.
    pub fn owner(&self) -> Option<TypeRef> {
        self.owner
    }

    pub fn is_molecular(&self) -> bool {
        self.atomics.is_some()
    }

    /// The atomic fields a molecular field aggregates.
    pub fn atomics(&self) -> Option<&[FieldId]> {
        self.atomics.as_deref()
    }
}

impl Module {
    /// Look up a field by its module-wide id.
    pub fn field_by_id(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.index())
    }

    pub(crate) fn field_mut(&mut self, id: FieldId) -> Result<&mut Field, SchemaError> {
        self.fields
            .get_mut(id.index())
            .ok_or(SchemaError::UnknownHandle {
                what: "field",
                index: id.index(),
            })
    }

    /// Check that `ty` can be stored in a field of `owner`.
    pub(crate) fn check_field_type(&self, owner: TypeRef, ty: TypeRef) -> Result<(), SchemaError> {
        let subtype = self.subtype_of(ty).ok_or(SchemaError::UnknownHandle {
            what: "type",
            index: ty.index(),
        })?;
        let owner_is_class = self.type_of(owner).and_then(|t| t.as_class()).is_some();
        match subtype {
            Subtype::Invalid => Err(SchemaError::InvalidType {
                reason: "fields cannot have the invalid type".into(),
            }),
            Subtype::Method if !owner_is_class => Err(SchemaError::InvalidType {
                reason: "struct fields cannot be methods".into(),
            }),
            _ if self.type_contains(ty, owner) => Err(SchemaError::InvalidType {
                reason: "a struct cannot contain itself".into(),
            }),
            _ => Ok(()),
        }
    }

    /// Change a field's type. Any default value is cleared.
    pub fn set_field_type(&mut self, id: FieldId, ty: TypeRef) -> Result<(), SchemaError> {
        let field = self.field_by_id(id).ok_or(SchemaError::UnknownHandle {
            what: "field",
            index: id.index(),
        })?;
        if field.is_molecular() {
            return Err(SchemaError::InvalidType {
                reason: format!("molecular field '{}' has a computed type", field.name),
            });
        }
        if let Some(owner) = field.owner {
            self.check_field_type(owner, ty)?;
            // Classes that inherit the field must not end up containing themselves.
            for heir in self.descendants(owner) {
                let inherits = self
                    .type_of(heir)
                    .and_then(|t| t.as_struct())
                    .map_or(false, |s| s.has_field(id));
                if inherits && self.type_contains(ty, heir) {
                    return Err(SchemaError::InvalidType {
                        reason: format!("field '{}' would make a subclass contain itself", field.name),
                    });
                }
            }
        }

        let field = self.field_mut(id)?;
        field.ty = ty;
        field.default = None;
        log::debug!("[Module::set_field_type] field {} now has type {:?}", id, ty);
        Ok(())
    }

    /// Pack `value` against the field's type and store it as the default.
    pub fn set_field_default(&mut self, id: FieldId, value: &Value) -> Result<(), SchemaError> {
        let ty = self
            .field_by_id(id)
            .ok_or(SchemaError::UnknownHandle {
                what: "field",
                index: id.index(),
            })?
            .ty;
        let packed = value.pack(self, ty)?;
        self.field_mut(id)?.default = Some(packed);
        Ok(())
    }

    /// Store an already packed default. The bytes must decode as one value
    /// of the field's type.
    pub fn set_field_default_packed(&mut self, id: FieldId, packed: &[u8]) -> Result<(), SchemaError> {
        let ty = self
            .field_by_id(id)
            .ok_or(SchemaError::UnknownHandle {
                what: "field",
                index: id.index(),
            })?
            .ty;
        self.validate_packed(ty, packed)?;
        self.field_mut(id)?.default = Some(packed.to_vec());
        Ok(())
    }
}
