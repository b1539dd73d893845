// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Default values of schema types.

use super::{Value, ValueError};
use crate::module::{Module, Number, Numeric, Subtype, TypeKind, TypeRef};
use crate::wire::Datagram;

impl Module {
    /// The packed default value of `ty`, and whether it is implicit.
    ///
    /// A default is implicit when no explicit field or parameter default
    /// contributed to it. Numbers default to zero, or to the lowest value of
    /// their range when zero is outside it. Arrays default to the minimum
    /// number of default elements.
    pub fn default_value(&self, ty: TypeRef) -> Result<(Vec<u8>, bool), ValueError> {
        let mut dg = Datagram::new();
        let implicit = self.write_default(&mut dg, ty)?;
        Ok((dg.into_bytes(), implicit))
    }

    fn write_default(&self, dg: &mut Datagram, ty: TypeRef) -> Result<bool, ValueError> {
        let entry = self.type_of(ty).ok_or(ValueError::UnsupportedType {
            subtype: Subtype::Invalid,
        })?;
        match entry.kind() {
            TypeKind::Invalid => Err(ValueError::UnsupportedType {
                subtype: Subtype::Invalid,
            }),
            TypeKind::Numeric(numeric) => {
                dg.add_raw(numeric.subtype(), default_raw(numeric))?;
                Ok(true)
            }
            TypeKind::Array(array) => {
                let count = if array.has_range() {
                    array.range().min().as_u64() as usize
                } else {
                    0
                };
                let mut implicit = true;
                if array.subtype().is_variable_array() {
                    let mut inner = Datagram::new();
                    for _ in 0..count {
                        implicit &= self.write_default(&mut inner, array.element_type())?;
                    }
                    if count > 0 && inner.is_empty() {
                        return Err(ValueError::UnsupportedType {
                            subtype: array.subtype(),
                        });
                    }
                    dg.add_blob(inner.data())?;
                } else {
                    for _ in 0..count {
                        implicit &= self.write_default(dg, array.element_type())?;
                    }
                }
                Ok(implicit)
            }
            TypeKind::Struct(_) | TypeKind::Class(_) => {
                let mut implicit = true;
                for field in self.wire_fields(ty) {
                    implicit &= self.write_member_default(dg, field.ty(), field.default_value())?;
                }
                Ok(implicit)
            }
            TypeKind::Method(method) => {
                let mut implicit = true;
                for param in method.parameters() {
                    implicit &= self.write_member_default(dg, param.ty(), param.default_value())?;
                }
                Ok(implicit)
            }
        }
    }

    fn write_member_default(
        &self,
        dg: &mut Datagram,
        ty: TypeRef,
        explicit: Option<&[u8]>,
    ) -> Result<bool, ValueError> {
        match explicit {
            Some(packed) => {
                dg.add_data(packed)?;
                Ok(false)
            }
            None => self.write_default(dg, ty),
        }
    }
}

/// Raw zero, or the range minimum when zero is out of range.
fn default_raw(numeric: &Numeric) -> Number {
    let subtype = numeric.subtype();
    let zero = if subtype.is_floating() {
        Number::Floating(0.0)
    } else if subtype.is_signed() {
        Number::Signed(0)
    } else {
        Number::Unsigned(0)
    };
    let range = numeric.raw_range();
    if range.contains(zero) {
        zero
    } else {
        range.min()
    }
}

impl Value {
    /// The default value of `ty`, decoded.
    pub fn default_for(module: &Module, ty: TypeRef) -> Result<Value, ValueError> {
        let (packed, _) = module.default_value(ty)?;
        Value::unpack(module, ty, &packed)
    }
}
