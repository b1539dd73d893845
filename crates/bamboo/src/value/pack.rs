// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Packing and unpacking of [`Value`]s against schema types.

use super::{Value, ValueError};
use crate::module::{Array, Method, Module, Number, NumericRange, Numeric, Subtype, TypeKind, TypeRef};
use crate::wire::{Datagram, DatagramIterator};

fn mismatch(expected: Subtype, found: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected,
        found: found.kind_name(),
    }
}

fn unsupported() -> ValueError {
    ValueError::UnsupportedType {
        subtype: Subtype::Invalid,
    }
}

fn count_mismatch(expected: usize, found: usize) -> ValueError {
    ValueError::LengthMismatch {
        expected: NumericRange::exact(Number::Unsigned(expected as u64)),
        found,
    }
}

impl Value {
    /// Pack this value as type `ty` into a new byte buffer.
    pub fn pack(&self, module: &Module, ty: TypeRef) -> Result<Vec<u8>, ValueError> {
        let mut dg = Datagram::new();
        dg.add_value(module, ty, self)?;
        Ok(dg.into_bytes())
    }

    /// Decode one value of type `ty` from `packed`, which must hold exactly
    /// that value.
    pub fn unpack(module: &Module, ty: TypeRef, packed: &[u8]) -> Result<Value, ValueError> {
        let mut it = DatagramIterator::from_bytes(packed);
        let value = it.read_value(module, ty)?;
        match it.remaining() {
            0 => Ok(value),
            remaining => Err(ValueError::TrailingData { remaining }),
        }
    }
}

impl Module {
    /// Check that `packed` is exactly one well-formed value of type `ty`
    /// that satisfies the type's constraints.
    pub fn validate_packed(&self, ty: TypeRef, packed: &[u8]) -> Result<(), ValueError> {
        // Decoding does not check ranges; packing the result again does.
        Value::unpack(self, ty, packed)?.pack(self, ty)?;
        Ok(())
    }
}

impl Datagram {
    /// Append `value` encoded as type `ty`.
    ///
    /// Numbers are scaled by the divisor, reduced by the modulus and checked
    /// against the range. Nothing is appended on error.
    pub fn add_value(&mut self, module: &Module, ty: TypeRef, value: &Value) -> Result<(), ValueError> {
        let start = self.size();
        let result = self.add_value_inner(module, ty, value);
        if let Err(e) = &result {
            log::debug!("[Datagram::add_value] rolling back {} bytes: {}", self.size() - start, e);
            self.truncate(start);
        }
        result
    }

    /// Append already-packed bytes after validating them as type `ty`.
    pub fn add_packed(&mut self, module: &Module, ty: TypeRef, packed: &[u8]) -> Result<(), ValueError> {
        module.validate_packed(ty, packed)?;
        Ok(self.add_data(packed)?)
    }

    fn add_value_inner(&mut self, module: &Module, ty: TypeRef, value: &Value) -> Result<(), ValueError> {
        let entry = module.type_of(ty).ok_or_else(unsupported)?;
        match entry.kind() {
            TypeKind::Invalid => Err(unsupported()),
            TypeKind::Numeric(numeric) => self.add_number(numeric, value),
            TypeKind::Array(array) => self.add_array(module, array, value),
            TypeKind::Struct(_) | TypeKind::Class(_) => {
                let Value::Struct(items) = value else {
                    return Err(mismatch(entry.subtype(), value));
                };
                let expected = module.wire_fields(ty).count();
                if items.len() != expected {
                    return Err(count_mismatch(expected, items.len()));
                }
                for (field, item) in module.wire_fields(ty).zip(items) {
                    self.add_value_inner(module, field.ty(), item)?;
                }
                Ok(())
            }
            TypeKind::Method(method) => {
                let Value::Method(items) = value else {
                    return Err(mismatch(Subtype::Method, value));
                };
                self.add_arguments(module, method, items)
            }
        }
    }

    fn add_arguments(&mut self, module: &Module, method: &Method, items: &[Value]) -> Result<(), ValueError> {
        if items.len() != method.num_parameters() {
            return Err(count_mismatch(method.num_parameters(), items.len()));
        }
        for (param, item) in method.parameters().iter().zip(items) {
            self.add_value_inner(module, param.ty(), item)?;
        }
        Ok(())
    }

    fn add_number(&mut self, numeric: &Numeric, value: &Value) -> Result<(), ValueError> {
        let subtype = numeric.subtype();
        let real = match value {
            Value::Bool(_) if !subtype.is_integer() => return Err(mismatch(subtype, value)),
            other => other.as_number().ok_or_else(|| mismatch(subtype, value))?,
        };
        let raw = numeric.to_raw(real)?;
        self.add_raw(subtype, raw)
    }

    /// Append a raw number at the width of `subtype`.
    pub(crate) fn add_raw(&mut self, subtype: Subtype, raw: Number) -> Result<(), ValueError> {
        match subtype {
            Subtype::Int8 => self.add_int8(raw.as_i64() as i8)?,
            Subtype::Int16 => self.add_int16(raw.as_i64() as i16)?,
            Subtype::Int32 => self.add_int32(raw.as_i64() as i32)?,
            Subtype::Int64 => self.add_int64(raw.as_i64())?,
            Subtype::Char | Subtype::Uint8 => self.add_uint8(raw.as_u64() as u8)?,
            Subtype::Uint16 => self.add_uint16(raw.as_u64() as u16)?,
            Subtype::Uint32 => self.add_uint32(raw.as_u64() as u32)?,
            Subtype::Uint64 => self.add_uint64(raw.as_u64())?,
            Subtype::Float32 => self.add_float32(raw.as_f64() as f32)?,
            Subtype::Float64 => self.add_float64(raw.as_f64())?,
            other => return Err(ValueError::UnsupportedType { subtype: other }),
        }
        Ok(())
    }

    fn add_array(&mut self, module: &Module, array: &Array, value: &Value) -> Result<(), ValueError> {
        let subtype = array.subtype();
        match (subtype, value) {
            (Subtype::String | Subtype::Varstring, Value::String(s)) => {
                self.add_bytes(module, array, s.as_bytes())
            }
            (Subtype::Blob | Subtype::Varblob, Value::Blob(b)) => self.add_bytes(module, array, b),
            (Subtype::Array | Subtype::Vararray, Value::Array(items)) => {
                if !array.accepts_count(items.len()) {
                    return Err(ValueError::LengthMismatch {
                        expected: array.range(),
                        found: items.len(),
                    });
                }
                if subtype == Subtype::Array {
                    for item in items {
                        self.add_value_inner(module, array.element_type(), item)?;
                    }
                    return Ok(());
                }
                let mut inner = Datagram::new();
                for item in items {
                    inner.add_value_inner(module, array.element_type(), item)?;
                }
                // The element count is not on the wire, so zero-width
                // elements would be lost.
                if !items.is_empty() && inner.is_empty() {
                    log::debug!("[Datagram::add_value] vararray of zero-width elements");
                    return Err(ValueError::UnsupportedType { subtype });
                }
                Ok(self.add_blob(inner.data())?)
            }
            _ => Err(mismatch(subtype, value)),
        }
    }

    /// Strings and blobs: one byte per element, checked against the element's range.
    fn add_bytes(&mut self, module: &Module, array: &Array, bytes: &[u8]) -> Result<(), ValueError> {
        if !array.accepts_count(bytes.len()) {
            return Err(ValueError::LengthMismatch {
                expected: array.range(),
                found: bytes.len(),
            });
        }
        let element = module.type_of(array.element_type()).and_then(|t| t.as_numeric());
        if let Some(numeric) = element.filter(|n| n.has_range()) {
            for &b in bytes {
                numeric.check_raw(Number::Unsigned(u64::from(b)))?;
            }
        }
        if array.subtype().is_variable_array() {
            Ok(self.add_blob(bytes)?)
        } else {
            Ok(self.add_data(bytes)?)
        }
    }
}

impl<'a> DatagramIterator<'a> {
    /// Read one value of type `ty`.
    ///
    /// Ranges are not checked. Integers with a divisor read back as
    /// [`Value::Float`]. The offset is unchanged on error.
    pub fn read_value(&mut self, module: &Module, ty: TypeRef) -> Result<Value, ValueError> {
        let start = self.tell();
        let result = self.read_value_inner(module, ty);
        if result.is_err() {
            self.seek(start)?;
        }
        result
    }

    fn read_value_inner(&mut self, module: &Module, ty: TypeRef) -> Result<Value, ValueError> {
        let entry = module.type_of(ty).ok_or_else(unsupported)?;
        match entry.kind() {
            TypeKind::Invalid => Err(unsupported()),
            TypeKind::Numeric(numeric) => self.read_number(numeric),
            TypeKind::Array(array) => self.read_array(module, array),
            TypeKind::Struct(_) | TypeKind::Class(_) => {
                let items = module
                    .wire_fields(ty)
                    .map(|field| self.read_value_inner(module, field.ty()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Struct(items))
            }
            TypeKind::Method(method) => {
                let items = method
                    .parameters()
                    .iter()
                    .map(|param| self.read_value_inner(module, param.ty()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Method(items))
            }
        }
    }

    fn read_number(&mut self, numeric: &Numeric) -> Result<Value, ValueError> {
        let subtype = numeric.subtype();
        let raw = match subtype {
            Subtype::Int8 => Number::Signed(i64::from(self.read_int8()?)),
            Subtype::Int16 => Number::Signed(i64::from(self.read_int16()?)),
            Subtype::Int32 => Number::Signed(i64::from(self.read_int32()?)),
            Subtype::Int64 => Number::Signed(self.read_int64()?),
            Subtype::Char | Subtype::Uint8 => Number::Unsigned(u64::from(self.read_uint8()?)),
            Subtype::Uint16 => Number::Unsigned(u64::from(self.read_uint16()?)),
            Subtype::Uint32 => Number::Unsigned(u64::from(self.read_uint32()?)),
            Subtype::Uint64 => Number::Unsigned(self.read_uint64()?),
            Subtype::Float32 => Number::Floating(f64::from(self.read_float32()?)),
            Subtype::Float64 => Number::Floating(self.read_float64()?),
            other => return Err(ValueError::UnsupportedType { subtype: other }),
        };

        Ok(match (subtype, numeric.to_real(raw)) {
            (Subtype::Char, _) if numeric.divisor() == 1 => Value::Char(raw.as_u64() as u8),
            (_, Number::Signed(v)) => Value::Int(v),
            (_, Number::Unsigned(v)) => Value::Uint(v),
            (_, real) => Value::Float(real.as_f64()),
        })
    }

    fn read_array(&mut self, module: &Module, array: &Array) -> Result<Value, ValueError> {
        let element = array.element_type();
        match array.subtype() {
            Subtype::String => Ok(Value::String(self.read_string_len(array.array_size())?)),
            Subtype::Varstring => Ok(Value::String(self.read_string()?)),
            Subtype::Blob => Ok(Value::Blob(self.read_data(array.array_size())?.to_vec())),
            Subtype::Varblob => Ok(Value::Blob(self.read_blob()?)),
            Subtype::Array => {
                let items = (0..array.array_size())
                    .map(|_| self.read_value_inner(module, element))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(items))
            }
            Subtype::Vararray => {
                let mut inner = DatagramIterator::from_bytes(self.read_blob_slice()?);
                let mut items = Vec::new();
                while inner.remaining() > 0 {
                    let before = inner.remaining();
                    items.push(inner.read_value_inner(module, element)?);
                    // Zero-width elements cannot account for leftover bytes.
                    if inner.remaining() == before {
                        return Err(ValueError::TrailingData { remaining: before });
                    }
                }
                Ok(Value::Array(items))
            }
            other => Err(ValueError::UnsupportedType { subtype: other }),
        }
    }
}
