// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds-checked datagram reader.

use super::{Datagram, DatagramError, DatagramResult};
use crate::config::{SizeTag, SIZETAG_WIDTH};
use crate::module::{Module, Subtype, TypeKind, TypeRef};
use crate::value::ValueError;

/// Generate little-endian read methods for primitive types.
///
/// Each generated method:
/// 1. Checks that `$size` bytes remain (returns `DatagramError::Eof` otherwise)
/// 2. Converts the bytes via `from_le_bytes()`
/// 3. Advances the offset
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> DatagramResult<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_data($size)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// A read cursor over a datagram's bytes.
///
/// Reads that fail return an error and leave the offset unchanged.
#[derive(Debug, Clone)]
pub struct DatagramIterator<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> DatagramIterator<'a> {
    pub fn new(dg: &'a Datagram) -> Self {
        Self::from_bytes(dg.data())
    }

    /// Start reading `dg` at `offset`.
    pub fn with_offset(dg: &'a Datagram, offset: usize) -> DatagramResult<Self> {
        let mut it = Self::new(dg);
        it.seek(offset)?;
        Ok(it)
    }

    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn tell(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn check_read(&self, needed: usize) -> DatagramResult<()> {
        let remaining = self.remaining();
        if needed > remaining {
            log::trace!(
                "[DatagramIterator] eof at {}: needed {}, remaining {}",
                self.offset,
                needed,
                remaining
            );
            return Err(DatagramError::Eof {
                offset: self.offset,
                needed,
                remaining,
            });
        }
        Ok(())
    }

    /// Move to an absolute offset. The end of the buffer is a valid offset.
    pub fn seek(&mut self, offset: usize) -> DatagramResult<()> {
        if offset > self.data.len() {
            return Err(DatagramError::Eof {
                offset: self.offset,
                needed: offset - self.offset,
                remaining: self.remaining(),
            });
        }
        self.offset = offset;
        Ok(())
    }

    pub fn skip(&mut self, len: usize) -> DatagramResult<()> {
        self.check_read(len)?;
        self.offset += len;
        Ok(())
    }

    pub fn read_bool(&mut self) -> DatagramResult<bool> {
        Ok(self.read_uint8()? != 0)
    }

    pub fn read_char(&mut self) -> DatagramResult<u8> {
        self.read_uint8()
    }

    impl_read_le!(read_int8, i8, 1);
    impl_read_le!(read_int16, i16, 2);
    impl_read_le!(read_int32, i32, 4);
    impl_read_le!(read_int64, i64, 8);
    impl_read_le!(read_uint8, u8, 1);
    impl_read_le!(read_uint16, u16, 2);
    impl_read_le!(read_uint32, u32, 4);
    impl_read_le!(read_uint64, u64, 8);
    impl_read_le!(read_float32, f32, 4);
    impl_read_le!(read_float64, f64, 8);

    /// Read a size tag.
    pub fn read_size(&mut self) -> DatagramResult<usize> {
        let mut bytes = [0u8; SIZETAG_WIDTH];
        bytes.copy_from_slice(self.read_data(SIZETAG_WIDTH)?);
        Ok(SizeTag::from_le_bytes(bytes) as usize)
    }

    /// Read `len` raw bytes.
    pub fn read_data(&mut self, len: usize) -> DatagramResult<&'a [u8]> {
        self.check_read(len)?;
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Read everything that is left.
    pub fn read_remainder(&mut self) -> &'a [u8] {
        let slice = &self.data[self.offset..];
        self.offset = self.data.len();
        slice
    }

    /// Read a size tag and the bytes it covers, as a borrowed slice.
    pub fn read_blob_slice(&mut self) -> DatagramResult<&'a [u8]> {
        let start = self.offset;
        let len = self.read_size()?;
        match self.read_data(len) {
            Ok(slice) => Ok(slice),
            Err(e) => {
                self.offset = start;
                Err(e)
            }
        }
    }

    /// Read a size tag and the bytes it covers.
    pub fn read_blob(&mut self) -> DatagramResult<Vec<u8>> {
        self.read_blob_slice().map(<[u8]>::to_vec)
    }

    /// Read a size-tagged string.
    pub fn read_string(&mut self) -> DatagramResult<String> {
        let start = self.offset;
        let bytes = self.read_blob_slice()?;
        self.utf8(bytes, start)
    }

    /// Read a string of exactly `len` bytes with no size tag.
    pub fn read_string_len(&mut self, len: usize) -> DatagramResult<String> {
        let start = self.offset;
        let bytes = self.read_data(len)?;
        self.utf8(bytes, start)
    }

    fn utf8(&mut self, bytes: &[u8], start: usize) -> DatagramResult<String> {
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(_) => {
                self.offset = start;
                Err(DatagramError::InvalidUtf8 { offset: start })
            }
        }
    }

    /// Read a size-tagged blob into a new datagram.
    pub fn read_datagram(&mut self) -> DatagramResult<Datagram> {
        self.read_blob_slice().map(Datagram::from_bytes)
    }

    /// Advance past one value of type `ty` without decoding it.
    ///
    /// Size tags of variable-length values are read to find the end.
    pub fn skip_type(&mut self, module: &Module, ty: TypeRef) -> Result<(), ValueError> {
        let start = self.offset;
        let result = self.skip_type_inner(module, ty);
        if result.is_err() {
            self.offset = start;
        }
        result
    }

    /// Read the packed bytes of one value of type `ty`, without decoding it.
    pub fn read_packed(&mut self, module: &Module, ty: TypeRef) -> Result<&'a [u8], ValueError> {
        let start = self.offset;
        self.skip_type(module, ty)?;
        Ok(&self.data[start..self.offset])
    }

    fn skip_type_inner(&mut self, module: &Module, ty: TypeRef) -> Result<(), ValueError> {
        let size = module.fixed_size(ty);
        if size > 0 {
            return Ok(self.skip(size)?);
        }

        let entry = module.type_of(ty).ok_or(ValueError::UnsupportedType {
            subtype: Subtype::Invalid,
        })?;
        match entry.kind() {
            TypeKind::Invalid => Err(ValueError::UnsupportedType {
                subtype: Subtype::Invalid,
            }),
            // Numerics are always fixed size.
            TypeKind::Numeric(_) => Ok(()),
            TypeKind::Array(array) => {
                if array.subtype().is_variable_array() {
                    let len = self.read_size()?;
                    Ok(self.skip(len)?)
                } else {
                    for _ in 0..array.array_size() {
                        self.skip_type_inner(module, array.element_type())?;
                    }
                    Ok(())
                }
            }
            TypeKind::Struct(_) | TypeKind::Class(_) => {
                for field in module.wire_fields(ty) {
                    self.skip_type_inner(module, field.ty())?;
                }
                Ok(())
            }
            TypeKind::Method(method) => {
                for param in method.parameters() {
                    self.skip_type_inner(module, param.ty())?;
                }
                Ok(())
            }
        }
    }
}
