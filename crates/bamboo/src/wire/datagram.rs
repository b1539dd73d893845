// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Append-only datagram writer.

use super::{DatagramError, DatagramResult};
use crate::config::{DatagramConfig, SizeTag, SIZETAG_MAX, SIZETAG_WIDTH};

/// Generate little-endian append methods for primitive types.
///
/// Each generated method checks the size cap, then appends exactly
/// `$size` bytes.
macro_rules! impl_add_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self, value: $type) -> DatagramResult<()> {
            self.check_add($size)?;
            self.buf.extend_from_slice(&value.to_le_bytes());
            Ok(())
        }
    };
}

/// A growable byte buffer holding wire-encoded values.
///
/// Writes only append. A write that would exceed the configured maximum
/// fails with [`DatagramError::Overflow`] and appends nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Datagram {
    buf: Vec<u8>,
    max_size: Option<usize>,
}

impl Datagram {
    /// An empty, unbounded datagram.
    pub fn new() -> Self {
        Self::with_config(&DatagramConfig::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            max_size: None,
        }
    }

    pub fn with_config(config: &DatagramConfig) -> Self {
        Self {
            buf: Vec::with_capacity(config.initial_capacity),
            max_size: config.max_size,
        }
    }

    /// A datagram holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            buf: bytes.to_vec(),
            max_size: None,
        }
    }

    /// Change the size cap. Existing contents are kept even if larger.
    pub fn set_max_size(&mut self, max_size: Option<usize>) {
        self.max_size = max_size;
    }

    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    /// Bytes written so far.
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn data(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Drop all contents, keeping the allocation and the cap.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Drop everything past `len` bytes. Used to undo a partial composite write.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    fn check_add(&self, additional: usize) -> DatagramResult<()> {
        let size = self.buf.len().saturating_add(additional);
        if let Some(max) = self.max_size {
            if size > max {
                log::trace!("[Datagram::check_add] overflow: {} > {}", size, max);
                return Err(DatagramError::Overflow { size, max });
            }
        }
        if size > self.buf.capacity() {
            log::trace!(
                "[Datagram::check_add] growing from {} to at least {} bytes",
                self.buf.capacity(),
                size
            );
        }
        Ok(())
    }

    pub fn add_bool(&mut self, value: bool) -> DatagramResult<()> {
        self.add_uint8(u8::from(value))
    }

    pub fn add_char(&mut self, value: u8) -> DatagramResult<()> {
        self.add_uint8(value)
    }

    impl_add_le!(add_int8, i8, 1);
    impl_add_le!(add_int16, i16, 2);
    impl_add_le!(add_int32, i32, 4);
    impl_add_le!(add_int64, i64, 8);
    impl_add_le!(add_uint8, u8, 1);
    impl_add_le!(add_uint16, u16, 2);
    impl_add_le!(add_uint32, u32, 4);
    impl_add_le!(add_uint64, u64, 8);
    impl_add_le!(add_float32, f32, 4);
    impl_add_le!(add_float64, f64, 8);

    /// Append a size tag.
    pub fn add_size(&mut self, len: usize) -> DatagramResult<()> {
        let tag = size_tag(len)?;
        self.check_add(SIZETAG_WIDTH)?;
        self.buf.extend_from_slice(&tag.to_le_bytes());
        Ok(())
    }

    /// Append raw bytes with no size tag.
    pub fn add_data(&mut self, data: &[u8]) -> DatagramResult<()> {
        self.check_add(data.len())?;
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// Append a size tag followed by the bytes.
    pub fn add_blob(&mut self, data: &[u8]) -> DatagramResult<()> {
        let tag = size_tag(data.len())?;
        self.check_add(SIZETAG_WIDTH + data.len())?;
        self.buf.extend_from_slice(&tag.to_le_bytes());
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// Append a size tag followed by the UTF-8 bytes of `value`.
    pub fn add_string(&mut self, value: &str) -> DatagramResult<()> {
        self.add_blob(value.as_bytes())
    }

    /// Append the contents of another datagram with no size tag.
    pub fn add_datagram(&mut self, other: &Datagram) -> DatagramResult<()> {
        self.add_data(other.data())
    }

    /// Append another datagram as a blob.
    pub fn add_blob_datagram(&mut self, other: &Datagram) -> DatagramResult<()> {
        self.add_blob(other.data())
    }
}

fn size_tag(len: usize) -> DatagramResult<SizeTag> {
    if len > SIZETAG_MAX {
        return Err(DatagramError::SizeTagOverflow { len });
    }
    Ok(len as SizeTag)
}

impl AsRef<[u8]> for Datagram {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

impl From<Vec<u8>> for Datagram {
    fn from(buf: Vec<u8>) -> Self {
        Self {
            buf,
            max_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_are_little_endian() {
        let mut dg = Datagram::new();
        dg.add_int16(5).unwrap();
        dg.add_int16(-3).unwrap();
        dg.add_uint32(0x1234_5678).unwrap();
        assert_eq!(dg.data(), &[0x05, 0x00, 0xFD, 0xFF, 0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_bool_and_char() {
        let mut dg = Datagram::new();
        dg.add_bool(true).unwrap();
        dg.add_bool(false).unwrap();
        dg.add_char(b'a').unwrap();
        assert_eq!(dg.data(), &[1, 0, b'a']);
    }

    #[test]
    fn test_blob_has_size_tag() {
        let mut dg = Datagram::new();
        dg.add_blob(&[1, 2, 3]).unwrap();
        #[cfg(not(feature = "sizetag32"))]
        assert_eq!(dg.data(), &[0x03, 0x00, 0x01, 0x02, 0x03]);
        assert_eq!(dg.size(), SIZETAG_WIDTH + 3);
    }

    #[test]
    fn test_overflow_appends_nothing() {
        let mut dg = Datagram::with_config(&DatagramConfig::default().with_max_size(4));
        dg.add_uint16(1).unwrap();
        assert_eq!(
            dg.add_uint32(2),
            Err(DatagramError::Overflow { size: 6, max: 4 })
        );
        assert!(dg.add_string("abc").is_err());
        assert_eq!(dg.size(), 2);
        dg.add_uint16(3).unwrap();
        assert_eq!(dg.size(), 4);
    }

    #[test]
    #[cfg(not(feature = "sizetag32"))]
    fn test_size_tag_overflow() {
        let data = vec![0u8; SIZETAG_MAX + 1];
        let mut dg = Datagram::new();
        assert_eq!(
            dg.add_blob(&data),
            Err(DatagramError::SizeTagOverflow { len: SIZETAG_MAX + 1 })
        );
        assert!(dg.is_empty());
    }

    #[test]
    fn test_nested_datagrams() {
        let mut inner = Datagram::new();
        inner.add_uint8(7).unwrap();

        let mut outer = Datagram::new();
        outer.add_datagram(&inner).unwrap();
        outer.add_blob_datagram(&inner).unwrap();
        assert_eq!(outer.size(), 1 + SIZETAG_WIDTH + 1);
        assert_eq!(outer.data()[0], 7);
    }
}
