// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Little-endian datagram codec.
//!
//! Scalars are written at their natural width in little-endian order.
//! Strings, blobs and variable arrays are a size tag (see
//! [`crate::config::SizeTag`]) holding the byte length, followed by the bytes.

pub mod datagram;
pub mod iterator;

pub use datagram::Datagram;
pub use iterator::DatagramIterator;

use std::fmt;

/// Codec error. Every failing operation leaves the datagram or iterator
/// exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatagramError {
    /// A read needed more bytes than remain.
    Eof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// A write would grow the datagram past its configured maximum.
    Overflow { size: usize, max: usize },
    /// A length does not fit in a size tag.
    SizeTagOverflow { len: usize },
    /// A string read found bytes that are not UTF-8.
    InvalidUtf8 { offset: usize },
}

impl fmt::Display for DatagramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatagramError::Eof {
                offset,
                needed,
                remaining,
            } => write!(
                f,
                "end of datagram at offset {}: needed {} bytes, {} remaining",
                offset, needed, remaining
            ),
            DatagramError::Overflow { size, max } => {
                write!(f, "datagram size {} exceeds maximum {}", size, max)
            }
            DatagramError::SizeTagOverflow { len } => {
                write!(f, "length {} does not fit in a size tag", len)
            }
            DatagramError::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 in string at offset {}", offset)
            }
        }
    }
}

impl std::error::Error for DatagramError {}

pub type DatagramResult<T> = core::result::Result<T, DatagramError>;
