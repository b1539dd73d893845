// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Array types, including strings and blobs.

use super::number::{Number, NumericRange};
use super::types::{Subtype, TypeRef};
use crate::error::SchemaError;

/// An array of one element type with an optional element-count constraint.
///
/// The wire subtype is decided when the array is built:
/// `char` elements make a string, `uint8` elements make a blob, anything else
/// a general array. The variable forms carry a size tag on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    element: TypeRef,
    range: NumericRange,
    array_size: usize,
    subtype: Subtype,
}

impl Array {
    /// Build an array over `element`, whose subtype and fixedness the caller
    /// has already resolved.
    pub(crate) fn new(
        element: TypeRef,
        element_subtype: Subtype,
        element_is_fixed: bool,
        range: NumericRange,
    ) -> Result<Self, SchemaError> {
        if matches!(element_subtype, Subtype::Invalid | Subtype::Method) {
            return Err(SchemaError::InvalidType {
                reason: format!("arrays cannot hold {} elements", element_subtype),
            });
        }
        let range = normalize_count_range(range)?;

        let array_size = if range.is_degenerate() {
            range.min().as_u64() as usize
        } else {
            0
        };
        let fixed_count = range.is_degenerate();

        let subtype = match element_subtype {
            Subtype::Char if fixed_count => Subtype::String,
            Subtype::Char => Subtype::Varstring,
            Subtype::Uint8 if fixed_count => Subtype::Blob,
            Subtype::Uint8 => Subtype::Varblob,
            _ if fixed_count && element_is_fixed => Subtype::Array,
            _ => Subtype::Vararray,
        };

        Ok(Self {
            element,
            range,
            array_size,
            subtype,
        })
    }

    pub fn subtype(&self) -> Subtype {
        self.subtype
    }

    /// The element type. Always a valid handle.
    pub fn element_type(&self) -> TypeRef {
        self.element
    }

    pub fn has_range(&self) -> bool {
        !self.range.is_nan()
    }

    /// Allowed element counts, as an unsigned range.
    pub fn range(&self) -> NumericRange {
        self.range
    }

    /// Element count of a fixed-count array, or 0 for variable arrays.
    pub fn array_size(&self) -> usize {
        self.array_size
    }

    pub fn has_fixed_count(&self) -> bool {
        self.range.is_degenerate()
    }

    /// Check an element count against the range.
    pub fn accepts_count(&self, count: usize) -> bool {
        self.range.contains(Number::Unsigned(count as u64))
    }
}

/// Element counts are unsigned. Signed ranges with a non-negative minimum are
/// converted; anything else is rejected.
fn normalize_count_range(range: NumericRange) -> Result<NumericRange, SchemaError> {
    let invalid = |reason: &str| SchemaError::InvalidRange {
        reason: format!("{} {}", range, reason),
    };

    if !range.is_well_formed() {
        return Err(invalid("is not a well-formed range"));
    }
    match (range.min(), range.max()) {
        (Number::NaN, _) => Ok(range),
        (Number::Unsigned(_), _) => Ok(range),
        (Number::Signed(min), Number::Signed(max)) if min >= 0 => {
            Ok(NumericRange::unsigned(min as u64, max as u64))
        }
        (Number::Signed(_), _) => Err(invalid("has a negative element count")),
        _ => Err(invalid("is not an integer element count")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_arrays_are_strings() {
        let fixed = Array::new(TypeRef::CHAR, Subtype::Char, true, NumericRange::unsigned(8, 8)).unwrap();
        assert_eq!(fixed.subtype(), Subtype::String);
        assert_eq!(fixed.array_size(), 8);

        let var = Array::new(TypeRef::CHAR, Subtype::Char, true, NumericRange::unbounded()).unwrap();
        assert_eq!(var.subtype(), Subtype::Varstring);
        assert_eq!(var.array_size(), 0);
    }

    #[test]
    fn test_uint8_arrays_are_blobs() {
        let fixed = Array::new(TypeRef::UINT8, Subtype::Uint8, true, NumericRange::unsigned(4, 4)).unwrap();
        assert_eq!(fixed.subtype(), Subtype::Blob);
        let var = Array::new(TypeRef::UINT8, Subtype::Uint8, true, NumericRange::unsigned(0, 4)).unwrap();
        assert_eq!(var.subtype(), Subtype::Varblob);
        assert!(var.accepts_count(4));
        assert!(!var.accepts_count(5));
    }

    #[test]
    fn test_general_arrays() {
        let fixed = Array::new(TypeRef::INT16, Subtype::Int16, true, NumericRange::unsigned(3, 3)).unwrap();
        assert_eq!(fixed.subtype(), Subtype::Array);

        // Fixed count of variable elements still needs a size tag.
        let nested = Array::new(TypeRef::STRING, Subtype::Varstring, false, NumericRange::unsigned(3, 3)).unwrap();
        assert_eq!(nested.subtype(), Subtype::Vararray);
        assert_eq!(nested.array_size(), 3);
    }

    #[test]
    fn test_count_range_normalization() {
        let arr = Array::new(TypeRef::INT32, Subtype::Int32, true, NumericRange::signed(2, 2)).unwrap();
        assert_eq!(arr.range(), NumericRange::unsigned(2, 2));
        assert!(Array::new(TypeRef::INT32, Subtype::Int32, true, NumericRange::signed(-1, 2)).is_err());
        assert!(Array::new(TypeRef::INT32, Subtype::Int32, true, NumericRange::floating(0.0, 2.0)).is_err());
        assert!(Array::new(TypeRef::INT32, Subtype::Int32, true, NumericRange::unsigned(3, 2)).is_err());
    }

    #[test]
    fn test_rejects_invalid_elements() {
        assert!(Array::new(TypeRef::INVALID, Subtype::Invalid, true, NumericRange::unbounded()).is_err());
    }
}
