// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tagged numbers and the closed ranges built from them.

use std::fmt;

/// Which payload of a [`Number`] is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    NaN,
    Signed,
    Unsigned,
    Floating,
}

/// Any integer or floating-point value used by numeric constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    NaN,
    Signed(i64),
    Unsigned(u64),
    Floating(f64),
}

impl Number {
    pub fn kind(&self) -> NumberKind {
        match self {
            Number::NaN => NumberKind::NaN,
            Number::Signed(_) => NumberKind::Signed,
            Number::Unsigned(_) => NumberKind::Unsigned,
            Number::Floating(_) => NumberKind::Floating,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Number::NaN)
    }

    /// Convert with `as` semantics; NaN converts to zero.
    pub fn as_i64(&self) -> i64 {
        match *self {
            Number::NaN => 0,
            Number::Signed(v) => v,
            Number::Unsigned(v) => v as i64,
            Number::Floating(v) => v as i64,
        }
    }

    /// Convert with `as` semantics; NaN converts to zero.
    pub fn as_u64(&self) -> u64 {
        match *self {
            Number::NaN => 0,
            Number::Signed(v) => v as u64,
            Number::Unsigned(v) => v,
            Number::Floating(v) => v as u64,
        }
    }

    /// Convert with `as` semantics; NaN converts to zero.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::NaN => 0.0,
            Number::Signed(v) => v as f64,
            Number::Unsigned(v) => v as f64,
            Number::Floating(v) => v,
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number::NaN
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Number::Signed(v.into())
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Signed(v)
    }
}

impl From<u32> for Number {
    fn from(v: u32) -> Self {
        Number::Unsigned(v.into())
    }
}

impl From<u64> for Number {
    fn from(v: u64) -> Self {
        Number::Unsigned(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Floating(v)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::NaN => write!(f, "nan"),
            Number::Signed(v) => write!(f, "{}", v),
            Number::Unsigned(v) => write!(f, "{}", v),
            Number::Floating(v) => write!(f, "{}", v),
        }
    }
}

/// A closed interval `[min, max]` of one number kind.
///
/// A range whose kind is [`NumberKind::NaN`] places no constraint at all.
/// Ranges constrain numeric values and array element counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    min: Number,
    max: Number,
}

impl Default for NumericRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl NumericRange {
    /// The unconstrained range.
    pub const fn unbounded() -> Self {
        Self {
            min: Number::NaN,
            max: Number::NaN,
        }
    }

    pub const fn signed(min: i64, max: i64) -> Self {
        Self {
            min: Number::Signed(min),
            max: Number::Signed(max),
        }
    }

    pub const fn unsigned(min: u64, max: u64) -> Self {
        Self {
            min: Number::Unsigned(min),
            max: Number::Unsigned(max),
        }
    }

    pub const fn floating(min: f64, max: f64) -> Self {
        Self {
            min: Number::Floating(min),
            max: Number::Floating(max),
        }
    }

    /// A degenerate range holding exactly one value.
    pub const fn exact(value: Number) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn kind(&self) -> NumberKind {
        self.min.kind()
    }

    pub fn min(&self) -> Number {
        self.min
    }

    pub fn max(&self) -> Number {
        self.max
    }

    /// True if this range places no constraint.
    pub fn is_nan(&self) -> bool {
        self.min.is_nan()
    }

    /// True if `min == max`.
    pub fn is_degenerate(&self) -> bool {
        !self.is_nan() && self.min == self.max
    }

    /// True if both bounds share one kind and `min <= max` under that kind's ordering.
    ///
    /// The unconstrained range is well formed.
    pub fn is_well_formed(&self) -> bool {
        match (self.min, self.max) {
            (Number::NaN, Number::NaN) => true,
            (Number::Signed(a), Number::Signed(b)) => a <= b,
            (Number::Unsigned(a), Number::Unsigned(b)) => a <= b,
            (Number::Floating(a), Number::Floating(b)) => a <= b,
            _ => false,
        }
    }

    /// True if `num` (converted to this range's kind) lies within the bounds.
    pub fn contains(&self, num: Number) -> bool {
        match (self.min, self.max) {
            (Number::Signed(min), Number::Signed(max)) => {
                let val = num.as_i64();
                min <= val && val <= max
            }
            (Number::Unsigned(min), Number::Unsigned(max)) => {
                let val = num.as_u64();
                min <= val && val <= max
            }
            (Number::Floating(min), Number::Floating(max)) => {
                let val = num.as_f64();
                min <= val && val <= max
            }
            _ => true,
        }
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nan() {
            Ok(())
        } else if self.min == self.max {
            write!(f, "({})", self.min)
        } else {
            write!(f, "({}, {})", self.min, self.max)
        }
    }
}
