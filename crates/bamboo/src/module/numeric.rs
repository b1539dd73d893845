// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Constrained numeric types.
//!
//! A numeric stores its value on the wire as a raw integer (or float) and
//! exposes it to applications in real units: `real = raw / divisor`. The
//! modulus and range are given in real units and kept in both forms, so
//! encoding only ever compares raw values.

use super::number::{Number, NumberKind, NumericRange};
use super::types::{format_subtype, Subtype};
use crate::error::SchemaError;
use crate::value::ValueError;
use std::fmt;

/// A numeric type: base subtype plus divisor, modulus and range constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Numeric {
    subtype: Subtype,
    divisor: u32,

    modulus: Option<f64>,
    raw_modulus: Number,

    range: NumericRange,
    raw_range: NumericRange,
}

impl Numeric {
    /// An unconstrained numeric. Fails for non-numeric subtypes.
    pub fn new(subtype: Subtype) -> Result<Self, SchemaError> {
        if !subtype.is_numeric() {
            return Err(SchemaError::InvalidType {
                reason: format!("{} is not a numeric subtype", subtype),
            });
        }
        Ok(Self {
            subtype,
            divisor: 1,
            modulus: None,
            raw_modulus: Number::NaN,
            range: NumericRange::unbounded(),
            raw_range: NumericRange::unbounded(),
        })
    }

    pub fn subtype(&self) -> Subtype {
        self.subtype
    }

    /// Byte width on the wire. Numerics are always fixed size.
    pub fn fixed_size(&self) -> usize {
        self.subtype.numeric_width().unwrap_or(0)
    }

    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    pub fn has_modulus(&self) -> bool {
        self.modulus.is_some()
    }

    /// Modulus in real units.
    pub fn modulus(&self) -> Option<f64> {
        self.modulus
    }

    /// Modulus in raw units, or NaN when unset.
    pub fn raw_modulus(&self) -> Number {
        self.raw_modulus
    }

    pub fn has_range(&self) -> bool {
        !self.range.is_nan()
    }

    /// Range in real units, as it was set.
    pub fn range(&self) -> NumericRange {
        self.range
    }

    /// Range in raw units.
    pub fn raw_range(&self) -> NumericRange {
        self.raw_range
    }

    /// Set the divisor, re-scaling the existing modulus and range.
    pub fn set_divisor(&mut self, divisor: u32) -> Result<(), SchemaError> {
        if divisor == 0 {
            return Err(SchemaError::InvalidDivisor);
        }
        let raw_modulus = match self.modulus {
            Some(m) => self.scale_modulus(m, divisor)?,
            None => Number::NaN,
        };
        let raw_range = self.scale_range(self.range, divisor)?;

        self.divisor = divisor;
        self.raw_modulus = raw_modulus;
        self.raw_range = raw_range;
        Ok(())
    }

    /// Set the modulus, in real units. Values wrap into `[0, modulus)`.
    pub fn set_modulus(&mut self, modulus: f64) -> Result<(), SchemaError> {
        let raw = self.scale_modulus(modulus, self.divisor)?;
        self.modulus = Some(modulus);
        self.raw_modulus = raw;
        Ok(())
    }

    /// Set the range, in real units.
    ///
    /// Integer subtypes accept ranges of their own signedness or floating
    /// ranges; float subtypes accept any kind.
    pub fn set_range(&mut self, range: NumericRange) -> Result<(), SchemaError> {
        let raw = self.scale_range(range, self.divisor)?;
        self.range = range;
        self.raw_range = raw;
        Ok(())
    }

    fn scale_modulus(&self, modulus: f64, divisor: u32) -> Result<Number, SchemaError> {
        let invalid = SchemaError::InvalidModulus { modulus };
        if !(modulus.is_finite() && modulus > 0.0) {
            return Err(invalid);
        }

        match self.subtype.integer_bounds() {
            Some((lo, hi)) => {
                let raw = scale_float(modulus, divisor).ok_or(invalid.clone())?;
                let span = (hi - lo + 1).min(u64::MAX as i128);
                if raw < 1 || raw > span {
                    return Err(invalid);
                }
                Ok(Number::Unsigned(raw as u64))
            }
            None => Ok(Number::Floating(modulus * f64::from(divisor))),
        }
    }

    fn scale_range(&self, range: NumericRange, divisor: u32) -> Result<NumericRange, SchemaError> {
        if range.is_nan() {
            return Ok(NumericRange::unbounded());
        }
        if !range.is_well_formed() {
            return Err(SchemaError::InvalidRange {
                reason: format!("{} is not a well-formed range", range),
            });
        }

        let Some((lo, hi)) = self.subtype.integer_bounds() else {
            let div = f64::from(divisor);
            return Ok(NumericRange::floating(
                range.min().as_f64() * div,
                range.max().as_f64() * div,
            ));
        };

        let kind_ok = match range.kind() {
            NumberKind::Floating => true,
            NumberKind::Signed => self.subtype.is_signed(),
            NumberKind::Unsigned => !self.subtype.is_signed(),
            NumberKind::NaN => false,
        };
        if !kind_ok {
            return Err(SchemaError::InvalidRange {
                reason: format!(
                    "{:?} range cannot constrain {}",
                    range.kind(),
                    format_subtype(self.subtype)
                ),
            });
        }

        let out_of_domain = || SchemaError::InvalidRange {
            reason: format!(
                "{} does not fit in {} with divisor {}",
                range,
                format_subtype(self.subtype),
                divisor
            ),
        };
        let min = scale_number(range.min(), divisor).ok_or_else(out_of_domain)?;
        let max = scale_number(range.max(), divisor).ok_or_else(out_of_domain)?;
        if min < lo || max > hi {
            return Err(out_of_domain());
        }

        if self.subtype.is_signed() {
            Ok(NumericRange::signed(min as i64, max as i64))
        } else {
            Ok(NumericRange::unsigned(min as u64, max as u64))
        }
    }

    /// Convert a value in real units to the raw value stored on the wire.
    ///
    /// Integer subtypes round to the nearest raw integer. The modulus is
    /// applied before the range check.
    pub fn to_raw(&self, real: Number) -> Result<Number, ValueError> {
        let out_of_range = || ValueError::OutOfRange {
            value: real,
            subtype: self.subtype,
        };
        if real.is_nan() {
            return Err(out_of_range());
        }

        let Some((lo, hi)) = self.subtype.integer_bounds() else {
            let mut raw = real.as_f64() * f64::from(self.divisor);
            if let Number::Floating(m) = self.raw_modulus {
                raw = raw.rem_euclid(m);
            }
            if !self.raw_range.contains(Number::Floating(raw)) {
                return Err(out_of_range());
            }
            if self.subtype == Subtype::Float32 && raw.is_finite() && raw.abs() > f64::from(f32::MAX) {
                return Err(out_of_range());
            }
            return Ok(Number::Floating(raw));
        };

        let mut raw = match real {
            Number::Floating(f) if !f.is_finite() => return Err(out_of_range()),
            other => scale_number(other, self.divisor).ok_or_else(out_of_range)?,
        };
        if let Number::Unsigned(m) = self.raw_modulus {
            raw = raw.rem_euclid(i128::from(m));
        }
        if raw < lo || raw > hi {
            return Err(out_of_range());
        }

        let raw = if self.subtype.is_signed() {
            Number::Signed(raw as i64)
        } else {
            Number::Unsigned(raw as u64)
        };
        self.check_raw(raw)?;
        Ok(raw)
    }

    /// Convert a raw wire value to real units.
    pub fn to_real(&self, raw: Number) -> Number {
        if self.divisor == 1 {
            raw
        } else {
            Number::Floating(raw.as_f64() / f64::from(self.divisor))
        }
    }

    /// Check a raw value against the range.
    pub fn check_raw(&self, raw: Number) -> Result<(), ValueError> {
        if self.raw_range.contains(raw) {
            Ok(())
        } else {
            Err(ValueError::OutOfRange {
                value: self.to_real(raw),
                subtype: self.subtype,
            })
        }
    }
}

/// Scale a number by the divisor into the integer domain.
fn scale_number(num: Number, divisor: u32) -> Option<i128> {
    match num {
        Number::NaN => None,
        Number::Signed(v) => Some(i128::from(v) * i128::from(divisor)),
        Number::Unsigned(v) => Some(i128::from(v) * i128::from(divisor)),
        Number::Floating(f) => scale_float(f, divisor),
    }
}

fn scale_float(value: f64, divisor: u32) -> Option<i128> {
    let scaled = (value * f64::from(divisor) + 0.5).floor();
    // No subtype reaches 1e30.
    if scaled.is_finite() && scaled.abs() < 1.0e30 {
        Some(scaled as i128)
    } else {
        None
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_subtype(self.subtype), self.raw_range)?;
        if let Some(m) = self.modulus {
            write!(f, " % {}", m)?;
        }
        if self.divisor > 1 {
            write!(f, " / {}", self.divisor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_numeric_subtype() {
        assert!(Numeric::new(Subtype::Varstring).is_err());
        assert!(Numeric::new(Subtype::Char).is_ok());
    }

    #[test]
    fn test_divisor_scales_range() {
        let mut n = Numeric::new(Subtype::Int32).unwrap();
        n.set_divisor(100).unwrap();
        n.set_range(NumericRange::floating(0.0, 10.0)).unwrap();

        assert_eq!(n.range(), NumericRange::floating(0.0, 10.0));
        assert_eq!(n.raw_range(), NumericRange::signed(0, 1000));
        assert_eq!(n.to_string(), "int32(0, 1000) / 100");
    }

    #[test]
    fn test_to_raw_rounds_and_checks_range() {
        let mut n = Numeric::new(Subtype::Int32).unwrap();
        n.set_divisor(100).unwrap();
        n.set_range(NumericRange::floating(0.0, 10.0)).unwrap();

        assert_eq!(n.to_raw(Number::Floating(3.14)), Ok(Number::Signed(314)));
        assert_eq!(n.to_raw(Number::Signed(10)), Ok(Number::Signed(1000)));
        assert!(n.to_raw(Number::Floating(10.01)).is_err());
        assert!(n.to_raw(Number::Floating(-0.5)).is_err());
        assert_eq!(n.to_real(Number::Signed(314)), Number::Floating(3.14));
    }

    #[test]
    fn test_divisor_zero_rejected() {
        let mut n = Numeric::new(Subtype::Uint16).unwrap();
        assert_eq!(n.set_divisor(0), Err(SchemaError::InvalidDivisor));
        assert_eq!(n.divisor(), 1);
    }

    #[test]
    fn test_divisor_rejected_when_range_stops_fitting() {
        let mut n = Numeric::new(Subtype::Uint8).unwrap();
        n.set_range(NumericRange::unsigned(0, 200)).unwrap();
        assert!(n.set_divisor(2).is_err());
        assert_eq!(n.divisor(), 1);
        assert_eq!(n.raw_range(), NumericRange::unsigned(0, 200));
    }

    #[test]
    fn test_range_kind_mismatch_rejected() {
        let mut n = Numeric::new(Subtype::Uint8).unwrap();
        assert!(n.set_range(NumericRange::signed(0, 10)).is_err());
        assert!(n.set_range(NumericRange::unsigned(5, 1)).is_err());
        assert!(n.set_range(NumericRange::unsigned(0, 256)).is_err());
        assert!(!n.has_range());

        let mut n = Numeric::new(Subtype::Int8).unwrap();
        assert!(n.set_range(NumericRange::unsigned(0, 10)).is_err());
        assert!(n.set_range(NumericRange::signed(-128, 127)).is_ok());
    }

    #[test]
    fn test_modulus_wraps() {
        let mut n = Numeric::new(Subtype::Uint16).unwrap();
        n.set_modulus(360.0).unwrap();
        assert_eq!(n.raw_modulus(), Number::Unsigned(360));
        assert_eq!(n.to_raw(Number::Signed(370)), Ok(Number::Unsigned(10)));
        assert_eq!(n.to_raw(Number::Signed(-10)), Ok(Number::Unsigned(350)));
    }

    #[test]
    fn test_modulus_validation() {
        let mut n = Numeric::new(Subtype::Uint8).unwrap();
        assert!(n.set_modulus(0.0).is_err());
        assert!(n.set_modulus(-1.0).is_err());
        assert!(n.set_modulus(257.0).is_err());
        assert!(n.set_modulus(256.0).is_ok());
        assert!(!Numeric::new(Subtype::Int8).unwrap().has_modulus());
    }

    #[test]
    fn test_float_numeric() {
        let mut n = Numeric::new(Subtype::Float64).unwrap();
        n.set_range(NumericRange::signed(-1, 1)).unwrap();
        assert_eq!(n.raw_range(), NumericRange::floating(-1.0, 1.0));
        assert_eq!(n.to_raw(Number::Floating(0.5)), Ok(Number::Floating(0.5)));
        assert!(n.to_raw(Number::Floating(1.5)).is_err());
    }

    #[test]
    fn test_domain_check_without_range() {
        let n = Numeric::new(Subtype::Int8).unwrap();
        assert_eq!(n.to_raw(Number::Signed(-128)), Ok(Number::Signed(-128)));
        assert!(n.to_raw(Number::Signed(128)).is_err());
        assert!(n.to_raw(Number::Floating(f64::INFINITY)).is_err());
        assert!(n.to_raw(Number::NaN).is_err());
    }
}
