//! Numeric accumulator values.

use crate::core::error::{Result, ThingError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric value as it travels on the wire.
///
/// Integers stay integers as long as every operand is an integer; mixing in
/// a float promotes the result to a float. A float result that is integral
/// and fits in `i64` folds back to an integer, so equal values always compare
/// equal. Both variants serialize as a bare number in JSON and CBOR.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Checked addition. Fails on integer overflow or a non-finite result.
    pub fn checked_add(self, rhs: Number) -> Result<Number> {
        match (self, rhs) {
            (Number::Integer(a), Number::Integer(b)) => a
                .checked_add(b)
                .map(Number::Integer)
                .ok_or_else(|| ThingError::BadRequest(format!("{} + {} overflows", a, b))),
            (a, b) => Number::finite(a.as_f64() + b.as_f64()),
        }
    }

    /// Checked subtraction. Fails on integer overflow or a non-finite result.
    pub fn checked_sub(self, rhs: Number) -> Result<Number> {
        match (self, rhs) {
            (Number::Integer(a), Number::Integer(b)) => a
                .checked_sub(b)
                .map(Number::Integer)
                .ok_or_else(|| ThingError::BadRequest(format!("{} - {} overflows", a, b))),
            (a, b) => Number::finite(a.as_f64() - b.as_f64()),
        }
    }

    /// Canonical form: integral floats within `i64` range become integers.
    #[must_use]
    pub fn normalized(self) -> Number {
        match self {
            // i64::MAX as f64 is 2^63, which is out of range
            Number::Float(f)
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
            {
                Number::Integer(f as i64)
            }
            other => other,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        match self {
            Number::Integer(_) => true,
            Number::Float(f) => f.is_finite(),
        }
    }

    fn finite(value: f64) -> Result<Number> {
        if value.is_finite() {
            Ok(Number::Float(value).normalized())
        } else {
            Err(ThingError::BadRequest(format!("{} is not finite", value)))
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number::Integer(0)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_arithmetic_stays_integer() {
        let n = Number::Integer(10).checked_sub(Number::Integer(5)).unwrap();
        assert_eq!(n, Number::Integer(5));
    }

    #[test]
    fn test_float_promotes() {
        let n = Number::Integer(1).checked_add(Number::Float(0.5)).unwrap();
        assert_eq!(n, Number::Float(1.5));
    }

    #[test]
    fn test_integral_float_result_folds_to_integer() {
        let n = Number::Integer(1)
            .checked_add(Number::Float(0.5))
            .and_then(|n| n.checked_sub(Number::Float(0.5)))
            .unwrap();
        assert_eq!(n, Number::Integer(1));
        assert_eq!(serde_json::to_string(&n).unwrap(), "1");

        let n = Number::Float(2.5).checked_add(Number::Float(7.5)).unwrap();
        assert_eq!(n, Number::Integer(10));
    }

    #[test]
    fn test_normalized_keeps_out_of_range_floats() {
        assert_eq!(Number::Float(-0.0).normalized(), Number::Integer(0));
        assert_eq!(Number::Float(1e19).normalized(), Number::Float(1e19));
        assert_eq!(Number::Float(0.25).normalized(), Number::Float(0.25));
    }

    #[test]
    fn test_overflow_is_bad_request() {
        let err = Number::Integer(i64::MAX)
            .checked_add(Number::Integer(1))
            .unwrap_err();
        assert!(matches!(err, ThingError::BadRequest(_)));
    }

    #[test]
    fn test_infinite_result_rejected() {
        let err = Number::Float(f64::MAX)
            .checked_add(Number::Float(f64::MAX))
            .unwrap_err();
        assert!(matches!(err, ThingError::BadRequest(_)));
    }

    #[test]
    fn test_json_shape_is_bare_number() {
        assert_eq!(serde_json::to_string(&Number::Integer(10)).unwrap(), "10");
        assert_eq!(serde_json::to_string(&Number::Float(2.5)).unwrap(), "2.5");
        let n: Number = serde_json::from_str("-3").unwrap();
        assert_eq!(n, Number::Integer(-3));
        let n: Number = serde_json::from_str("1e3").unwrap();
        assert_eq!(n, Number::Float(1000.0));
    }

    #[test]
    fn test_non_number_rejected() {
        assert!(serde_json::from_str::<Number>("\"10\"").is_err());
        assert!(serde_json::from_str::<Number>("null").is_err());
    }
}
