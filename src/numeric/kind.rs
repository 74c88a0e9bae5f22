//! Numeric kinds and values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::prefix_coded::{SHIFT_START_INT, SHIFT_START_LONG};
use super::sortable::{
    f32_to_sortable, f64_to_sortable, i32_to_sortable, i64_to_sortable, sortable_to_f32,
    sortable_to_f64, sortable_to_i32, sortable_to_i64,
};
use crate::error::NumtrieError;

/// The four numeric encodings a trie field can hold
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    #[serde(alias = "int")]
    Int32,
    #[serde(alias = "long")]
    Int64,
    #[serde(alias = "float")]
    Float32,
    #[serde(alias = "double")]
    Float64,
}

impl NumericKind {
    /// Width of the sortable encoding in bits
    pub fn bits(self) -> u32 {
        match self {
            NumericKind::Int32 | NumericKind::Float32 => 32,
            NumericKind::Int64 | NumericKind::Float64 => 64,
        }
    }

    /// Smallest sortable value of the domain
    pub fn min_sortable(self) -> u64 {
        0
    }

    /// Largest sortable value of the domain
    pub fn max_sortable(self) -> u64 {
        match self.bits() {
            32 => u32::MAX as u64,
            _ => u64::MAX,
        }
    }

    /// Lower bound used when a range has no minimum.
    ///
    /// Floating kinds start at negative infinity so negative NaN patterns
    /// never match an open range.
    pub fn unbounded_low(self) -> u64 {
        match self {
            NumericKind::Float32 => f32_to_sortable(f32::NEG_INFINITY) as u64,
            NumericKind::Float64 => f64_to_sortable(f64::NEG_INFINITY),
            NumericKind::Int32 | NumericKind::Int64 => self.min_sortable(),
        }
    }

    /// Upper bound used when a range has no maximum
    pub fn unbounded_high(self) -> u64 {
        match self {
            NumericKind::Float32 => f32_to_sortable(f32::INFINITY) as u64,
            NumericKind::Float64 => f64_to_sortable(f64::INFINITY),
            NumericKind::Int32 | NumericKind::Int64 => self.max_sortable(),
        }
    }

    /// First shift marker byte of prefix-coded terms of this kind
    pub fn shift_marker_base(self) -> u8 {
        match self.bits() {
            32 => SHIFT_START_INT,
            _ => SHIFT_START_LONG,
        }
    }

    /// Parse a value of this kind from its textual form
    pub fn parse_value(self, s: &str) -> Result<NumericValue, NumtrieError> {
        let s = s.trim();
        let invalid = || NumtrieError::InvalidRequest(format!("cannot parse '{}' as {}", s, self));
        Ok(match self {
            NumericKind::Int32 => NumericValue::Int(s.parse().map_err(|_| invalid())?),
            NumericKind::Int64 => NumericValue::Long(s.parse().map_err(|_| invalid())?),
            NumericKind::Float32 => NumericValue::Float(s.parse().map_err(|_| invalid())?),
            NumericKind::Float64 => NumericValue::Double(s.parse().map_err(|_| invalid())?),
        })
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumericKind::Int32 => "int32",
            NumericKind::Int64 => "int64",
            NumericKind::Float32 => "float32",
            NumericKind::Float64 => "float64",
        };
        f.write_str(name)
    }
}

impl FromStr for NumericKind {
    type Err = NumtrieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "int" | "int32" | "i32" => Ok(NumericKind::Int32),
            "long" | "int64" | "i64" => Ok(NumericKind::Int64),
            "float" | "float32" | "f32" => Ok(NumericKind::Float32),
            "double" | "float64" | "f64" => Ok(NumericKind::Float64),
            other => Err(NumtrieError::InvalidRequest(format!(
                "unknown numeric kind: {}",
                other
            ))),
        }
    }
}

/// A single numeric value tagged with its kind
///
/// Equality and hashing compare bit patterns, so `NaN == NaN` and
/// `-0.0 != 0.0`. This is the identity used for query caching, not numeric
/// comparison.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl NumericValue {
    pub fn kind(&self) -> NumericKind {
        match self {
            NumericValue::Int(_) => NumericKind::Int32,
            NumericValue::Long(_) => NumericKind::Int64,
            NumericValue::Float(_) => NumericKind::Float32,
            NumericValue::Double(_) => NumericKind::Float64,
        }
    }

    /// Sortable encoding, zero-extended to 64 bits for the 32-bit kinds
    pub fn to_sortable(&self) -> u64 {
        match *self {
            NumericValue::Int(v) => i32_to_sortable(v) as u64,
            NumericValue::Long(v) => i64_to_sortable(v),
            NumericValue::Float(v) => f32_to_sortable(v) as u64,
            NumericValue::Double(v) => f64_to_sortable(v),
        }
    }

    /// Inverse of [`to_sortable`](Self::to_sortable); 32-bit kinds use the low word
    pub fn from_sortable(kind: NumericKind, bits: u64) -> Self {
        match kind {
            NumericKind::Int32 => NumericValue::Int(sortable_to_i32(bits as u32)),
            NumericKind::Int64 => NumericValue::Long(sortable_to_i64(bits)),
            NumericKind::Float32 => NumericValue::Float(sortable_to_f32(bits as u32)),
            NumericKind::Float64 => NumericValue::Double(sortable_to_f64(bits)),
        }
    }

    fn raw_bits(&self) -> u64 {
        match *self {
            NumericValue::Int(v) => v as u32 as u64,
            NumericValue::Long(v) => v as u64,
            NumericValue::Float(v) => v.to_bits() as u64,
            NumericValue::Double(v) => v.to_bits(),
        }
    }
}

impl PartialEq for NumericValue {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.raw_bits() == other.raw_bits()
    }
}

impl Eq for NumericValue {}

impl Hash for NumericValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.raw_bits().hash(state);
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Int(v) => write!(f, "{}", v),
            NumericValue::Long(v) => write!(f, "{}", v),
            NumericValue::Float(v) => write!(f, "{}", v),
            NumericValue::Double(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for NumericValue {
    fn from(v: i32) -> Self {
        NumericValue::Int(v)
    }
}

impl From<i64> for NumericValue {
    fn from(v: i64) -> Self {
        NumericValue::Long(v)
    }
}

impl From<f32> for NumericValue {
    fn from(v: f32) -> Self {
        NumericValue::Float(v)
    }
}

impl From<f64> for NumericValue {
    fn from(v: f64) -> Self {
        NumericValue::Double(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_widths() {
        assert_eq!(NumericKind::Int32.bits(), 32);
        assert_eq!(NumericKind::Float32.bits(), 32);
        assert_eq!(NumericKind::Int64.bits(), 64);
        assert_eq!(NumericKind::Float64.bits(), 64);
        assert_eq!(NumericKind::Int32.max_sortable(), u32::MAX as u64);
    }

    #[test]
    fn test_unbounded_sentinels() {
        assert_eq!(NumericKind::Int64.unbounded_low(), 0);
        assert_eq!(NumericKind::Int64.unbounded_high(), u64::MAX);
        assert_eq!(
            NumericKind::Float64.unbounded_low(),
            NumericValue::Double(f64::NEG_INFINITY).to_sortable()
        );
        assert!(
            NumericKind::Float32.unbounded_high()
                < NumericValue::Float(f32::NAN).to_sortable()
        );
    }

    #[test]
    fn test_sortable_roundtrip_per_kind() {
        let values = [
            NumericValue::Int(-3),
            NumericValue::Long(1 << 40),
            NumericValue::Float(-0.5),
            NumericValue::Double(1e300),
        ];
        for v in values {
            assert_eq!(NumericValue::from_sortable(v.kind(), v.to_sortable()), v);
        }
    }

    #[test]
    fn test_bitwise_equality() {
        assert_eq!(NumericValue::Double(f64::NAN), NumericValue::Double(f64::NAN));
        assert_ne!(NumericValue::Double(0.0), NumericValue::Double(-0.0));
        assert_ne!(NumericValue::Int(1), NumericValue::Long(1));
    }

    #[test]
    fn test_parse_kind_and_value() {
        assert_eq!("long".parse::<NumericKind>().unwrap(), NumericKind::Int64);
        assert_eq!("F32".parse::<NumericKind>().unwrap(), NumericKind::Float32);
        assert!("decimal".parse::<NumericKind>().is_err());

        assert_eq!(
            NumericKind::Int32.parse_value(" 17 ").unwrap(),
            NumericValue::Int(17)
        );
        assert!(NumericKind::Int32.parse_value("1.5").is_err());
    }

    #[test]
    fn test_value_serde() {
        let json = serde_json::to_string(&NumericValue::Long(5)).unwrap();
        assert_eq!(json, r#"{"long":5}"#);
        let kind: NumericKind = serde_json::from_str(r#""double""#).unwrap();
        assert_eq!(kind, NumericKind::Float64);
    }
}
