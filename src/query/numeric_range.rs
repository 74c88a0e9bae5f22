//! Numeric range query - matches documents whose trie field falls in a range
//!
//! # Example
//!
//! ```rust
//! use numtrie::query::NumericRangeQuery;
//!
//! // price in (6, 8]
//! let query = NumericRangeQuery::new_i64_default("price", Some(6), Some(8), false, true);
//! assert_eq!(query.to_string(), "price:{6 TO 8]");
//! ```

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::filtered::FilteredTermsEnum;
use super::range_terms::{sortable_bounds, NumericRangeTermsEnum};
use crate::config::DEFAULT_PRECISION_STEP;
use crate::error::{NumtrieError, Result};
use crate::numeric::{NumericKind, NumericValue};
use crate::segment::{NumericFieldReader, SeekableTermSource};

/// Immutable description of a numeric range over one trie field
///
/// Equality and hashing cover all fields, so two queries built from the same
/// arguments share a filter cache entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeQueryDef")]
pub struct NumericRangeQuery {
    field: String,
    kind: NumericKind,
    precision_step: u32,
    min: Option<NumericValue>,
    max: Option<NumericValue>,
    min_inclusive: bool,
    max_inclusive: bool,
}

/// Unvalidated wire form
#[derive(Deserialize)]
struct RangeQueryDef {
    field: String,
    kind: NumericKind,
    #[serde(default = "default_precision_step")]
    precision_step: u32,
    #[serde(default)]
    min: Option<NumericValue>,
    #[serde(default)]
    max: Option<NumericValue>,
    #[serde(default = "default_inclusive")]
    min_inclusive: bool,
    #[serde(default = "default_inclusive")]
    max_inclusive: bool,
}

fn default_precision_step() -> u32 {
    DEFAULT_PRECISION_STEP
}

fn default_inclusive() -> bool {
    true
}

impl TryFrom<RangeQueryDef> for NumericRangeQuery {
    type Error = NumtrieError;

    fn try_from(def: RangeQueryDef) -> Result<Self> {
        NumericRangeQuery::new(
            def.field,
            def.kind,
            def.precision_step,
            def.min,
            def.max,
            def.min_inclusive,
            def.max_inclusive,
        )
    }
}

impl NumericRangeQuery {
    /// Create a range query for any kind
    ///
    /// Fails if `precision_step < 1` or a bound's kind differs from `kind`.
    pub fn new(
        field: impl Into<String>,
        kind: NumericKind,
        precision_step: u32,
        min: Option<NumericValue>,
        max: Option<NumericValue>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Result<Self> {
        if precision_step < 1 {
            return Err(NumtrieError::InvalidPrecisionStep(precision_step));
        }
        for bound in [min, max].into_iter().flatten() {
            if bound.kind() != kind {
                return Err(NumtrieError::KindMismatch {
                    expected: kind,
                    actual: bound.kind(),
                });
            }
        }

        Ok(Self {
            field: field.into(),
            kind,
            precision_step,
            min,
            max,
            min_inclusive,
            max_inclusive,
        })
    }

    pub fn new_i64(
        field: impl Into<String>,
        precision_step: u32,
        min: Option<i64>,
        max: Option<i64>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Result<Self> {
        Self::new(
            field,
            NumericKind::Int64,
            precision_step,
            min.map(NumericValue::Long),
            max.map(NumericValue::Long),
            min_inclusive,
            max_inclusive,
        )
    }

    pub fn new_i32(
        field: impl Into<String>,
        precision_step: u32,
        min: Option<i32>,
        max: Option<i32>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Result<Self> {
        Self::new(
            field,
            NumericKind::Int32,
            precision_step,
            min.map(NumericValue::Int),
            max.map(NumericValue::Int),
            min_inclusive,
            max_inclusive,
        )
    }

    pub fn new_f64(
        field: impl Into<String>,
        precision_step: u32,
        min: Option<f64>,
        max: Option<f64>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Result<Self> {
        Self::new(
            field,
            NumericKind::Float64,
            precision_step,
            min.map(NumericValue::Double),
            max.map(NumericValue::Double),
            min_inclusive,
            max_inclusive,
        )
    }

    pub fn new_f32(
        field: impl Into<String>,
        precision_step: u32,
        min: Option<f32>,
        max: Option<f32>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Result<Self> {
        Self::new(
            field,
            NumericKind::Float32,
            precision_step,
            min.map(NumericValue::Float),
            max.map(NumericValue::Float),
            min_inclusive,
            max_inclusive,
        )
    }

    /// Same as [`new_i64`](Self::new_i64) with the default precision step
    pub fn new_i64_default(
        field: impl Into<String>,
        min: Option<i64>,
        max: Option<i64>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Self {
        Self::unchecked(
            field.into(),
            NumericKind::Int64,
            min.map(NumericValue::Long),
            max.map(NumericValue::Long),
            min_inclusive,
            max_inclusive,
        )
    }

    pub fn new_i32_default(
        field: impl Into<String>,
        min: Option<i32>,
        max: Option<i32>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Self {
        Self::unchecked(
            field.into(),
            NumericKind::Int32,
            min.map(NumericValue::Int),
            max.map(NumericValue::Int),
            min_inclusive,
            max_inclusive,
        )
    }

    pub fn new_f64_default(
        field: impl Into<String>,
        min: Option<f64>,
        max: Option<f64>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Self {
        Self::unchecked(
            field.into(),
            NumericKind::Float64,
            min.map(NumericValue::Double),
            max.map(NumericValue::Double),
            min_inclusive,
            max_inclusive,
        )
    }

    pub fn new_f32_default(
        field: impl Into<String>,
        min: Option<f32>,
        max: Option<f32>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Self {
        Self::unchecked(
            field.into(),
            NumericKind::Float32,
            min.map(NumericValue::Float),
            max.map(NumericValue::Float),
            min_inclusive,
            max_inclusive,
        )
    }

    // Typed bounds with the default step cannot fail validation
    fn unchecked(
        field: String,
        kind: NumericKind,
        min: Option<NumericValue>,
        max: Option<NumericValue>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Self {
        Self {
            field,
            kind,
            precision_step: DEFAULT_PRECISION_STEP,
            min,
            max,
            min_inclusive,
            max_inclusive,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn kind(&self) -> NumericKind {
        self.kind
    }

    pub fn precision_step(&self) -> u32 {
        self.precision_step
    }

    /// Lower bound, `None` if unbounded
    pub fn min(&self) -> Option<NumericValue> {
        self.min
    }

    /// Upper bound, `None` if unbounded
    pub fn max(&self) -> Option<NumericValue> {
        self.max
    }

    pub fn includes_min(&self) -> bool {
        self.min_inclusive
    }

    pub fn includes_max(&self) -> bool {
        self.max_inclusive
    }

    /// Get the cache key for this query
    pub fn cache_key(&self) -> String {
        format!("numeric_range:{}:{}:{}", self.kind, self.precision_step, self)
    }

    /// The inclusive sortable interval this query covers, `None` if empty
    pub fn sortable_range(&self) -> Option<(u64, u64)> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min.to_sortable() > max.to_sortable() {
                return None;
            }
        }
        sortable_bounds(self)
    }

    /// Build the term filter for one walk.
    ///
    /// When both bounds are present and `min > max` in sortable order, the
    /// filter is exhausted from the start and no decomposition happens.
    pub fn build_enumerator(&self) -> NumericRangeTermsEnum {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min.to_sortable() > max.to_sortable() {
                debug!(query = %self, "numeric range bounds are inverted");
                return NumericRangeTermsEnum::empty();
            }
        }
        NumericRangeTermsEnum::new(self)
    }

    /// Walk `source` yielding only terms inside this range
    pub fn terms_enum<S: SeekableTermSource>(
        &self,
        source: S,
    ) -> FilteredTermsEnum<NumericRangeTermsEnum, S> {
        FilteredTermsEnum::new(self.build_enumerator(), source)
    }

    /// Union of the postings of all matching terms in one field segment
    pub fn execute(&self, reader: &NumericFieldReader) -> Result<RoaringBitmap> {
        if reader.field() != self.field {
            return Err(NumtrieError::InvalidRequest(format!(
                "query on field '{}' executed against field '{}'",
                self.field,
                reader.field()
            )));
        }
        if reader.kind() != self.kind {
            return Err(NumtrieError::KindMismatch {
                expected: reader.kind(),
                actual: self.kind,
            });
        }
        if !reader.config().supports_query_step(self.precision_step) {
            return Err(NumtrieError::InvalidRequest(format!(
                "precision step {} is not a multiple of the field's step {}",
                self.precision_step,
                reader.config().precision_step
            )));
        }

        let mut results = RoaringBitmap::new();
        let mut terms = self.terms_enum(reader.cursor());
        let mut matched_terms = 0usize;
        while terms.next_term().is_some() {
            if let Some(docs) = terms.ordinal().and_then(|ord| reader.postings(ord)) {
                results |= docs;
            }
            matched_terms += 1;
        }

        debug!(
            query = %self,
            matched_terms,
            seeks = terms.seek_count(),
            docs = results.len(),
            "executed numeric range"
        );
        Ok(results)
    }
}

impl fmt::Display for NumericRangeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.field)?;
        f.write_str(if self.min_inclusive { "[" } else { "{" })?;
        match &self.min {
            Some(v) => write!(f, "{}", v)?,
            None => f.write_str("*")?,
        }
        f.write_str(" TO ")?;
        match &self.max {
            Some(v) => write!(f, "{}", v)?,
            None => f.write_str("*")?,
        }
        f.write_str(if self.max_inclusive { "]" } else { "}" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_precision_step_validated() {
        let err = NumericRangeQuery::new_i64("price", 0, Some(1), Some(2), true, true).unwrap_err();
        assert!(matches!(err, NumtrieError::InvalidPrecisionStep(0)));
        assert!(NumericRangeQuery::new_f32("score", 1, None, None, true, true).is_ok());
    }

    #[test]
    fn test_bound_kind_validated() {
        let err = NumericRangeQuery::new(
            "price",
            NumericKind::Int64,
            4,
            Some(NumericValue::Int(1)),
            None,
            true,
            true,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NumtrieError::KindMismatch {
                expected: NumericKind::Int64,
                actual: NumericKind::Int32
            }
        ));
    }

    #[test]
    fn test_default_step_and_accessors() {
        let query = NumericRangeQuery::new_f64_default("score", Some(0.5), None, true, false);
        assert_eq!(query.field(), "score");
        assert_eq!(query.kind(), NumericKind::Float64);
        assert_eq!(query.precision_step(), 4);
        assert_eq!(query.min(), Some(NumericValue::Double(0.5)));
        assert_eq!(query.max(), None);
        assert!(query.includes_min());
        assert!(!query.includes_max());
    }

    #[test]
    fn test_display() {
        let query = NumericRangeQuery::new_i32_default("age", Some(18), Some(65), true, false);
        assert_eq!(query.to_string(), "age:[18 TO 65}");

        let query = NumericRangeQuery::new_f64_default("score", None, Some(1.5), false, true);
        assert_eq!(query.to_string(), "score:{* TO 1.5]");

        let query = NumericRangeQuery::new_i64_default("id", None, None, true, true);
        assert_eq!(query.to_string(), "id:[* TO *]");
    }

    #[test]
    fn test_equality_and_hash() {
        let a = NumericRangeQuery::new_i64_default("price", Some(1), Some(10), true, true);
        let b = NumericRangeQuery::new_i64_default("price", Some(1), Some(10), true, true);
        let c = NumericRangeQuery::new_i64_default("price", Some(1), Some(10), true, false);
        let d = NumericRangeQuery::new_i64("price", 8, Some(1), Some(10), true, true).unwrap();
        let e = NumericRangeQuery::new_i32_default("price", Some(1), Some(10), true, true);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_ne!(a, e);

        let set: HashSet<_> = [a, b, c, d, e].into_iter().collect();
        assert_eq!(set.len(), 4);

        let nan = NumericRangeQuery::new_f64_default("x", Some(f64::NAN), Some(f64::NAN), true, true);
        assert_eq!(nan, nan.clone());
    }

    #[test]
    fn test_inverted_bounds_build_empty_enum() {
        let query = NumericRangeQuery::new_i64_default("price", Some(10), Some(1), true, true);
        let terms = query.build_enumerator();
        assert!(terms.is_exhausted());
        assert_eq!(terms.remaining(), 0);
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let query = NumericRangeQuery::new_i64("price", 8, Some(5), None, false, true).unwrap();
        let json = serde_json::to_value(&query).unwrap();
        let back: NumericRangeQuery = serde_json::from_value(json).unwrap();
        assert_eq!(back, query);

        let defaults: NumericRangeQuery = serde_json::from_value(serde_json::json!({
            "field": "age",
            "kind": "int",
            "max": { "int": 30 }
        }))
        .unwrap();
        assert_eq!(defaults.precision_step(), DEFAULT_PRECISION_STEP);
        assert!(defaults.includes_min() && defaults.includes_max());
        assert_eq!(defaults.to_string(), "age:[* TO 30]");

        let invalid = serde_json::from_value::<NumericRangeQuery>(serde_json::json!({
            "field": "age",
            "kind": "int",
            "precision_step": 0
        }));
        assert!(invalid.is_err());
    }

    #[test]
    fn test_cache_key() {
        let query = NumericRangeQuery::new_i64_default("price", Some(100), Some(500), true, true);
        assert_eq!(query.cache_key(), "numeric_range:int64:4:price:[100 TO 500]");
    }
}
