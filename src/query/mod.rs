//! Numeric range queries over trie fields
//!
//! - `NumericRangeQuery`: immutable range descriptor (field, kind, step, bounds)
//! - `NumericRangeTermsEnum`: sub-range queue deciding which terms match
//! - `FilteredTermsEnum`: drives a term filter against a seekable term source
//! - `QueryContext`: fields of one segment plus a range result cache
//!
//! # Example
//!
//! ```rust
//! use numtrie::config::NumericFieldConfig;
//! use numtrie::numeric::{NumericKind, NumericValue};
//! use numtrie::query::NumericRangeQuery;
//! use numtrie::segment::{DocNo, NumericFieldReader};
//!
//! let values = (5..10).map(|v| (DocNo(v as u32), NumericValue::Long(v)));
//! let reader = NumericFieldReader::from_values(
//!     "count",
//!     NumericFieldConfig::new(NumericKind::Int64),
//!     values,
//! )
//! .unwrap();
//!
//! let query = NumericRangeQuery::new_i64_default("count", Some(6), Some(8), false, true);
//! let docs = query.execute(&reader).unwrap();
//! assert_eq!(docs.iter().collect::<Vec<_>>(), vec![7, 8]);
//! ```

pub mod context;
pub mod filtered;
pub mod numeric_range;
pub mod range_terms;

pub use context::{FilterCache, QueryContext, QueryContextBuilder};
pub use filtered::{AcceptStatus, FilteredTermsEnum, TermFilter};
pub use numeric_range::NumericRangeQuery;
pub use range_terms::NumericRangeTermsEnum;
