pub mod config;
pub mod error;
pub mod numeric;
pub mod query;
pub mod segment;

pub use config::{NumericFieldConfig, RangeSettings, DEFAULT_PRECISION_STEP};
pub use error::{NumtrieError, Result};
pub use numeric::{NumericKind, NumericValue};
pub use query::{NumericRangeQuery, QueryContext};
pub use segment::{DocNo, NumericFieldReader, NumericFieldWriter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
