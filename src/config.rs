use serde::{Deserialize, Serialize};

use crate::error::{NumtrieError, Result};
use crate::numeric::NumericKind;

/// Precision step used when a query or field does not name one
pub const DEFAULT_PRECISION_STEP: u32 = 4;

/// Numeric field configuration
///
/// The query precision step must equal the field's step or be a multiple of
/// it, otherwise the query would look for shifts that were never indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericFieldConfig {
    pub kind: NumericKind,
    #[serde(default = "default_precision_step")]
    pub precision_step: u32,
}

fn default_precision_step() -> u32 {
    DEFAULT_PRECISION_STEP
}

impl Default for NumericFieldConfig {
    fn default() -> Self {
        Self {
            kind: NumericKind::Int64,
            precision_step: DEFAULT_PRECISION_STEP,
        }
    }
}

impl NumericFieldConfig {
    pub fn new(kind: NumericKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Set the precision step
    pub fn with_precision_step(mut self, precision_step: u32) -> Self {
        self.precision_step = precision_step;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.precision_step < 1 {
            return Err(NumtrieError::InvalidPrecisionStep(self.precision_step));
        }
        Ok(())
    }

    /// Whether a query with `query_step` can be answered from this field's terms
    pub fn supports_query_step(&self, query_step: u32) -> bool {
        let bits = self.kind.bits();
        // Steps at or beyond the value width only ever touch shift 0
        if query_step >= bits {
            return true;
        }
        self.precision_step >= 1
            && self.precision_step < bits
            && query_step % self.precision_step == 0
    }
}

/// Range execution settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RangeSettings {
    /// Cache executed range bitmaps per query
    pub filter_cache: bool,
    /// Maximum number of cached range bitmaps
    pub filter_cache_capacity: usize,
}

impl Default for RangeSettings {
    fn default() -> Self {
        Self {
            filter_cache: true,
            filter_cache_capacity: 1024,
        }
    }
}

impl RangeSettings {
    /// Disable the filter cache
    pub fn without_cache(mut self) -> Self {
        self.filter_cache = false;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.filter_cache_capacity = capacity;
        self
    }
}
