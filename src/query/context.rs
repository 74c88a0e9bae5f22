//! Query execution context
//!
//! The `QueryContext` holds the numeric fields of one segment and caches
//! executed range bitmaps keyed by the query itself.

use parking_lot::RwLock;
use roaring::RoaringBitmap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::numeric_range::NumericRangeQuery;
use crate::config::RangeSettings;
use crate::segment::NumericFieldReader;
use crate::Result;

/// Filter cache for reusing executed ranges
pub type FilterCache = Arc<RwLock<HashMap<NumericRangeQuery, RoaringBitmap>>>;

/// Query execution context providing access to numeric fields
pub struct QueryContext {
    /// Field name to reader
    fields: HashMap<String, Arc<NumericFieldReader>>,

    /// Range result cache
    filter_cache: FilterCache,

    settings: RangeSettings,
}

impl QueryContext {
    pub fn new(settings: RangeSettings) -> Self {
        Self {
            fields: HashMap::new(),
            filter_cache: Arc::new(RwLock::new(HashMap::new())),
            settings,
        }
    }

    /// Create a context builder
    pub fn builder() -> QueryContextBuilder {
        QueryContextBuilder::default()
    }

    /// Register a field reader, replacing any reader for the same field
    pub fn add_field(&mut self, reader: impl Into<Arc<NumericFieldReader>>) {
        let reader = reader.into();
        self.fields.insert(reader.field().to_string(), reader);
        self.filter_cache.write().clear();
    }

    pub fn field(&self, name: &str) -> Option<&Arc<NumericFieldReader>> {
        self.fields.get(name)
    }

    pub fn settings(&self) -> &RangeSettings {
        &self.settings
    }

    /// Execute a range, consulting the filter cache first.
    ///
    /// A field that is not registered holds no values and matches nothing.
    pub fn search(&self, query: &NumericRangeQuery) -> Result<RoaringBitmap> {
        let Some(reader) = self.fields.get(query.field()) else {
            debug!(field = query.field(), "range over unknown field");
            return Ok(RoaringBitmap::new());
        };

        if !self.settings.filter_cache || self.settings.filter_cache_capacity == 0 {
            return query.execute(reader);
        }

        if let Some(cached) = self.filter_cache.read().get(query) {
            return Ok(cached.clone());
        }

        let result = query.execute(reader)?;
        let mut cache = self.filter_cache.write();
        if cache.len() >= self.settings.filter_cache_capacity {
            cache.clear();
        }
        cache.insert(query.clone(), result.clone());
        Ok(result)
    }

    /// Number of cached range results
    pub fn cached_filters(&self) -> usize {
        self.filter_cache.read().len()
    }

    /// Drop every cached range result
    pub fn clear_cache(&self) {
        self.filter_cache.write().clear();
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new(RangeSettings::default())
    }
}

/// Builder for QueryContext
#[derive(Default)]
pub struct QueryContextBuilder {
    fields: Vec<Arc<NumericFieldReader>>,
    settings: Option<RangeSettings>,
}

impl QueryContextBuilder {
    pub fn field(mut self, reader: impl Into<Arc<NumericFieldReader>>) -> Self {
        self.fields.push(reader.into());
        self
    }

    pub fn settings(mut self, settings: RangeSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn build(self) -> QueryContext {
        let mut ctx = QueryContext::new(self.settings.unwrap_or_default());
        for reader in self.fields {
            ctx.add_field(reader);
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NumericFieldConfig;
    use crate::numeric::{NumericKind, NumericValue};
    use crate::segment::DocNo;

    fn price_field() -> NumericFieldReader {
        let values = [10i64, 20, 30, 40, 50]
            .into_iter()
            .enumerate()
            .map(|(i, v)| (DocNo(i as u32), NumericValue::Long(v)));
        NumericFieldReader::from_values("price", NumericFieldConfig::new(NumericKind::Int64), values)
            .unwrap()
    }

    #[test]
    fn test_search_and_cache() {
        let ctx = QueryContext::builder().field(price_field()).build();
        let query = NumericRangeQuery::new_i64_default("price", Some(20), Some(40), true, false);

        let docs = ctx.search(&query).unwrap();
        assert_eq!(docs.iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(ctx.cached_filters(), 1);

        // Equal query hits the same entry
        let same = NumericRangeQuery::new_i64_default("price", Some(20), Some(40), true, false);
        assert_eq!(ctx.search(&same).unwrap(), docs);
        assert_eq!(ctx.cached_filters(), 1);

        ctx.clear_cache();
        assert_eq!(ctx.cached_filters(), 0);
    }

    #[test]
    fn test_cache_disabled() {
        let ctx = QueryContext::builder()
            .field(price_field())
            .settings(RangeSettings::default().without_cache())
            .build();
        let query = NumericRangeQuery::new_i64_default("price", None, Some(30), true, true);
        assert_eq!(ctx.search(&query).unwrap().len(), 3);
        assert_eq!(ctx.cached_filters(), 0);
    }

    #[test]
    fn test_cache_capacity_bounded() {
        let ctx = QueryContext::builder()
            .field(price_field())
            .settings(RangeSettings::default().with_cache_capacity(2))
            .build();
        for max in 0..5 {
            let query = NumericRangeQuery::new_i64_default("price", None, Some(max * 10), true, true);
            ctx.search(&query).unwrap();
        }
        assert!(ctx.cached_filters() <= 2);
    }

    #[test]
    fn test_zero_capacity_caches_nothing() {
        let ctx = QueryContext::builder()
            .field(price_field())
            .settings(RangeSettings::default().with_cache_capacity(0))
            .build();
        let query = NumericRangeQuery::new_i64_default("price", Some(10), Some(30), true, true);
        assert_eq!(ctx.search(&query).unwrap().len(), 3);
        assert_eq!(ctx.search(&query).unwrap().len(), 3);
        assert_eq!(ctx.cached_filters(), 0);
    }

    #[test]
    fn test_unknown_field_matches_nothing() {
        let ctx = QueryContext::default();
        let query = NumericRangeQuery::new_i64_default("missing", None, None, true, true);
        assert!(ctx.search(&query).unwrap().is_empty());
    }

    #[test]
    fn test_kind_mismatch_surfaces() {
        let ctx = QueryContext::builder().field(price_field()).build();
        let query = NumericRangeQuery::new_f64_default("price", Some(1.0), None, true, true);
        assert!(ctx.search(&query).is_err());
    }
}
