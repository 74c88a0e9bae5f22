//! Numeric trie field index
//!
//! The writer expands every value into its trie terms (one per shift) and
//! accumulates a posting bitmap per term. `finish` freezes the terms into an
//! FST dictionary whose ordinals index the postings array.

use std::collections::HashMap;

use roaring::RoaringBitmap;
use tracing::debug;

use super::term_dict::{TermCursor, TermDictionary, TermDictionaryBuilder};
use super::types::{DocNo, FieldStatistics, TermOrdinal};
use crate::config::NumericFieldConfig;
use crate::error::{NumtrieError, Result};
use crate::numeric::{trie_terms, NumericKind, NumericValue};

/// Mutable per-field index used while a segment is being built
#[derive(Debug, Clone)]
pub struct NumericFieldWriter {
    field: String,
    config: NumericFieldConfig,
    terms: HashMap<Vec<u8>, RoaringBitmap>,
    docs: RoaringBitmap,
    value_count: u64,
}

impl NumericFieldWriter {
    pub fn new(field: impl Into<String>, config: NumericFieldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            field: field.into(),
            config,
            terms: HashMap::new(),
            docs: RoaringBitmap::new(),
            value_count: 0,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Index one value for a document
    pub fn add(&mut self, docno: DocNo, value: NumericValue) -> Result<()> {
        if value.kind() != self.config.kind {
            return Err(NumtrieError::KindMismatch {
                expected: self.config.kind,
                actual: value.kind(),
            });
        }

        for term in trie_terms(value, self.config.precision_step)? {
            self.terms.entry(term).or_default().insert(docno.as_u32());
        }
        self.docs.insert(docno.as_u32());
        self.value_count += 1;
        Ok(())
    }

    /// Number of distinct trie terms so far
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Freeze into an immutable reader
    pub fn finish(self) -> Result<NumericFieldReader> {
        let mut entries: Vec<(Vec<u8>, RoaringBitmap)> = self.terms.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut builder = TermDictionaryBuilder::with_capacity(entries.len());
        let mut postings = Vec::with_capacity(entries.len());
        for (ordinal, (term, docs)) in entries.into_iter().enumerate() {
            builder.add(term, ordinal as u64);
            postings.push(docs);
        }
        let dict = builder.build()?;

        let stats = FieldStatistics {
            doc_count: self.docs.len(),
            value_count: self.value_count,
            term_count: postings.len() as u64,
        };
        debug!(
            field = %self.field,
            kind = %self.config.kind,
            terms = stats.term_count,
            docs = stats.doc_count,
            "froze numeric field"
        );

        Ok(NumericFieldReader {
            field: self.field,
            config: self.config,
            dict,
            postings,
            stats,
        })
    }
}

/// Immutable numeric field of one segment
pub struct NumericFieldReader {
    field: String,
    config: NumericFieldConfig,
    dict: TermDictionary,
    postings: Vec<RoaringBitmap>,
    stats: FieldStatistics,
}

impl NumericFieldReader {
    /// Build a reader directly from `(docno, value)` pairs
    pub fn from_values<I>(field: impl Into<String>, config: NumericFieldConfig, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (DocNo, NumericValue)>,
    {
        let mut writer = NumericFieldWriter::new(field, config)?;
        for (docno, value) in values {
            writer.add(docno, value)?;
        }
        writer.finish()
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn config(&self) -> &NumericFieldConfig {
        &self.config
    }

    pub fn kind(&self) -> NumericKind {
        self.config.kind
    }

    pub fn stats(&self) -> &FieldStatistics {
        &self.stats
    }

    pub fn terms(&self) -> &TermDictionary {
        &self.dict
    }

    /// Open a seekable cursor over this field's terms
    pub fn cursor(&self) -> TermCursor<'_> {
        self.dict.cursor()
    }

    /// Documents holding the term with this ordinal
    pub fn postings(&self, ordinal: TermOrdinal) -> Option<&RoaringBitmap> {
        self.postings.get(ordinal.as_usize())
    }
}
