//! Core types for numeric field segments

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense document number within a segment (0..max_doc)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocNo(pub u32);

impl DocNo {
    pub const MAX: DocNo = DocNo(u32::MAX);

    pub fn new(n: u32) -> Self {
        Self(n)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DocNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc_{}", self.0)
    }
}

/// Position of a term in its dictionary, also the index of its postings
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TermOrdinal(pub u64);

impl TermOrdinal {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Per-field statistics collected while indexing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStatistics {
    /// Number of documents with a value in this field
    pub doc_count: u64,
    /// Number of values indexed (a document may hold several)
    pub value_count: u64,
    /// Number of distinct trie terms
    pub term_count: u64,
}
