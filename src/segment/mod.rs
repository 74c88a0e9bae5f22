//! Segment-level storage for numeric trie fields
//!
//! # Architecture
//!
//! - `TermDictionary`: FST over prefix-coded terms, walked by a seekable `TermCursor`
//! - `NumericFieldWriter`: expands values into trie terms and postings
//! - `NumericFieldReader`: immutable field of one segment queried by range

mod numeric_field;
mod term_dict;
mod types;

pub use numeric_field::*;
pub use term_dict::*;
pub use types::*;
