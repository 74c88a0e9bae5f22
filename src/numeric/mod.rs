//! Numeric trie encoding
//!
//! - `kind`: the four numeric kinds and tagged values
//! - `sortable`: order-preserving integer encodings
//! - `prefix_coded`: trie terms (shift marker + truncated big-endian bits)
//! - `split`: decomposition of a sortable interval into trie sub-ranges

mod kind;
mod prefix_coded;
mod sortable;
mod split;

pub use kind::*;
pub use prefix_coded::*;
pub use sortable::*;
pub use split::*;
