//! Term filter for numeric trie ranges
//!
//! The query range is decomposed once, up front, into a queue of prefix-coded
//! sub-ranges. The walk then consumes the queue front to back: a term above
//! the active upper bound either steps to the next sub-range (when the term
//! already lies past its lower bound) or triggers a seek to that lower bound.

use tracing::{debug, trace};

use super::filtered::{AcceptStatus, TermFilter};
use super::numeric_range::NumericRangeQuery;
use crate::numeric::{split_range, SubRange, SubRangeQueue};

/// Sub-range state of one range walk over one term dictionary
#[derive(Debug, Clone, Default)]
pub struct NumericRangeTermsEnum {
    current_lower: Option<Vec<u8>>,
    current_upper: Option<Vec<u8>>,
    queue: SubRangeQueue,
}

impl NumericRangeTermsEnum {
    /// Decompose the query's range. An empty range produces an exhausted enum.
    pub fn new(query: &NumericRangeQuery) -> Self {
        let Some((low, high)) = sortable_bounds(query) else {
            debug!(query = %query, "numeric range is empty");
            return Self::empty();
        };

        let queue = split_range(query.kind(), low, high, query.precision_step());
        debug!(
            query = %query,
            low,
            high,
            sub_ranges = queue.len(),
            "decomposed numeric range"
        );

        Self {
            current_lower: None,
            current_upper: None,
            queue,
        }
    }

    /// An enum that matches nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sub-ranges not yet activated
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Whether no sub-range is active or queued
    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty() && self.current_upper.is_none()
    }

    pub fn current_lower(&self) -> Option<&[u8]> {
        self.current_lower.as_deref()
    }

    pub fn current_upper(&self) -> Option<&[u8]> {
        self.current_upper.as_deref()
    }

    fn activate(&mut self, range: SubRange) {
        debug_assert!(
            self.current_upper
                .as_ref()
                .map_or(true, |upper| *upper <= range.lower),
            "the current upper bound must not exceed the next lower bound"
        );
        self.current_lower = Some(range.lower);
        self.current_upper = Some(range.upper);
    }
}

impl TermFilter for NumericRangeTermsEnum {
    fn next_seek_term(&mut self, current: Option<&[u8]>) -> Option<Vec<u8>> {
        while let Some(range) = self.queue.pop() {
            // A sub-range entirely below the current term can never match
            if current.map_or(false, |term| term > range.upper.as_slice()) {
                self.activate(range);
                continue;
            }

            let target = match current {
                Some(term) if term > range.lower.as_slice() => term.to_vec(),
                _ => range.lower.clone(),
            };
            self.activate(range);
            return Some(target);
        }

        self.current_lower = None;
        self.current_upper = None;
        None
    }

    fn accept(&mut self, term: &[u8]) -> AcceptStatus {
        while self
            .current_upper
            .as_deref()
            .map_or(true, |upper| term > upper)
        {
            let Some(next) = self.queue.peek() else {
                return AcceptStatus::End;
            };
            // Seek only when the term is still short of the next sub-range
            if term < next.lower.as_slice() {
                return AcceptStatus::NoAndSeek;
            }
            if let Some(range) = self.queue.pop() {
                self.activate(range);
            }
        }

        trace!(term = ?term, "accepted numeric term");
        AcceptStatus::Yes
    }
}

/// Translate the query bounds to an inclusive sortable interval.
///
/// `None` means the range is empty: an exclusive bound already at the domain
/// edge, or bounds that cross after adjustment.
pub(crate) fn sortable_bounds(query: &NumericRangeQuery) -> Option<(u64, u64)> {
    let kind = query.kind();

    let mut low = query
        .min()
        .map_or(kind.unbounded_low(), |v| v.to_sortable());
    if query.min().is_some() && !query.includes_min() {
        if low == kind.max_sortable() {
            return None;
        }
        low += 1;
    }

    let mut high = query
        .max()
        .map_or(kind.unbounded_high(), |v| v.to_sortable());
    if query.max().is_some() && !query.includes_max() {
        if high == kind.min_sortable() {
            return None;
        }
        high -= 1;
    }

    (low <= high).then_some((low, high))
}
