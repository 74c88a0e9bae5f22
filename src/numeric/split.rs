//! Trie range decomposition
//!
//! Splits a closed interval of sortable values into the fewest sub-ranges that
//! line up with trie levels. At each level the unaligned fringes are emitted at
//! the current shift, the inner part moves up one level, and the remaining
//! middle is emitted at the coarsest shift that still fits.
//!
//! Emission order is low fringe then high fringe per level, from the finest
//! shift to the coarsest. Because the shift marker leads every prefix-coded
//! term, that order is strictly ascending in byte order, which is what a
//! forward-only term walk needs.

use std::collections::vec_deque::{self, VecDeque};

use super::kind::NumericKind;
use super::prefix_coded::prefix_code;

/// One sub-range as a pair of prefix-coded bounds at the same shift
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubRange {
    pub lower: Vec<u8>,
    pub upper: Vec<u8>,
}

/// FIFO of sub-ranges, consumed one pair at a time
#[derive(Clone, Debug, Default)]
pub struct SubRangeQueue {
    ranges: VecDeque<SubRange>,
}

impl SubRangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, lower: Vec<u8>, upper: Vec<u8>) {
        debug_assert!(lower <= upper, "sub-range bounds out of order");
        debug_assert!(
            self.ranges.back().map_or(true, |last| last.upper < lower),
            "sub-ranges must be pushed in ascending order"
        );
        self.ranges.push_back(SubRange { lower, upper });
    }

    pub fn pop(&mut self) -> Option<SubRange> {
        self.ranges.pop_front()
    }

    pub fn peek(&self) -> Option<&SubRange> {
        self.ranges.front()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, SubRange> {
        self.ranges.iter()
    }
}

/// Decompose `[low, high]` and report each sub-range as `(min, max, shift)`.
///
/// `max` has its low `shift` bits set, so every reported span is closed and
/// spans never overlap. Requires `low <= high`, both within the kind's width,
/// and `precision_step >= 1`.
pub fn split_sortable_range<F>(
    kind: NumericKind,
    low: u64,
    high: u64,
    precision_step: u32,
    mut sink: F,
) where
    F: FnMut(u64, u64, u32),
{
    debug_assert!(low <= high, "inverted range must be handled by the caller");
    debug_assert!(high <= kind.max_sortable());
    debug_assert!(precision_step >= 1);

    let bits = kind.bits();
    let mut emit = |min: u64, max: u64, shift: u32| {
        sink(min, max | ((1u64 << shift) - 1), shift);
    };

    let (mut min, mut max) = (low, high);
    let mut shift = 0u32;
    loop {
        if shift.saturating_add(precision_step) >= bits {
            emit(min, max, shift);
            break;
        }

        let diff = 1u64 << (shift + precision_step);
        let mask = ((1u64 << precision_step) - 1) << shift;
        let has_lower = min & mask != 0;
        let has_upper = max & mask != mask;

        let next_min = (if has_lower { min.wrapping_add(diff) } else { min }) & !mask;
        let next_max = (if has_upper { max.wrapping_sub(diff) } else { max }) & !mask;
        let lower_wrapped = next_min < min;
        let upper_wrapped = next_max > max;

        if next_min > next_max || lower_wrapped || upper_wrapped {
            emit(min, max, shift);
            break;
        }

        if has_lower {
            emit(min, min | mask, shift);
        }
        if has_upper {
            emit(max & !mask, max, shift);
        }

        min = next_min;
        max = next_max;
        shift += precision_step;
    }
}

/// Decompose `[low, high]` into a queue of prefix-coded sub-ranges
pub fn split_range(kind: NumericKind, low: u64, high: u64, precision_step: u32) -> SubRangeQueue {
    let mut queue = SubRangeQueue::new();
    split_sortable_range(kind, low, high, precision_step, |min, max, shift| {
        queue.push(prefix_code(kind, min, shift), prefix_code(kind, max, shift));
    });
    queue
}

/// Upper bound on the number of distinct terms a range walk can visit:
/// `(ceil(bits/step) - 1) * (2^step - 1) * 2 + (2^step - 1)`, saturating.
pub fn max_sub_range_terms(bits: u32, precision_step: u32) -> u64 {
    let step = precision_step.max(1);
    let terms_per_value = u64::from(bits.div_ceil(step));
    let per_level = 1u64
        .checked_shl(step)
        .map(|v| v - 1)
        .unwrap_or(u64::MAX);

    (terms_per_value - 1)
        .saturating_mul(per_level)
        .saturating_mul(2)
        .saturating_add(per_level)
}

/// Upper bound on the number of sub-ranges: two fringes per level plus the middle
pub fn sub_range_count_bound(bits: u32, precision_step: u32) -> usize {
    let step = precision_step.max(1);
    let levels = bits.div_ceil(step) as usize;
    2 * levels - 1
}
