//! Sortable numeric encodings
//!
//! Every numeric kind is mapped onto an unsigned integer of the same width so
//! that unsigned ordering (and therefore big-endian byte ordering) matches the
//! numeric ordering. Integers flip the sign bit; IEEE 754 values flip all bits
//! of negative numbers and only the sign bit of positive numbers.

const SIGN_64: u64 = 1 << 63;
const SIGN_32: u32 = 1 << 31;

pub fn i64_to_sortable(value: i64) -> u64 {
    (value as u64) ^ SIGN_64
}

pub fn sortable_to_i64(bits: u64) -> i64 {
    (bits ^ SIGN_64) as i64
}

pub fn i32_to_sortable(value: i32) -> u32 {
    (value as u32) ^ SIGN_32
}

pub fn sortable_to_i32(bits: u32) -> i32 {
    (bits ^ SIGN_32) as i32
}

/// Map a double onto the unsigned line.
///
/// Negative values land in the lower half in reversed order, positive values
/// in the upper half. NaN patterns sort beyond the infinities on their side.
pub fn f64_to_sortable(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits & SIGN_64 != 0 {
        !bits
    } else {
        bits | SIGN_64
    }
}

pub fn sortable_to_f64(bits: u64) -> f64 {
    let raw = if bits & SIGN_64 != 0 {
        bits ^ SIGN_64
    } else {
        !bits
    };
    f64::from_bits(raw)
}

/// Map a float onto the unsigned line (same layout as [`f64_to_sortable`]).
pub fn f32_to_sortable(value: f32) -> u32 {
    let bits = value.to_bits();
    if bits & SIGN_32 != 0 {
        !bits
    } else {
        bits | SIGN_32
    }
}

pub fn sortable_to_f32(bits: u32) -> f32 {
    let raw = if bits & SIGN_32 != 0 {
        bits ^ SIGN_32
    } else {
        !bits
    };
    f32::from_bits(raw)
}
