//! Prefix-coded trie terms
//!
//! A term is one marker byte identifying the kind width and the shift,
//! followed by `sortable >> shift` in big-endian order using the fewest whole
//! bytes that hold `bits - shift` bits. Terms of the same shift compare like
//! their values; terms of a lower shift sort before terms of a higher shift.

use super::kind::{NumericKind, NumericValue};
use crate::error::{NumtrieError, Result};

/// Marker of the first shift for 64-bit kinds
pub const SHIFT_START_LONG: u8 = 0x20;

/// Marker of the first shift for 32-bit kinds
pub const SHIFT_START_INT: u8 = 0x60;

fn payload_len(bits: u32, shift: u32) -> usize {
    ((bits - shift) as usize + 7) / 8
}

/// Encode a sortable value truncated at `shift`
pub fn prefix_code(kind: NumericKind, sortable: u64, shift: u32) -> Vec<u8> {
    let bits = kind.bits();
    debug_assert!(shift < bits, "shift {} out of range for {}", shift, kind);

    let width = payload_len(bits, shift);
    let payload = (sortable >> shift).to_be_bytes();

    let mut term = Vec::with_capacity(1 + width);
    term.push(kind.shift_marker_base() + shift as u8);
    term.extend_from_slice(&payload[8 - width..]);
    term
}

/// Read the shift level of a prefix-coded term
pub fn prefix_shift(kind: NumericKind, term: &[u8]) -> Result<u32> {
    let marker = *term
        .first()
        .ok_or_else(|| NumtrieError::InvalidTerm("empty term".to_string()))?;

    marker
        .checked_sub(kind.shift_marker_base())
        .map(u32::from)
        .filter(|shift| *shift < kind.bits())
        .ok_or_else(|| {
            NumtrieError::InvalidTerm(format!("marker 0x{:02x} is not a {} shift", marker, kind))
        })
}

/// Decode a prefix-coded term into its sortable value (low `shift` bits zero) and shift
pub fn prefix_decode(kind: NumericKind, term: &[u8]) -> Result<(u64, u32)> {
    let bits = kind.bits();
    let shift = prefix_shift(kind, term)?;
    let width = payload_len(bits, shift);
    let payload = &term[1..];

    if payload.len() != width {
        return Err(NumtrieError::InvalidTerm(format!(
            "expected {} payload bytes at shift {}, got {}",
            width,
            shift,
            payload.len()
        )));
    }

    let mut buf = [0u8; 8];
    buf[8 - width..].copy_from_slice(payload);
    let truncated = u64::from_be_bytes(buf);

    let significant = bits - shift;
    if significant < 64 && truncated >> significant != 0 {
        return Err(NumtrieError::InvalidTerm(format!(
            "payload exceeds {} bits at shift {}",
            significant, shift
        )));
    }

    Ok((truncated << shift, shift))
}

/// All terms indexed for one value: one per shift `0, step, 2*step, ...`
pub fn trie_terms(value: NumericValue, precision_step: u32) -> Result<Vec<Vec<u8>>> {
    if precision_step < 1 {
        return Err(NumtrieError::InvalidPrecisionStep(precision_step));
    }

    let kind = value.kind();
    let sortable = value.to_sortable();

    Ok((0..kind.bits())
        .step_by(precision_step as usize)
        .map(|shift| prefix_code(kind, sortable, shift))
        .collect())
}
