//! Bit utilities over 64-bit unsigned integers.
//!
//! The position algebra is defined entirely by bit patterns; these are the
//! four primitives it is built from.

use cairn_core::{Error, Result};

/// 1-based index of the most-significant set bit; `bit_length(0) == 0`.
pub fn bit_length(n: u64) -> u32 {
    64 - n.leading_zeros()
}

/// Number of set bits.
pub fn popcount(n: u64) -> u32 {
    n.count_ones()
}

/// True iff `n == 2^k - 1` for some k >= 0. Vacuously true for 0.
pub fn is_all_ones(n: u64) -> bool {
    n & n.wrapping_add(1) == 0
}

/// Returns `2^k - 1`. Valid for `k` in `[0, 64]`.
pub fn make_all_ones(k: u32) -> Result<u64> {
    match k {
        0..=63 => Ok((1u64 << k) - 1),
        64 => Ok(u64::MAX),
        _ => Err(Error::bit_length_overflow(format!(
            "cannot construct {k} one-bits in a u64"
        ))),
    }
}
