//! Key hashing: a case-folding polynomial accumulator.
//!
//! The layout of a table for a given key sequence depends on this function,
//! so it is fixed: `h = h * 33 + c` over every byte, with `c` the
//! ASCII-lowercased byte value (0..=255). All arithmetic wraps.

/// Hash a key to a 64-bit accumulator value.
#[inline]
pub fn key_hash(key: &str) -> u64 {
    key.bytes().fold(0u64, |h, b| {
        h.wrapping_mul(33).wrapping_add(b.to_ascii_lowercase() as u64)
    })
}

/// Home slot of `key` in a table of `capacity` slots.
///
/// `capacity` must be non-zero; tables reject zero capacity at creation.
#[inline]
pub fn home_slot(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (key_hash(key) % capacity as u64) as usize
}
