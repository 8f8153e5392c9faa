//! The total orders Willow uses, plus the byte-level successor computations that paths and subspace ids build on.
//!
//! Byte strings are ordered [lexicographically](https://willowprotocol.org/specs/data-model/index.html#path_lexicographic_order), timestamps numerically. Paths order component-wise via the [`Ord`] implementation of [`Path`](crate::Path).

use core::cmp::Ordering;

/// Compares two bytestrings lexicographically: byte by byte, and a strict prefix sorts first.
pub fn order_bytes(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// Compares two [`Timestamp`](crate::Timestamp)s numerically.
pub fn order_timestamp(a: u64, b: u64) -> Ordering {
    a.cmp(&b)
}

/// Interprets `bytes` as a fixed-width big-endian unsigned integer and returns its increment.
///
/// `0xff` bytes wrap to `0x00` with the carry propagating to the left. Returns `None` if every byte is `0xff` (which includes the empty bytestring), since no fixed-width increment exists then.
pub fn successor_bytes_fixed_width(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut incremented = bytes.to_vec();

    for byte in incremented.iter_mut().rev() {
        if *byte == u8::MAX {
            *byte = 0;
        } else {
            *byte += 1;
            return Some(incremented);
        }
    }

    None
}

/// Returns the least bytestring that is strictly greater than `bytes` but does not have `bytes` as a prefix, or `None` if no such bytestring exists.
///
/// This drops all trailing `0xff` bytes and increments the last remaining byte. The result is never longer than `bytes`.
pub fn prefix_successor_bytes(bytes: &[u8]) -> Option<Vec<u8>> {
    let last_incrementable = bytes.iter().rposition(|byte| *byte != u8::MAX)?;

    let mut successor = bytes[..=last_incrementable].to_vec();
    successor[last_incrementable] += 1;

    Some(successor)
}
