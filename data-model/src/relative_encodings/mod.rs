//! [Relative encodings](https://willowprotocol.org/specs/encodings/index.html#relativity) of entries, areas, and 3d ranges.
//!
//! Every encoding starts with one (or, for 3d ranges, two) flag bytes that record which fields are elided because the reference determines them, which anchor each numeric difference is measured from, and the [`CompactWidth`](willow_encoding::CompactWidth) of every difference. Decoders recompute the flags from the decoded value and reject any encoding whose flags disagree, so every value has exactly one encoding relative to a given reference.

mod area_area;
mod entry_area;
mod entry_entry;
mod entry_range3d;
mod range3d_range3d;

#[cfg(all(test, feature = "dev"))]
mod randomized;

use core::fmt::Debug;

use willow_encoding::DecodeError;

use crate::grouping::{Range, RangeEnd};
use crate::Path;

/// Expresses `value` by its distance to whichever of `lower` and `upper` is closer, preferring `lower` on ties.
///
/// Returns the distance, and whether it is measured upwards from `lower` (as opposed to downwards from `upper`). Requires `lower <= value <= upper`.
pub(crate) fn diff_from_closer(value: u64, lower: u64, upper: u64) -> (u64, bool) {
    debug_assert!(lower <= value && value <= upper);

    let from_lower = value - lower;
    let from_upper = upper - value;

    if from_lower <= from_upper {
        (from_lower, true)
    } else {
        (from_upper, false)
    }
}

/// Reverses [`diff_from_closer`], rejecting differences that leave the range of `u64`.
pub(crate) fn undo_diff<E>(
    diff: u64,
    from_lower: bool,
    lower: u64,
    upper: u64,
) -> Result<u64, DecodeError<E>> {
    let value = if from_lower {
        lower.checked_add(diff)
    } else {
        upper.checked_sub(diff)
    };

    value.ok_or_else(|| DecodeError::invalid("time difference overflows"))
}

/// The numeric value of a time range end, where an open end stands for the greatest timestamp.
pub(crate) fn end_or_max(end: &RangeEnd<u64>) -> u64 {
    match end {
        RangeEnd::Closed(end) => *end,
        RangeEnd::Open => u64::MAX,
    }
}

/// Returns whether `path` is encoded relative to the start of `paths` rather than its end: always for open ranges, and otherwise whenever the start shares at least as many components with `path` as the end does.
pub(crate) fn path_relative_to_start<const MCL: usize, const MCC: usize, const MPL: usize>(
    path: &Path<MCL, MCC, MPL>,
    paths: &Range<Path<MCL, MCC, MPL>>,
) -> bool {
    match &paths.end {
        RangeEnd::Open => true,
        RangeEnd::Closed(end) => {
            path.common_prefix_length(&paths.start) >= path.common_prefix_length(end)
        }
    }
}

/// The bound of `paths` that `path` is encoded relative to.
pub(crate) fn path_anchor<'a, const MCL: usize, const MCC: usize, const MPL: usize>(
    path: &Path<MCL, MCC, MPL>,
    paths: &'a Range<Path<MCL, MCC, MPL>>,
) -> &'a Path<MCL, MCC, MPL> {
    match &paths.end {
        RangeEnd::Closed(end) if !path_relative_to_start(path, paths) => end,
        _ => &paths.start,
    }
}

/// Resolves a path anchor read from flags, rejecting references to an open end.
pub(crate) fn decoded_path_anchor<E, const MCL: usize, const MCC: usize, const MPL: usize>(
    relative_to_start: bool,
    paths: &Range<Path<MCL, MCC, MPL>>,
) -> Result<&Path<MCL, MCC, MPL>, DecodeError<E>> {
    if relative_to_start {
        Ok(&paths.start)
    } else {
        paths
            .end
            .closed()
            .ok_or_else(|| DecodeError::invalid("path encoded relative to an open end"))
    }
}

/// Rejects a decoded value whose canonical flags differ from the flags that were read.
pub(crate) fn check_flags<E, T>(read: T, canonical: T) -> Result<(), DecodeError<E>>
where
    T: PartialEq + Debug,
{
    if read == canonical {
        Ok(())
    } else {
        tracing::debug!(?read, ?canonical, "decoded value would be encoded with other flags");

        Err(DecodeError::invalid(
            "flags disagree with the canonical encoding",
        ))
    }
}

/// Checks length agreement, buffered round trip, and streaming round trip with one-byte chunks. Returns the encoding.
#[cfg(test)]
pub(crate) fn assert_relative_round_trip<R, T>(value: &T, reference: &R) -> bytes::Bytes
where
    T: willow_encoding::RelativeEncodable<R>
        + willow_encoding::RelativeDecodable<R>
        + PartialEq
        + Debug,
{
    let encoded = value.relative_encode_to_bytes(reference).unwrap();

    assert_eq!(value.relative_encoded_length(reference), Ok(encoded.len()));
    assert_eq!(
        T::relative_decode_from_slice(reference, &encoded).as_ref(),
        Ok(value)
    );
    assert_eq!(
        decode_one_byte_at_a_time::<R, T>(reference, &encoded).as_ref(),
        Ok(value)
    );

    encoded
}

/// Decodes from a [`GrowingBytes`](willow_encoding::GrowingBytes) that receives `encoded` one byte at a time, then ends.
#[cfg(test)]
pub(crate) fn decode_one_byte_at_a_time<R, T>(
    reference: &R,
    encoded: &[u8],
) -> Result<T, DecodeError<core::convert::Infallible>>
where
    T: willow_encoding::RelativeDecodable<R>,
{
    let (feeder, mut bytes) = willow_encoding::GrowingBytes::new();

    smol::block_on(async {
        let decode = T::relative_decode_stream(reference, &mut bytes);

        let feed = async move {
            for byte in encoded {
                feeder.push(vec![*byte]);
                smol::future::yield_now().await;
            }

            feeder.close();
        };

        let (decoded, ()) = futures::join!(decode, feed);
        decoded
    })
}
