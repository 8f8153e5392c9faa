use bytes::BufMut;
use ufotofu::BulkProducer;

use willow_encoding::{
    compact_width, decode_compact_width_be, encode_compact_width_be, produce_array,
    CompactWidth, DecodeError, EncodingScheme, RelativeDecodable, RelativeEncodable,
    RelativeEncodeError,
};

use crate::grouping::{Range, Range3d, RangeEnd};
use crate::{Path, SubspaceId};

use super::{check_flags, decoded_path_anchor, path_anchor, path_relative_to_start};

// First flag byte.
const SUBSPACE_START_MASK: u8 = 0b1100_0000;
const SUBSPACE_START_REF_START: u8 = 0b0100_0000;
const SUBSPACE_START_REF_END: u8 = 0b1000_0000;
const SUBSPACE_START_ENCODED: u8 = 0b1100_0000;
const SUBSPACE_END_MASK: u8 = 0b0011_0000;
const SUBSPACE_END_OPEN: u8 = 0b0000_0000;
const SUBSPACE_END_REF_START: u8 = 0b0001_0000;
const SUBSPACE_END_REF_END: u8 = 0b0010_0000;
const SUBSPACE_END_ENCODED: u8 = 0b0011_0000;
const PATH_START_RELATIVE_TO_START: u8 = 0b0000_1000;
const PATH_END_OPEN: u8 = 0b0000_0100;
const PATH_END_RELATIVE_TO_START: u8 = 0b0000_0010;
const TIME_END_OPEN: u8 = 0b0000_0001;

// Second flag byte.
const TIME_START_RELATIVE_TO_START: u8 = 0b1000_0000;
const ADD_START_DIFF: u8 = 0b0100_0000;
const START_DIFF_WIDTH_POSITION: u8 = 2;
const TIME_END_RELATIVE_TO_START: u8 = 0b0000_1000;
const ADD_END_DIFF: u8 = 0b0000_0100;
const END_DIFF_WIDTH_POSITION: u8 = 6;

/// A time expressed as a difference to one of the bounds of a reference time range.
struct TimeDiff {
    relative_to_start: bool,
    add: bool,
    diff: u64,
}

impl TimeDiff {
    /// Measures from the closer bound of `reference`, preferring the start on ties and for open ranges.
    fn new(value: u64, reference: &Range<u64>) -> Self {
        let (anchor, relative_to_start) = match reference.end {
            RangeEnd::Closed(end) if value.abs_diff(end) < value.abs_diff(reference.start) => {
                (end, false)
            }
            _ => (reference.start, true),
        };

        TimeDiff {
            relative_to_start,
            add: value >= anchor,
            diff: value.abs_diff(anchor),
        }
    }

    fn width(&self) -> CompactWidth {
        CompactWidth::from_u64(self.diff)
    }
}

/// Reverses [`TimeDiff::new`] for the flags and difference that were read.
fn undo_time_diff<E>(
    relative_to_start: bool,
    add: bool,
    diff: u64,
    reference: &Range<u64>,
) -> Result<u64, DecodeError<E>> {
    let anchor = if relative_to_start {
        reference.start
    } else {
        *reference
            .end
            .closed()
            .ok_or_else(|| DecodeError::<E>::invalid("time encoded relative to an open end"))?
    };

    if add {
        anchor.checked_add(diff)
    } else {
        anchor.checked_sub(diff)
    }
    .ok_or_else(|| DecodeError::invalid("time difference overflows"))
}

fn subspace_start_flags<S: PartialEq>(start: &S, reference: &Range<S>) -> u8 {
    if start == &reference.start {
        SUBSPACE_START_REF_START
    } else if reference.end.closed() == Some(start) {
        SUBSPACE_START_REF_END
    } else {
        SUBSPACE_START_ENCODED
    }
}

fn subspace_end_flags<S: PartialEq>(end: &RangeEnd<S>, reference: &Range<S>) -> u8 {
    match end {
        RangeEnd::Open => SUBSPACE_END_OPEN,
        RangeEnd::Closed(end) if end == &reference.start => SUBSPACE_END_REF_START,
        RangeEnd::Closed(end) if reference.end.closed() == Some(end) => SUBSPACE_END_REF_END,
        RangeEnd::Closed(_) => SUBSPACE_END_ENCODED,
    }
}

fn header<const MCL: usize, const MCC: usize, const MPL: usize, S>(
    range: &Range3d<MCL, MCC, MPL, S>,
    reference: &Range3d<MCL, MCC, MPL, S>,
) -> [u8; 2]
where
    S: PartialEq,
{
    let mut first = subspace_start_flags(&range.subspaces().start, reference.subspaces())
        | subspace_end_flags(&range.subspaces().end, reference.subspaces());

    if path_relative_to_start(&range.paths().start, reference.paths()) {
        first |= PATH_START_RELATIVE_TO_START;
    }

    match &range.paths().end {
        RangeEnd::Open => first |= PATH_END_OPEN,
        RangeEnd::Closed(end) => {
            if path_relative_to_start(end, reference.paths()) {
                first |= PATH_END_RELATIVE_TO_START;
            }
        }
    }

    let start = TimeDiff::new(range.times().start, reference.times());
    let mut second = start.width().bitmask(START_DIFF_WIDTH_POSITION);

    if start.relative_to_start {
        second |= TIME_START_RELATIVE_TO_START;
    }

    if start.add {
        second |= ADD_START_DIFF;
    }

    match range.times().end {
        RangeEnd::Open => first |= TIME_END_OPEN,
        RangeEnd::Closed(end) => {
            let end = TimeDiff::new(end, reference.times());

            second |= end.width().bitmask(END_DIFF_WIDTH_POSITION);

            if end.relative_to_start {
                second |= TIME_END_RELATIVE_TO_START;
            }

            if end.add {
                second |= ADD_END_DIFF;
            }
        }
    }

    [first, second]
}

/// [Encodes](https://willowprotocol.org/specs/encodings/index.html#enc_3drange_relative_3drange) a [`Range3d`] relative to a reference [`Range3d`].
///
/// Two flag bytes record, per dimension, whether each bound is open, equal to a bound of the reference, or encoded explicitly, along with the anchors and widths of the path and time bounds. Any pair of 3d ranges can be encoded this way.
impl<const MCL: usize, const MCC: usize, const MPL: usize, S>
    RelativeEncodable<Range3d<MCL, MCC, MPL, S>> for Range3d<MCL, MCC, MPL, S>
where
    S: SubspaceId + EncodingScheme,
{
    fn relative_encode<B: BufMut>(
        &self,
        reference: &Range3d<MCL, MCC, MPL, S>,
        buf: &mut B,
    ) -> Result<(), RelativeEncodeError> {
        let [first, second] = header(self, reference);

        buf.put_u8(first);
        buf.put_u8(second);

        if first & SUBSPACE_START_MASK == SUBSPACE_START_ENCODED {
            self.subspaces().start.encode(buf);
        }

        if first & SUBSPACE_END_MASK == SUBSPACE_END_ENCODED {
            if let RangeEnd::Closed(end) = &self.subspaces().end {
                end.encode(buf);
            }
        }

        let paths = self.paths();
        paths
            .start
            .relative_encode(path_anchor(&paths.start, reference.paths()), buf)?;

        if let RangeEnd::Closed(end) = &paths.end {
            end.relative_encode(path_anchor(end, reference.paths()), buf)?;
        }

        encode_compact_width_be(TimeDiff::new(self.times().start, reference.times()).diff, buf);

        if let RangeEnd::Closed(end) = self.times().end {
            encode_compact_width_be(TimeDiff::new(end, reference.times()).diff, buf);
        }

        Ok(())
    }

    fn relative_encoded_length(
        &self,
        reference: &Range3d<MCL, MCC, MPL, S>,
    ) -> Result<usize, RelativeEncodeError> {
        let [first, _] = header(self, reference);
        let mut length = 2;

        if first & SUBSPACE_START_MASK == SUBSPACE_START_ENCODED {
            length += self.subspaces().start.encoded_length();
        }

        if first & SUBSPACE_END_MASK == SUBSPACE_END_ENCODED {
            if let RangeEnd::Closed(end) = &self.subspaces().end {
                length += end.encoded_length();
            }
        }

        let paths = self.paths();
        length += paths
            .start
            .relative_encoded_length(path_anchor(&paths.start, reference.paths()))?;

        if let RangeEnd::Closed(end) = &paths.end {
            length += end.relative_encoded_length(path_anchor(end, reference.paths()))?;
        }

        length += compact_width(TimeDiff::new(self.times().start, reference.times()).diff);

        if let RangeEnd::Closed(end) = self.times().end {
            length += compact_width(TimeDiff::new(end, reference.times()).diff);
        }

        Ok(length)
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S>
    RelativeDecodable<Range3d<MCL, MCC, MPL, S>> for Range3d<MCL, MCC, MPL, S>
where
    S: SubspaceId + EncodingScheme,
{
    async fn relative_decode<P>(
        reference: &Range3d<MCL, MCC, MPL, S>,
        producer: &mut P,
    ) -> Result<Self, DecodeError<P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let read_header: [u8; 2] = produce_array(producer).await?;
        let [first, second] = read_header;

        let reference_subspaces = reference.subspaces();

        let subspace_start = match first & SUBSPACE_START_MASK {
            SUBSPACE_START_REF_START => reference_subspaces.start.clone(),
            SUBSPACE_START_REF_END => reference_subspaces
                .end
                .closed()
                .cloned()
                .ok_or_else(|| {
                    DecodeError::<P::Error>::invalid("subspace relative to an open end")
                })?,
            SUBSPACE_START_ENCODED => S::decode(producer).await?,
            _ => return Err(DecodeError::invalid("subspace start flags are unassigned")),
        };

        let subspace_end = match first & SUBSPACE_END_MASK {
            SUBSPACE_END_OPEN => RangeEnd::Open,
            SUBSPACE_END_REF_START => RangeEnd::Closed(reference_subspaces.start.clone()),
            SUBSPACE_END_REF_END => RangeEnd::Closed(
                reference_subspaces
                    .end
                    .closed()
                    .cloned()
                    .ok_or_else(|| {
                        DecodeError::<P::Error>::invalid("subspace relative to an open end")
                    })?,
            ),
            _ => RangeEnd::Closed(S::decode(producer).await?),
        };

        let path_start = Path::relative_decode(
            decoded_path_anchor(first & PATH_START_RELATIVE_TO_START != 0, reference.paths())?,
            producer,
        )
        .await?;

        let path_end = if first & PATH_END_OPEN != 0 {
            RangeEnd::Open
        } else {
            RangeEnd::Closed(
                Path::relative_decode(
                    decoded_path_anchor(
                        first & PATH_END_RELATIVE_TO_START != 0,
                        reference.paths(),
                    )?,
                    producer,
                )
                .await?,
            )
        };

        let start_diff = decode_compact_width_be(
            CompactWidth::decode_fixed_width_bitmask(second, START_DIFF_WIDTH_POSITION),
            producer,
        )
        .await?;

        let time_start = undo_time_diff(
            second & TIME_START_RELATIVE_TO_START != 0,
            second & ADD_START_DIFF != 0,
            start_diff,
            reference.times(),
        )?;

        let time_end = if first & TIME_END_OPEN != 0 {
            RangeEnd::Open
        } else {
            let end_diff = decode_compact_width_be(
                CompactWidth::decode_fixed_width_bitmask(second, END_DIFF_WIDTH_POSITION),
                producer,
            )
            .await?;

            RangeEnd::Closed(undo_time_diff(
                second & TIME_END_RELATIVE_TO_START != 0,
                second & ADD_END_DIFF != 0,
                end_diff,
                reference.times(),
            )?)
        };

        let range = Range3d::new(
            Range {
                start: subspace_start,
                end: subspace_end,
            },
            Range {
                start: path_start,
                end: path_end,
            },
            Range {
                start: time_start,
                end: time_end,
            },
        );

        check_flags(read_header, header(&range, reference))?;

        Ok(range)
    }
}
