use bytes::BufMut;
use ufotofu::BulkProducer;

use willow_encoding::{
    compact_width, decode_compact_width_be, encode_compact_width_be, produce_byte,
    CompactWidth, DecodeError, EncodingScheme, RelativeDecodable, RelativeEncodable,
    RelativeEncodeError,
};

use crate::grouping::{Area, AreaSubspace, Range};
use crate::{Path, SubspaceId};

use super::{check_flags, diff_from_closer, end_or_max, undo_diff};

const END_OPEN: u8 = 0b1000_0000;
const SUBSPACE_ENCODED: u8 = 0b0100_0000;
const ADD_START_DIFF: u8 = 0b0010_0000;
const ADD_END_DIFF: u8 = 0b0001_0000;
const START_DIFF_WIDTH_POSITION: u8 = 4;
const END_DIFF_WIDTH_POSITION: u8 = 6;

/// The time differences of an included area and the direction each is measured in.
///
/// The start is measured from the closer bound of the outer time range, the end from the closer of the inner start and the outer end. The end difference is `None` for open ends.
struct TimeDiffs {
    start: (u64, bool),
    end: Option<(u64, bool)>,
}

impl TimeDiffs {
    fn new<const MCL: usize, const MCC: usize, const MPL: usize, S>(
        inner: &Area<MCL, MCC, MPL, S>,
        outer: &Area<MCL, MCC, MPL, S>,
    ) -> Self {
        let outer_end = end_or_max(&outer.times().end);
        let inner_start = inner.times().start;

        TimeDiffs {
            start: diff_from_closer(inner_start, outer.times().start, outer_end),
            end: inner
                .times()
                .end
                .closed()
                .map(|inner_end| diff_from_closer(*inner_end, inner_start, outer_end)),
        }
    }
}

fn header<const MCL: usize, const MCC: usize, const MPL: usize, S>(
    inner: &Area<MCL, MCC, MPL, S>,
    outer: &Area<MCL, MCC, MPL, S>,
) -> u8
where
    S: PartialEq,
{
    let diffs = TimeDiffs::new(inner, outer);
    let mut header = 0;

    if inner.subspace() != outer.subspace() {
        header |= SUBSPACE_ENCODED;
    }

    let (start_diff, add_start) = diffs.start;

    if add_start {
        header |= ADD_START_DIFF;
    }

    header |= CompactWidth::from_u64(start_diff).bitmask(START_DIFF_WIDTH_POSITION);

    match diffs.end {
        None => header |= END_OPEN,
        Some((end_diff, add_end)) => {
            if add_end {
                header |= ADD_END_DIFF;
            }

            header |= CompactWidth::from_u64(end_diff).bitmask(END_DIFF_WIDTH_POSITION);
        }
    }

    header
}

/// [Encodes](https://willowprotocol.org/specs/encodings/index.html#enc_area_in_area) an [`Area`] relative to an outer [`Area`] that [includes](https://willowprotocol.org/specs/grouping-entries/index.html#area_include_area) it.
///
/// A flag byte is followed by the time differences, the path relative to the outer path, and the subspace id if only the inner area fixes one. Areas whose time range includes nothing cannot be encoded.
impl<const MCL: usize, const MCC: usize, const MPL: usize, S>
    RelativeEncodable<Area<MCL, MCC, MPL, S>> for Area<MCL, MCC, MPL, S>
where
    S: SubspaceId + EncodingScheme,
{
    fn relative_encode<B: BufMut>(
        &self,
        outer: &Area<MCL, MCC, MPL, S>,
        buf: &mut B,
    ) -> Result<(), RelativeEncodeError> {
        if !self.times().is_valid() || !outer.includes_area(self) {
            return Err(RelativeEncodeError::not_included("area"));
        }

        let diffs = TimeDiffs::new(self, outer);
        let header = header(self, outer);

        buf.put_u8(header);

        encode_compact_width_be(diffs.start.0, buf);

        if let Some((end_diff, _)) = diffs.end {
            encode_compact_width_be(end_diff, buf);
        }

        self.path().relative_encode(outer.path(), buf)?;

        if header & SUBSPACE_ENCODED != 0 {
            if let AreaSubspace::Id(id) = self.subspace() {
                id.encode(buf);
            }
        }

        Ok(())
    }

    fn relative_encoded_length(
        &self,
        outer: &Area<MCL, MCC, MPL, S>,
    ) -> Result<usize, RelativeEncodeError> {
        if !self.times().is_valid() || !outer.includes_area(self) {
            return Err(RelativeEncodeError::not_included("area"));
        }

        let diffs = TimeDiffs::new(self, outer);

        let end_length = diffs.end.map_or(0, |(end_diff, _)| compact_width(end_diff));

        let subspace_length = match (self.subspace(), outer.subspace()) {
            (AreaSubspace::Id(id), AreaSubspace::Any) => id.encoded_length(),
            _ => 0,
        };

        Ok(1 + compact_width(diffs.start.0)
            + end_length
            + self.path().relative_encoded_length(outer.path())?
            + subspace_length)
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S>
    RelativeDecodable<Area<MCL, MCC, MPL, S>> for Area<MCL, MCC, MPL, S>
where
    S: SubspaceId + EncodingScheme,
{
    async fn relative_decode<P>(
        outer: &Area<MCL, MCC, MPL, S>,
        producer: &mut P,
    ) -> Result<Self, DecodeError<P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let read_header = produce_byte(producer).await?;

        let start_diff = decode_compact_width_be(
            CompactWidth::decode_fixed_width_bitmask(read_header, START_DIFF_WIDTH_POSITION),
            producer,
        )
        .await?;

        let end_diff = if read_header & END_OPEN != 0 {
            None
        } else {
            Some(
                decode_compact_width_be(
                    CompactWidth::decode_fixed_width_bitmask(read_header, END_DIFF_WIDTH_POSITION),
                    producer,
                )
                .await?,
            )
        };

        let path = Path::relative_decode(outer.path(), producer).await?;

        let subspace = if read_header & SUBSPACE_ENCODED != 0 {
            AreaSubspace::Id(S::decode(producer).await?)
        } else {
            outer.subspace().clone()
        };

        let outer_end = end_or_max(&outer.times().end);

        let start = undo_diff(
            start_diff,
            read_header & ADD_START_DIFF != 0,
            outer.times().start,
            outer_end,
        )?;

        let times = match end_diff {
            None => Range::new_open(start),
            Some(end_diff) => {
                let end = undo_diff(end_diff, read_header & ADD_END_DIFF != 0, start, outer_end)?;

                Range::new_closed(start, end).ok_or_else(|| {
                    DecodeError::<P::Error>::invalid("time range of the area is empty")
                })?
            }
        };

        let inner = Area::new(subspace, path, times);

        if !outer.includes_area(&inner) {
            return Err(DecodeError::invalid(
                "decoded area is not included in the outer area",
            ));
        }

        check_flags(read_header, header(&inner, outer))?;

        Ok(inner)
    }
}

#[cfg(test)]
mod tests {
    use crate::relative_encodings::assert_relative_round_trip;

    use super::*;

    const MCL: usize = 8;
    const MCC: usize = 4;
    const MPL: usize = 16;

    type TestArea = Area<MCL, MCC, MPL, u64>;

    fn area(subspace: AreaSubspace<u64>, path: &[&[u8]], times: Range<u64>) -> TestArea {
        Area::new(subspace, Path::from_slices(path).unwrap(), times)
    }

    fn closed(start: u64, end: u64) -> Range<u64> {
        Range::new_closed(start, end).unwrap()
    }

    #[test]
    fn round_trips() {
        let full = TestArea::new_full();

        for inner in [
            TestArea::new_full(),
            area(AreaSubspace::Id(3), &[b"a"], closed(5, 100)),
            area(AreaSubspace::Id(u64::MAX), &[b"x", b"y"], Range::new_open(u64::MAX - 1)),
            area(AreaSubspace::Any, &[], closed(0, u64::MAX)),
            area(AreaSubspace::Any, &[b"m", b""], closed(u64::MAX / 2, u64::MAX / 2 + 1000)),
        ] {
            assert_relative_round_trip(&inner, &full);
        }

        let outer = area(AreaSubspace::Id(3), &[b"a"], closed(100, 1000));

        for inner in [
            outer.clone(),
            area(AreaSubspace::Id(3), &[b"a", b"b"], closed(900, 995)),
            area(AreaSubspace::Id(3), &[b"a", b"b", b"c"], closed(100, 101)),
            area(AreaSubspace::Id(3), &[b"a"], closed(500, 501)),
        ] {
            assert_relative_round_trip(&inner, &outer);
        }
    }

    #[test]
    fn layout() {
        let inner = area(AreaSubspace::Id(3), &[b"a"], closed(5, 100));
        let encoded = inner
            .relative_encode_to_bytes(&TestArea::new_full())
            .unwrap();

        assert_eq!(
            &encoded[..],
            &[
                SUBSPACE_ENCODED | ADD_START_DIFF | ADD_END_DIFF,
                5,
                95,
                0,
                1,
                1,
                b'a',
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                3
            ]
        );

        let outer = area(AreaSubspace::Id(3), &[b"a"], closed(100, 1000));
        let inner = area(AreaSubspace::Id(3), &[b"a", b"b"], closed(900, 995));

        // Both differences are measured down from the outer end.
        assert_eq!(
            &inner.relative_encode_to_bytes(&outer).unwrap()[..],
            &[0, 100, 5, 1, 1, 1, b'b']
        );

        let full = TestArea::new_full();
        assert_eq!(
            &full.relative_encode_to_bytes(&full).unwrap()[..],
            &[END_OPEN | ADD_START_DIFF, 0, 0, 0]
        );
    }

    #[test]
    fn rejects_areas_outside_the_outer_area() {
        let outer = area(AreaSubspace::Id(3), &[b"a"], closed(100, 1000));

        for inner in [
            area(AreaSubspace::Any, &[b"a"], closed(100, 1000)),
            area(AreaSubspace::Id(4), &[b"a"], closed(100, 1000)),
            area(AreaSubspace::Id(3), &[b"b"], closed(100, 1000)),
            area(AreaSubspace::Id(3), &[], closed(100, 1000)),
            area(AreaSubspace::Id(3), &[b"a"], closed(50, 200)),
            area(AreaSubspace::Id(3), &[b"a"], Range::new_open(900)),
            area(
                AreaSubspace::Id(3),
                &[b"a"],
                Range {
                    start: 500,
                    end: crate::grouping::RangeEnd::Closed(400),
                },
            ),
        ] {
            assert_eq!(
                inner.relative_encode_to_bytes(&outer),
                Err(RelativeEncodeError::NotIncluded("area"))
            );
            assert_eq!(
                inner.relative_encoded_length(&outer),
                Err(RelativeEncodeError::NotIncluded("area"))
            );
        }
    }

    #[test]
    fn rejects_malformed_input() {
        let full = TestArea::new_full();

        // End equals start.
        assert!(matches!(
            TestArea::relative_decode_from_slice(
                &full,
                &[ADD_START_DIFF | ADD_END_DIFF, 10, 0, 0, 0]
            ),
            Err(DecodeError::InvalidInput(_))
        ));

        // Open end with a nonzero end width.
        assert!(matches!(
            TestArea::relative_decode_from_slice(
                &full,
                &[END_OPEN | ADD_START_DIFF | 0b01, 0, 0, 0]
            ),
            Err(DecodeError::InvalidInput(_))
        ));

        // A subspace that the outer area already fixes.
        let fixed = area(AreaSubspace::Id(3), &[], Range::new_open(0));
        let mut explicit_subspace = vec![END_OPEN | SUBSPACE_ENCODED | ADD_START_DIFF, 0, 0, 0];
        explicit_subspace.extend_from_slice(&3u64.to_be_bytes());
        assert!(matches!(
            TestArea::relative_decode_from_slice(&fixed, &explicit_subspace),
            Err(DecodeError::InvalidInput(_))
        ));

        // An open inner end in a closed outer time range.
        let outer = area(AreaSubspace::Id(3), &[], closed(100, 1000));
        assert!(matches!(
            TestArea::relative_decode_from_slice(
                &outer,
                &[
                    END_OPEN
                        | ADD_START_DIFF
                        | CompactWidth::Two.bitmask(START_DIFF_WIDTH_POSITION),
                    0x03,
                    0xB6,
                    0,
                    0
                ]
            ),
            Err(DecodeError::InvalidInput(_))
        ));

        // The same area measured from the farther bound.
        let inner = area(AreaSubspace::Id(3), &[], closed(900, 995));
        let canonical = inner.relative_encode_to_bytes(&outer).unwrap();
        assert_eq!(&canonical[..], &[0, 100, 5, 0, 0]);
        assert!(matches!(
            TestArea::relative_decode_from_slice(
                &outer,
                &[
                    ADD_START_DIFF | CompactWidth::Two.bitmask(START_DIFF_WIDTH_POSITION),
                    0x03,
                    0x20,
                    5,
                    0,
                    0
                ]
            ),
            Err(DecodeError::InvalidInput(_))
        ));
    }
}
