use bytes::BufMut;
use ufotofu::BulkProducer;

use willow_encoding::{
    compact_width, decode_compact_width_be, encode_compact_width_be, produce_byte,
    CompactWidth, DecodeError, EncodingScheme, RelativeDecodable, RelativeEncodable,
    RelativeEncodeError,
};

use crate::grouping::Area;
use crate::{Entry, NamespaceId, Path, PayloadDigest, SubspaceId};

use super::{check_flags, diff_from_closer, end_or_max, undo_diff};

const SUBSPACE_ENCODED: u8 = 0b1000_0000;
const ADD_TO_START: u8 = 0b0100_0000;
const TIME_DIFF_WIDTH_POSITION: u8 = 2;
const PAYLOAD_LENGTH_WIDTH_POSITION: u8 = 4;
// The two least significant bits are always zero.

/// The time difference of an included entry, measured from the closer end of the area's time range.
fn time_diff<const MCL: usize, const MCC: usize, const MPL: usize, S>(
    timestamp: u64,
    area: &Area<MCL, MCC, MPL, S>,
) -> (u64, bool) {
    diff_from_closer(timestamp, area.times().start, end_or_max(&area.times().end))
}

fn header<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD>(
    entry: &Entry<MCL, MCC, MPL, N, S, PD>,
    area: &Area<MCL, MCC, MPL, S>,
) -> u8 {
    let mut header = 0;

    if area.subspace().is_any() {
        header |= SUBSPACE_ENCODED;
    }

    let (time_diff, add) = time_diff(entry.timestamp(), area);

    if add {
        header |= ADD_TO_START;
    }

    header |= CompactWidth::from_u64(time_diff).bitmask(TIME_DIFF_WIDTH_POSITION);
    header |= CompactWidth::from_u64(entry.payload_length()).bitmask(PAYLOAD_LENGTH_WIDTH_POSITION);

    header
}

/// [Encodes](https://willowprotocol.org/specs/encodings/index.html#enc_entry_in_namespace_area) an [`Entry`] that lies in a known namespace and is [included](https://willowprotocol.org/specs/grouping-entries/index.html#area_include) in a known [`Area`].
///
/// The namespace is never encoded, and the subspace only if the area does not fix it.
impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD>
    RelativeEncodable<(N, Area<MCL, MCC, MPL, S>)> for Entry<MCL, MCC, MPL, N, S, PD>
where
    N: NamespaceId + EncodingScheme,
    S: SubspaceId + EncodingScheme,
    PD: PayloadDigest + EncodingScheme,
{
    fn relative_encode<B: BufMut>(
        &self,
        reference: &(N, Area<MCL, MCC, MPL, S>),
        buf: &mut B,
    ) -> Result<(), RelativeEncodeError> {
        let (namespace, area) = reference;

        if self.namespace_id() != namespace {
            return Err(RelativeEncodeError::NamespaceMismatch);
        }

        if !area.includes_entry(self) {
            return Err(RelativeEncodeError::not_included("area"));
        }

        let header = header(self, area);
        buf.put_u8(header);

        if header & SUBSPACE_ENCODED != 0 {
            self.subspace_id().encode(buf);
        }

        self.path().relative_encode(area.path(), buf)?;

        encode_compact_width_be(time_diff(self.timestamp(), area).0, buf);
        encode_compact_width_be(self.payload_length(), buf);

        self.payload_digest().encode(buf);

        Ok(())
    }

    fn relative_encoded_length(
        &self,
        reference: &(N, Area<MCL, MCC, MPL, S>),
    ) -> Result<usize, RelativeEncodeError> {
        let (namespace, area) = reference;

        if self.namespace_id() != namespace {
            return Err(RelativeEncodeError::NamespaceMismatch);
        }

        if !area.includes_entry(self) {
            return Err(RelativeEncodeError::not_included("area"));
        }

        let subspace_length = if area.subspace().is_any() {
            self.subspace_id().encoded_length()
        } else {
            0
        };

        Ok(1 + subspace_length
            + self.path().relative_encoded_length(area.path())?
            + compact_width(time_diff(self.timestamp(), area).0)
            + compact_width(self.payload_length())
            + self.payload_digest().encoded_length())
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD>
    RelativeDecodable<(N, Area<MCL, MCC, MPL, S>)> for Entry<MCL, MCC, MPL, N, S, PD>
where
    N: NamespaceId + EncodingScheme,
    S: SubspaceId + EncodingScheme,
    PD: PayloadDigest + EncodingScheme,
{
    async fn relative_decode<P>(
        reference: &(N, Area<MCL, MCC, MPL, S>),
        producer: &mut P,
    ) -> Result<Self, DecodeError<P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let (namespace, area) = reference;

        let read_header = produce_byte(producer).await?;

        let subspace_id = if read_header & SUBSPACE_ENCODED != 0 {
            S::decode(producer).await?
        } else {
            area.subspace().id().cloned().ok_or_else(|| {
                DecodeError::<P::Error>::invalid(
                    "subspace must be encoded for an area of any subspace",
                )
            })?
        };

        let path = Path::relative_decode(area.path(), producer).await?;

        let time_diff = decode_compact_width_be(
            CompactWidth::decode_fixed_width_bitmask(read_header, TIME_DIFF_WIDTH_POSITION),
            producer,
        )
        .await?;

        let payload_length = decode_compact_width_be(
            CompactWidth::decode_fixed_width_bitmask(read_header, PAYLOAD_LENGTH_WIDTH_POSITION),
            producer,
        )
        .await?;

        let payload_digest = PD::decode(producer).await?;

        let timestamp = undo_diff(
            time_diff,
            read_header & ADD_TO_START != 0,
            area.times().start,
            end_or_max(&area.times().end),
        )?;

        let entry = Entry::new(
            namespace.clone(),
            subspace_id,
            path,
            timestamp,
            payload_length,
            payload_digest,
        );

        if !area.includes_entry(&entry) {
            return Err(DecodeError::invalid("decoded entry lies outside the area"));
        }

        check_flags(read_header, header(&entry, area))?;

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use crate::grouping::{AreaSubspace, Range};
    use crate::relative_encodings::assert_relative_round_trip;

    use super::*;

    const MCL: usize = 8;
    const MCC: usize = 4;
    const MPL: usize = 16;

    type TestEntry = Entry<MCL, MCC, MPL, [u8; 2], u64, [u8; 4]>;
    type TestArea = Area<MCL, MCC, MPL, u64>;

    fn entry(subspace: u64, path: &[&[u8]], timestamp: u64, payload_length: u64) -> TestEntry {
        Entry::new(
            [1; 2],
            subspace,
            Path::from_slices(path).unwrap(),
            timestamp,
            payload_length,
            [9; 4],
        )
    }

    fn area(subspace: AreaSubspace<u64>, path: &[&[u8]], times: Range<u64>) -> TestArea {
        Area::new(subspace, Path::from_slices(path).unwrap(), times)
    }

    #[test]
    fn round_trips() {
        let any_open = ([1; 2], area(AreaSubspace::Any, &[b"a"], Range::new_open(10)));
        let fixed_closed = (
            [1; 2],
            area(
                AreaSubspace::Id(5),
                &[],
                Range::new_closed(100, 1000).unwrap(),
            ),
        );

        for e in [
            entry(3, &[b"a"], 10, 0),
            entry(3, &[b"a", b"b"], 500, 300),
            entry(0, &[b"a", b"", b"c"], u64::MAX, u64::MAX),
            entry(u64::MAX, &[b"a"], u64::MAX - 300, 1),
        ] {
            assert_relative_round_trip(&e, &any_open);
        }

        for e in [
            entry(5, &[], 100, 0),
            entry(5, &[b"x"], 999, 70_000),
            entry(5, &[b"x", b"y"], 550, 1),
        ] {
            assert_relative_round_trip(&e, &fixed_closed);
        }
    }

    #[test]
    fn layout() {
        let reference = (
            [1; 2],
            area(
                AreaSubspace::Id(5),
                &[b"a"],
                Range::new_closed(100, 1000).unwrap(),
            ),
        );

        let encoded = entry(5, &[b"a"], 990, 2)
            .relative_encode_to_bytes(&reference)
            .unwrap();

        // Subtracted from the end, one-byte widths, path relative to [a] with nothing left over.
        assert_eq!(&encoded[..], &[0, 1, 0, 10, 2, 9, 9, 9, 9]);

        let any = ([1; 2], area(AreaSubspace::Any, &[], Range::new_open(0)));
        let encoded = entry(5, &[], 300, 2).relative_encode_to_bytes(&any).unwrap();

        assert_eq!(
            encoded[0],
            SUBSPACE_ENCODED | ADD_TO_START | CompactWidth::Two.bitmask(TIME_DIFF_WIDTH_POSITION)
        );
        assert_eq!(&encoded[1..9], &5u64.to_be_bytes());
    }

    #[test]
    fn rejects_entries_outside_the_area() {
        let reference = (
            [1; 2],
            area(
                AreaSubspace::Id(5),
                &[b"a"],
                Range::new_closed(100, 1000).unwrap(),
            ),
        );

        let wrong_namespace = Entry::new(
            [2; 2],
            5,
            Path::from_slices(&[b"a"]).unwrap(),
            500,
            0,
            [9; 4],
        );
        assert_eq!(
            wrong_namespace.relative_encode_to_bytes(&reference),
            Err(RelativeEncodeError::NamespaceMismatch)
        );
        assert_eq!(
            wrong_namespace.relative_encoded_length(&reference),
            Err(RelativeEncodeError::NamespaceMismatch)
        );

        for e in [
            entry(6, &[b"a"], 500, 0),
            entry(5, &[b"b"], 500, 0),
            entry(5, &[b"a"], 1000, 0),
            entry(5, &[b"a"], 99, 0),
        ] {
            assert_eq!(
                e.relative_encode_to_bytes(&reference),
                Err(RelativeEncodeError::NotIncluded("area"))
            );
        }
    }

    #[test]
    fn rejects_malformed_input() {
        let reference = (
            [1; 2],
            area(
                AreaSubspace::Id(5),
                &[b"a"],
                Range::new_closed(100, 1000).unwrap(),
            ),
        );

        // Adding 950 to the start lands past the end of the time range.
        assert!(matches!(
            TestEntry::relative_decode_from_slice(
                &reference,
                &[
                    ADD_TO_START | CompactWidth::Two.bitmask(TIME_DIFF_WIDTH_POSITION),
                    1,
                    0,
                    3,
                    182,
                    0,
                    9,
                    9,
                    9,
                    9
                ]
            ),
            Err(DecodeError::InvalidInput(_))
        ));

        // Measured from the farther end of the time range.
        assert!(matches!(
            TestEntry::relative_decode_from_slice(
                &reference,
                &[
                    ADD_TO_START | CompactWidth::Two.bitmask(TIME_DIFF_WIDTH_POSITION),
                    1,
                    0,
                    3,
                    110,
                    0,
                    9,
                    9,
                    9,
                    9
                ]
            ),
            Err(DecodeError::InvalidInput(_))
        ));

        // A subspace although the area fixes it.
        let mut explicit_subspace = vec![SUBSPACE_ENCODED];
        explicit_subspace.extend_from_slice(&5u64.to_be_bytes());
        explicit_subspace.extend_from_slice(&[1, 0, 10, 0, 9, 9, 9, 9]);
        assert!(matches!(
            TestEntry::relative_decode_from_slice(&reference, &explicit_subspace),
            Err(DecodeError::InvalidInput(_))
        ));

        // No subspace although the area does not fix one.
        let any = ([1; 2], area(AreaSubspace::Any, &[], Range::new_open(0)));
        assert!(matches!(
            TestEntry::relative_decode_from_slice(&any, &[ADD_TO_START, 0, 0, 0, 0, 9, 9, 9, 9]),
            Err(DecodeError::InvalidInput(_))
        ));

        // Nonzero reserved bits.
        assert!(matches!(
            TestEntry::relative_decode_from_slice(
                &reference,
                &[0b0000_0001, 1, 0, 10, 2, 9, 9, 9, 9]
            ),
            Err(DecodeError::InvalidInput(_))
        ));
    }
}
