use bytes::BufMut;
use ufotofu::BulkProducer;

use willow_encoding::{
    compact_width, decode_compact_width_be, encode_compact_width_be, produce_byte,
    CompactWidth, DecodeError, EncodingScheme, RelativeDecodable, RelativeEncodable,
    RelativeEncodeError,
};

use crate::grouping::Range3d;
use crate::{Entry, NamespaceId, Path, PayloadDigest, SubspaceId};

use super::{
    check_flags, decoded_path_anchor, diff_from_closer, end_or_max, path_anchor,
    path_relative_to_start, undo_diff,
};

const SUBSPACE_ENCODED: u8 = 0b1000_0000;
const PATH_RELATIVE_TO_START: u8 = 0b0100_0000;
const ADD_TO_START: u8 = 0b0010_0000;
// Bit 3 is always zero.
const TIME_DIFF_WIDTH_POSITION: u8 = 4;
const PAYLOAD_LENGTH_WIDTH_POSITION: u8 = 6;

fn time_diff<const MCL: usize, const MCC: usize, const MPL: usize, S>(
    timestamp: u64,
    range: &Range3d<MCL, MCC, MPL, S>,
) -> (u64, bool) {
    diff_from_closer(timestamp, range.times().start, end_or_max(&range.times().end))
}

fn header<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD>(
    entry: &Entry<MCL, MCC, MPL, N, S, PD>,
    range: &Range3d<MCL, MCC, MPL, S>,
) -> u8
where
    S: PartialEq,
{
    let mut header = 0;

    if entry.subspace_id() != &range.subspaces().start {
        header |= SUBSPACE_ENCODED;
    }

    if path_relative_to_start(entry.path(), range.paths()) {
        header |= PATH_RELATIVE_TO_START;
    }

    let (time_diff, add) = time_diff(entry.timestamp(), range);

    if add {
        header |= ADD_TO_START;
    }

    header |= CompactWidth::from_u64(time_diff).bitmask(TIME_DIFF_WIDTH_POSITION);
    header |= CompactWidth::from_u64(entry.payload_length()).bitmask(PAYLOAD_LENGTH_WIDTH_POSITION);

    header
}

/// [Encodes](https://willowprotocol.org/specs/encodings/index.html#enc_entry_in_namespace_3drange) an [`Entry`] that lies in a known namespace and is [included](https://willowprotocol.org/specs/grouping-entries/index.html#d3_range_include) in a known [`Range3d`].
///
/// The subspace is elided if it equals the start of the subspace range, the path is encoded relative to whichever path range boundary shares the longer prefix with it, and the timestamp as a difference to the closer time range boundary.
impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD>
    RelativeEncodable<(N, Range3d<MCL, MCC, MPL, S>)> for Entry<MCL, MCC, MPL, N, S, PD>
where
    N: NamespaceId + EncodingScheme,
    S: SubspaceId + EncodingScheme,
    PD: PayloadDigest + EncodingScheme,
{
    fn relative_encode<B: BufMut>(
        &self,
        reference: &(N, Range3d<MCL, MCC, MPL, S>),
        buf: &mut B,
    ) -> Result<(), RelativeEncodeError> {
        let (namespace, range) = reference;

        if self.namespace_id() != namespace {
            return Err(RelativeEncodeError::NamespaceMismatch);
        }

        if !range.includes_entry(self) {
            return Err(RelativeEncodeError::not_included("3d range"));
        }

        let header = header(self, range);
        buf.put_u8(header);

        if header & SUBSPACE_ENCODED != 0 {
            self.subspace_id().encode(buf);
        }

        self.path()
            .relative_encode(path_anchor(self.path(), range.paths()), buf)?;

        encode_compact_width_be(time_diff(self.timestamp(), range).0, buf);
        encode_compact_width_be(self.payload_length(), buf);

        self.payload_digest().encode(buf);

        Ok(())
    }

    fn relative_encoded_length(
        &self,
        reference: &(N, Range3d<MCL, MCC, MPL, S>),
    ) -> Result<usize, RelativeEncodeError> {
        let (namespace, range) = reference;

        if self.namespace_id() != namespace {
            return Err(RelativeEncodeError::NamespaceMismatch);
        }

        if !range.includes_entry(self) {
            return Err(RelativeEncodeError::not_included("3d range"));
        }

        let subspace_length = if self.subspace_id() != &range.subspaces().start {
            self.subspace_id().encoded_length()
        } else {
            0
        };

        Ok(1 + subspace_length
            + self
                .path()
                .relative_encoded_length(path_anchor(self.path(), range.paths()))?
            + compact_width(time_diff(self.timestamp(), range).0)
            + compact_width(self.payload_length())
            + self.payload_digest().encoded_length())
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD>
    RelativeDecodable<(N, Range3d<MCL, MCC, MPL, S>)> for Entry<MCL, MCC, MPL, N, S, PD>
where
    N: NamespaceId + EncodingScheme,
    S: SubspaceId + EncodingScheme,
    PD: PayloadDigest + EncodingScheme,
{
    async fn relative_decode<P>(
        reference: &(N, Range3d<MCL, MCC, MPL, S>),
        producer: &mut P,
    ) -> Result<Self, DecodeError<P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let (namespace, range) = reference;

        let read_header = produce_byte(producer).await?;

        let subspace_id = if read_header & SUBSPACE_ENCODED != 0 {
            S::decode(producer).await?
        } else {
            range.subspaces().start.clone()
        };

        let path_reference =
            decoded_path_anchor(read_header & PATH_RELATIVE_TO_START != 0, range.paths())?;

        let path = Path::relative_decode(path_reference, producer).await?;

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
            range.times().start,
            end_or_max(&range.times().end),
        )?;

        let entry = Entry::new(
            namespace.clone(),
            subspace_id,
            path,
            timestamp,
            payload_length,
            payload_digest,
        );

        if !range.includes_entry(&entry) {
            return Err(DecodeError::invalid("decoded entry lies outside the 3d range"));
        }

        check_flags(read_header, header(&entry, range))?;

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use crate::grouping::Range;
    use crate::relative_encodings::assert_relative_round_trip;

    use super::*;

    const MCL: usize = 8;
    const MCC: usize = 4;
    const MPL: usize = 16;

    type TestEntry = Entry<MCL, MCC, MPL, [u8; 2], u64, [u8; 4]>;
    type TestPath = Path<MCL, MCC, MPL>;
    type TestRange3d = Range3d<MCL, MCC, MPL, u64>;

    fn path(components: &[&[u8]]) -> TestPath {
        TestPath::from_slices(components).unwrap()
    }

    fn entry(
        subspace: u64,
        components: &[&[u8]],
        timestamp: u64,
        payload_length: u64,
    ) -> TestEntry {
        Entry::new([1; 2], subspace, path(components), timestamp, payload_length, [3; 4])
    }

    fn closed_range() -> ([u8; 2], TestRange3d) {
        (
            [1; 2],
            Range3d::new(
                Range::new_closed(10, 20).unwrap(),
                Range::new_closed(path(&[b"a", b"b"]), path(&[b"x", b"y", b"z"])).unwrap(),
                Range::new_closed(1000, 2000).unwrap(),
            ),
        )
    }

    #[test]
    fn round_trips() {
        let closed = closed_range();

        for e in [
            entry(10, &[b"a", b"b"], 1000, 0),
            entry(15, &[b"a", b"c"], 1999, 1),
            entry(19, &[b"x", b"y"], 1500, 300),
            entry(12, &[b"x", b"a"], 1200, 70_000),
            entry(10, &[b"m"], 1800, u64::MAX),
        ] {
            assert_relative_round_trip(&e, &closed);
        }

        let open = ([1; 2], TestRange3d::new_full());

        for e in [
            entry(0, &[], 0, 0),
            entry(u64::MAX, &[b"q", b"r"], u64::MAX, 1),
            entry(7, &[b"a"], u64::MAX / 2 + 1, 2),
        ] {
            assert_relative_round_trip(&e, &open);
        }
    }

    #[test]
    fn anchors() {
        let (namespace, range) = closed_range();
        let reference = (namespace, range);

        // Closer to the end of the path range, and to the end of the time range.
        let encoded = entry(10, &[b"x", b"y"], 1990, 4)
            .relative_encode_to_bytes(&reference)
            .unwrap();
        assert_eq!(encoded[0], 0);
        // Two components in common with the end of the path range, nothing left over.
        assert_eq!(&encoded[1..3], &[2, 0]);
        assert_eq!(&encoded[3..], &[10, 4, 3, 3, 3, 3]);

        // Ties go to the starts.
        let encoded = entry(11, &[b"m"], 1500, 4)
            .relative_encode_to_bytes(&reference)
            .unwrap();
        assert_eq!(
            encoded[0],
            SUBSPACE_ENCODED
                | PATH_RELATIVE_TO_START
                | ADD_TO_START
                | CompactWidth::Two.bitmask(TIME_DIFF_WIDTH_POSITION)
        );
        assert_eq!(&encoded[1..9], &11u64.to_be_bytes());
    }

    #[test]
    fn rejects_entries_outside_the_range() {
        let reference = closed_range();

        assert_eq!(
            Entry::new([2; 2], 10, path(&[b"a", b"b"]), 1000, 0, [3; 4])
                .relative_encode_to_bytes(&reference),
            Err(RelativeEncodeError::NamespaceMismatch)
        );

        for e in [
            entry(20, &[b"a", b"b"], 1000, 0),
            entry(10, &[b"a"], 1000, 0),
            entry(10, &[b"x", b"y", b"z"], 1000, 0),
            entry(10, &[b"a", b"b"], 2000, 0),
        ] {
            assert_eq!(
                e.relative_encoded_length(&reference),
                Err(RelativeEncodeError::NotIncluded("3d range"))
            );
        }
    }

    #[test]
    fn rejects_malformed_input() {
        let open = ([1; 2], TestRange3d::new_full());

        // Path relative to the end of an open path range.
        assert!(matches!(
            TestEntry::relative_decode_from_slice(&open, &[ADD_TO_START, 0, 0, 0, 0, 3, 3, 3, 3]),
            Err(DecodeError::InvalidInput(_))
        ));

        // Canonical encoding of the least entry, then with the reserved bit set.
        let least = entry(0, &[], 0, 0).relative_encode_to_bytes(&open).unwrap();
        assert_eq!(&least[..], &[PATH_RELATIVE_TO_START | ADD_TO_START, 0, 0, 0, 0, 3, 3, 3, 3]);

        let mut reserved = least.to_vec();
        reserved[0] |= 0b0001_0000;
        assert!(matches!(
            TestEntry::relative_decode_from_slice(&open, &reserved),
            Err(DecodeError::InvalidInput(_))
        ));

        // Subtracting 1001 from the end of the time range lands before its start.
        let reference = closed_range();
        assert!(matches!(
            TestEntry::relative_decode_from_slice(
                &reference,
                &[
                    PATH_RELATIVE_TO_START | CompactWidth::Two.bitmask(TIME_DIFF_WIDTH_POSITION),
                    2,
                    0,
                    0x03,
                    0xE9,
                    0,
                    3,
                    3,
                    3,
                    3
                ]
            ),
            Err(DecodeError::InvalidInput(_))
        ));
    }
}
