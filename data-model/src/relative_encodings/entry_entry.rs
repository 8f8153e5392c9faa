use bytes::BufMut;
use ufotofu::BulkProducer;

use willow_encoding::{
    compact_width, decode_compact_width_be, encode_compact_width_be, produce_byte,
    CompactWidth, DecodeError, EncodingScheme, RelativeDecodable, RelativeEncodable,
    RelativeEncodeError,
};

use crate::{Entry, NamespaceId, Path, PayloadDigest, SubspaceId};

use super::check_flags;

const NAMESPACE_ENCODED: u8 = 0b1000_0000;
const SUBSPACE_ENCODED: u8 = 0b0100_0000;
const ADD_TIME_DIFF: u8 = 0b0010_0000;
// Bit 3 is always zero.
const TIME_DIFF_WIDTH_POSITION: u8 = 4;
const PAYLOAD_LENGTH_WIDTH_POSITION: u8 = 6;

fn header<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD>(
    entry: &Entry<MCL, MCC, MPL, N, S, PD>,
    reference: &Entry<MCL, MCC, MPL, N, S, PD>,
) -> u8
where
    N: PartialEq,
    S: PartialEq,
{
    let mut header = 0;

    if entry.namespace_id() != reference.namespace_id() {
        header |= NAMESPACE_ENCODED;
    }

    if entry.subspace_id() != reference.subspace_id() {
        header |= SUBSPACE_ENCODED;
    }

    if entry.timestamp() >= reference.timestamp() {
        header |= ADD_TIME_DIFF;
    }

    let time_diff = entry.timestamp().abs_diff(reference.timestamp());
    header |= CompactWidth::from_u64(time_diff).bitmask(TIME_DIFF_WIDTH_POSITION);
    header |= CompactWidth::from_u64(entry.payload_length()).bitmask(PAYLOAD_LENGTH_WIDTH_POSITION);

    header
}

/// [Encodes](https://willowprotocol.org/specs/encodings/index.html#enc_etry_relative_entry) an [`Entry`] relative to a reference [`Entry`]: a header byte, the namespace id and subspace id if they differ from the reference, the path relative to the reference path, the time difference, the payload length, and the payload digest.
impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD>
    RelativeEncodable<Entry<MCL, MCC, MPL, N, S, PD>> for Entry<MCL, MCC, MPL, N, S, PD>
where
    N: NamespaceId + EncodingScheme,
    S: SubspaceId + EncodingScheme,
    PD: PayloadDigest + EncodingScheme,
{
    fn relative_encode<B: BufMut>(
        &self,
        reference: &Entry<MCL, MCC, MPL, N, S, PD>,
        buf: &mut B,
    ) -> Result<(), RelativeEncodeError> {
        let header = header(self, reference);
        buf.put_u8(header);

        if header & NAMESPACE_ENCODED != 0 {
            self.namespace_id().encode(buf);
        }

        if header & SUBSPACE_ENCODED != 0 {
            self.subspace_id().encode(buf);
        }

        self.path().relative_encode(reference.path(), buf)?;

        encode_compact_width_be(self.timestamp().abs_diff(reference.timestamp()), buf);
        encode_compact_width_be(self.payload_length(), buf);

        self.payload_digest().encode(buf);

        Ok(())
    }

    fn relative_encoded_length(
        &self,
        reference: &Entry<MCL, MCC, MPL, N, S, PD>,
    ) -> Result<usize, RelativeEncodeError> {
        let mut length = 1;

        if self.namespace_id() != reference.namespace_id() {
            length += self.namespace_id().encoded_length();
        }

        if self.subspace_id() != reference.subspace_id() {
            length += self.subspace_id().encoded_length();
        }

        length += self.path().relative_encoded_length(reference.path())?;
        length += compact_width(self.timestamp().abs_diff(reference.timestamp()));
        length += compact_width(self.payload_length());
        length += self.payload_digest().encoded_length();

        Ok(length)
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD>
    RelativeDecodable<Entry<MCL, MCC, MPL, N, S, PD>> for Entry<MCL, MCC, MPL, N, S, PD>
where
    N: NamespaceId + EncodingScheme,
    S: SubspaceId + EncodingScheme,
    PD: PayloadDigest + EncodingScheme,
{
    async fn relative_decode<P>(
        reference: &Entry<MCL, MCC, MPL, N, S, PD>,
        producer: &mut P,
    ) -> Result<Self, DecodeError<P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let read_header = produce_byte(producer).await?;

        let namespace_id = if read_header & NAMESPACE_ENCODED != 0 {
            N::decode(producer).await?
        } else {
            reference.namespace_id().clone()
        };

        let subspace_id = if read_header & SUBSPACE_ENCODED != 0 {
            S::decode(producer).await?
        } else {
            reference.subspace_id().clone()
        };

        let path = Path::relative_decode(reference.path(), producer).await?;

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

        let timestamp = if read_header & ADD_TIME_DIFF != 0 {
            reference.timestamp().checked_add(time_diff)
        } else {
            reference.timestamp().checked_sub(time_diff)
        }
        .ok_or_else(|| DecodeError::<P::Error>::invalid("time difference overflows"))?;

        let entry = Entry::new(
            namespace_id,
            subspace_id,
            path,
            timestamp,
            payload_length,
            payload_digest,
        );

        check_flags(read_header, header(&entry, reference))?;

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use crate::relative_encodings::{assert_relative_round_trip, decode_one_byte_at_a_time};

    use super::*;

    const MCL: usize = 8;
    const MCC: usize = 4;
    const MPL: usize = 16;

    type TestEntry = Entry<MCL, MCC, MPL, [u8; 2], u64, [u8; 4]>;

    fn entry(
        namespace: u8,
        subspace: u64,
        path: &[&[u8]],
        timestamp: u64,
        payload_length: u64,
    ) -> TestEntry {
        Entry::new(
            [namespace; 2],
            subspace,
            Path::from_slices(path).unwrap(),
            timestamp,
            payload_length,
            [7; 4],
        )
    }

    #[test]
    fn identical_entries() {
        let e = entry(1, 2, &[b"a", b"b"], 1000, 1024);
        let encoded = assert_relative_round_trip(&e, &e);

        // Header, path relative to itself (lcp 2, no suffix), time diff, payload length, digest.
        assert_eq!(
            &encoded[..],
            &[
                ADD_TIME_DIFF | CompactWidth::Two.bitmask(PAYLOAD_LENGTH_WIDTH_POSITION),
                2,
                0,
                0,
                4,
                0,
                7,
                7,
                7,
                7
            ]
        );
    }

    #[test]
    fn differing_fields() {
        let reference = entry(1, 2, &[b"a", b"b"], 1000, 1024);

        let cases = [
            entry(9, 2, &[b"a", b"b"], 1000, 0),
            entry(1, 3, &[b"a"], 999, 5),
            entry(9, 3, &[b"c", b"d", b"e"], 0, u64::MAX),
            entry(1, 2, &[], u64::MAX, 70_000),
            entry(1, 2, &[b"a", b"b", b"c"], 1000 + 300, 1024),
        ];

        for e in cases.iter() {
            assert_relative_round_trip(e, &reference);
        }

        let encoded = cases[1].relative_encode_to_bytes(&reference).unwrap();
        assert_eq!(encoded[0] & NAMESPACE_ENCODED, 0);
        assert_eq!(encoded[0] & SUBSPACE_ENCODED, SUBSPACE_ENCODED);
        assert_eq!(encoded[0] & ADD_TIME_DIFF, 0);
    }

    #[test]
    fn rejects_non_canonical() {
        let reference = entry(1, 2, &[b"a"], 1000, 10);
        let e = entry(1, 2, &[b"a"], 1000, 10);
        let encoded = e.relative_encode_to_bytes(&reference).unwrap();

        // Subtracting a zero time difference is not canonical.
        let mut subtracting = encoded.to_vec();
        subtracting[0] &= !ADD_TIME_DIFF;
        assert!(matches!(
            TestEntry::relative_decode_from_slice(&reference, &subtracting),
            Err(DecodeError::InvalidInput(_))
        ));

        // Reserved bit set.
        let mut reserved = encoded.to_vec();
        reserved[0] |= 0b0001_0000;
        assert!(matches!(
            TestEntry::relative_decode_from_slice(&reference, &reserved),
            Err(DecodeError::InvalidInput(_))
        ));

        // Explicitly encoding the reference's own namespace.
        let mut explicit_namespace = vec![encoded[0] | NAMESPACE_ENCODED, 1, 1];
        explicit_namespace.extend_from_slice(&encoded[1..]);
        assert!(matches!(
            TestEntry::relative_decode_from_slice(&reference, &explicit_namespace),
            Err(DecodeError::InvalidInput(_))
        ));

        // Time difference below zero.
        let earlier = entry(1, 2, &[b"a"], 0, 10);
        let mut underflow = earlier.relative_encode_to_bytes(&reference).unwrap().to_vec();
        let time_diff_width = CompactWidth::Two.bitmask(TIME_DIFF_WIDTH_POSITION);
        assert_eq!(underflow[0] & time_diff_width, time_diff_width);
        let time_diff_offset = 1 + 2;
        underflow[time_diff_offset..time_diff_offset + 2].copy_from_slice(&1001u16.to_be_bytes());
        assert!(matches!(
            TestEntry::relative_decode_from_slice(&reference, &underflow),
            Err(DecodeError::InvalidInput(_))
        ));

        assert_eq!(
            decode_one_byte_at_a_time::<_, TestEntry>(&reference, &encoded[..encoded.len() - 1]),
            Err(DecodeError::UnexpectedEnd)
        );
    }
}
