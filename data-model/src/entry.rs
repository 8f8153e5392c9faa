use std::cmp::Ordering;

#[cfg(feature = "dev")]
use arbitrary::{size_hint::and_all, Arbitrary};

use crate::{
    grouping::Position3d,
    parameters::{NamespaceId, PayloadDigest, SubspaceId},
    path::Path,
};

/// A Timestamp is a 64-bit unsigned integer, that is, a natural number between zero (inclusive) and 2^64 (exclusive).
/// Timestamps are to be interpreted as a time in microseconds since the Unix epoch.
/// [Definition](https://willowprotocol.org/specs/data-model/index.html#Timestamp).
pub type Timestamp = u64;

/// The metadata associated with each Payload.
/// [Definition](https://willowprotocol.org/specs/data-model/index.html#Entry).
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Entry<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD> {
    /// The identifier of the namespace to which the [`Entry`] belongs.
    namespace_id: N,
    /// The identifier of the subspace to which the [`Entry`] belongs.
    subspace_id: S,
    /// The [`Path`] to which the [`Entry`] was written.
    path: Path<MCL, MCC, MPL>,
    /// The claimed creation time of the [`Entry`].
    timestamp: Timestamp,
    /// The length of the Payload in bytes.
    payload_length: u64,
    /// The result of applying hash_payload to the Payload.
    payload_digest: PD,
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD>
    Entry<MCL, MCC, MPL, N, S, PD>
{
    /// Creates a new [`Entry`].
    pub fn new(
        namespace_id: N,
        subspace_id: S,
        path: Path<MCL, MCC, MPL>,
        timestamp: Timestamp,
        payload_length: u64,
        payload_digest: PD,
    ) -> Self {
        Entry {
            namespace_id,
            subspace_id,
            path,
            timestamp,
            payload_length,
            payload_digest,
        }
    }

    /// Returns a reference to the identifier of the namespace to which the [`Entry`] belongs.
    pub fn namespace_id(&self) -> &N {
        &self.namespace_id
    }

    /// Returns a reference to the identifier of the subspace_id to which the [`Entry`] belongs.
    pub fn subspace_id(&self) -> &S {
        &self.subspace_id
    }

    /// Returns a reference to the [`Path`] to which the [`Entry`] was written.
    pub fn path(&self) -> &Path<MCL, MCC, MPL> {
        &self.path
    }

    /// Returns the claimed creation time of the [`Entry`].
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns the length of the Payload in bytes.
    pub fn payload_length(&self) -> u64 {
        self.payload_length
    }

    /// Returns a reference to the result of applying hash_payload to the Payload.
    pub fn payload_digest(&self) -> &PD {
        &self.payload_digest
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD> Entry<MCL, MCC, MPL, N, S, PD>
where
    S: Clone,
{
    /// Returns the position of this [`Entry`] in the three-dimensional space of subspaces, paths, and timestamps.
    pub fn position(&self) -> Position3d<MCL, MCC, MPL, S> {
        Position3d {
            subspace: self.subspace_id.clone(),
            path: self.path.clone(),
            time: self.timestamp,
        }
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD> Entry<MCL, MCC, MPL, N, S, PD>
where
    PD: PayloadDigest,
{
    /// Returns if this [`Entry`] is newer than another using their timestamps.
    /// Tie-breaks using the Entries' payload digest and payload length otherwise.
    ///
    /// [Definition](https://willowprotocol.org/specs/data-model/index.html#entry_newer).
    pub fn is_newer_than(&self, other: &Self) -> bool {
        other.timestamp < self.timestamp
            || (other.timestamp == self.timestamp && other.payload_digest < self.payload_digest)
            || (other.timestamp == self.timestamp
                && other.payload_digest == self.payload_digest
                && other.payload_length < self.payload_length)
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD> PartialOrd
    for Entry<MCL, MCC, MPL, N, S, PD>
where
    N: NamespaceId + Ord,
    S: SubspaceId,
    PD: PayloadDigest,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Entries are first compared by namespace id, then by subspace id, then by path. If those are all equal, the entries are
/// sorted by their newer relation (see [`Entry::is_newer_than`]).
impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD> Ord
    for Entry<MCL, MCC, MPL, N, S, PD>
where
    N: NamespaceId + Ord,
    S: SubspaceId,
    PD: PayloadDigest,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.namespace_id
            .cmp(&other.namespace_id)
            .then_with(|| self.subspace_id.cmp(&other.subspace_id))
            .then_with(|| self.path.cmp(&other.path))
            .then_with(|| {
                if self.is_newer_than(other) {
                    Ordering::Greater
                } else if other.is_newer_than(self) {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
    }
}

mod encoding {
    use super::*;

    use bytes::BufMut;

    use ufotofu::BulkProducer;
    use willow_encoding::{DecodeError, Decodable, Encodable};

    /// The [entry encoding](https://willowprotocol.org/specs/encodings/index.html#enc_entry): namespace id, subspace id, path, then timestamp and payload length as 8-byte big-endian integers, then the payload digest.
    impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD> Encodable
        for Entry<MCL, MCC, MPL, N, S, PD>
    where
        N: NamespaceId + Encodable,
        S: SubspaceId + Encodable,
        PD: PayloadDigest + Encodable,
    {
        fn encode<B: BufMut>(&self, buf: &mut B) {
            self.namespace_id.encode(buf);
            self.subspace_id.encode(buf);
            self.path.encode(buf);

            buf.put_u64(self.timestamp);
            buf.put_u64(self.payload_length);

            self.payload_digest.encode(buf);
        }

        fn encoded_length(&self) -> usize {
            self.namespace_id.encoded_length()
                + self.subspace_id.encoded_length()
                + self.path.encoded_length()
                + 8
                + 8
                + self.payload_digest.encoded_length()
        }
    }

    impl<const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD> Decodable
        for Entry<MCL, MCC, MPL, N, S, PD>
    where
        N: NamespaceId + Decodable,
        S: SubspaceId + Decodable,
        PD: PayloadDigest + Decodable,
    {
        async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Error>>
        where
            P: BulkProducer<Item = u8>,
        {
            let namespace_id = N::decode(producer).await?;
            let subspace_id = S::decode(producer).await?;
            let path = Path::<MCL, MCC, MPL>::decode(producer).await?;
            let timestamp = u64::decode(producer).await?;
            let payload_length = u64::decode(producer).await?;
            let payload_digest = PD::decode(producer).await?;

            Ok(Entry {
                namespace_id,
                subspace_id,
                path,
                timestamp,
                payload_length,
                payload_digest,
            })
        }
    }
}

#[cfg(feature = "dev")]
impl<'a, const MCL: usize, const MCC: usize, const MPL: usize, N, S, PD> Arbitrary<'a>
    for Entry<MCL, MCC, MPL, N, S, PD>
where
    N: Arbitrary<'a>,
    S: Arbitrary<'a>,
    PD: Arbitrary<'a>,
{
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self {
            namespace_id: Arbitrary::arbitrary(u)?,
            subspace_id: Arbitrary::arbitrary(u)?,
            path: Arbitrary::arbitrary(u)?,
            timestamp: Arbitrary::arbitrary(u)?,
            payload_length: Arbitrary::arbitrary(u)?,
            payload_digest: Arbitrary::arbitrary(u)?,
        })
    }

    fn size_hint(depth: usize) -> (usize, Option<usize>) {
        and_all(&[
            N::size_hint(depth),
            S::size_hint(depth),
            Path::<MCL, MCC, MPL>::size_hint(depth),
            u64::size_hint(depth),
            u64::size_hint(depth),
            PD::size_hint(depth),
        ])
    }
}
