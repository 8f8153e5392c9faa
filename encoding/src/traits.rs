use core::convert::Infallible;
use core::future::Future;

use bytes::{BufMut, Bytes, BytesMut};
use ufotofu::producer::FromSlice;
use ufotofu::BulkProducer;

use crate::error::{DecodeError, RelativeEncodeError};
use crate::growing_bytes::GrowingBytes;
use crate::producer::{produce_array, produce_byte};

/// A type that can be encoded to a bytestring, ensuring that any value of `Self` maps to exactly one bytestring.
///
/// [Definition](https://willowprotocol.org/specs/encodings/index.html#encodings_what)
pub trait Encodable {
    /// Appends the encoding of this value to `buf`.
    ///
    /// [Definition](https://willowprotocol.org/specs/encodings/index.html#encode_s)
    fn encode<B: BufMut>(&self, buf: &mut B);

    /// Returns the number of bytes [`Encodable::encode`] appends, without encoding.
    fn encoded_length(&self) -> usize;

    /// Encodes this value into a fresh, exactly sized buffer.
    fn encode_to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_length());
        self.encode(&mut buf);
        buf.freeze()
    }
}

/// A type that can be asynchronously decoded from bytes produced by a [`ufotofu::BulkProducer`], ensuring that every valid encoding maps to exactly one member of `Self`.
///
/// [Definition](https://willowprotocol.org/specs/encodings/index.html#encodings_what)
pub trait Decodable: Sized {
    /// Decodes a value from the bytes of `producer`, consuming exactly the bytes of its encoding.
    ///
    /// [Definition](https://willowprotocol.org/specs/encodings/index.html#decode_s)
    fn decode<P>(producer: &mut P) -> impl Future<Output = Result<Self, DecodeError<P::Error>>>
    where
        P: BulkProducer<Item = u8>;

    /// Decodes a value from the start of a fully buffered bytestring. Trailing bytes are ignored.
    fn decode_from_slice(bytes: &[u8]) -> Result<Self, DecodeError<Infallible>> {
        let mut producer = FromSlice::new(bytes);
        pollster::block_on(Self::decode(&mut producer))
    }

    /// Decodes a value from incrementally arriving bytes, pruning its encoding from `bytes`.
    fn decode_stream(
        bytes: &mut GrowingBytes,
    ) -> impl Future<Output = Result<Self, DecodeError<Infallible>>> {
        Self::decode(bytes)
    }
}

/// A type that can be encoded relative to a reference value of type `R`.
/// This can be used to create more compact encodings from which `Self` can be derived by anyone with `R`.
///
/// Implementations check that the value is consistent with the reference before appending anything, so a rejected value leaves `buf` untouched.
pub trait RelativeEncodable<R> {
    /// Appends the encoding of this value relative to `reference` to `buf`.
    fn relative_encode<B: BufMut>(
        &self,
        reference: &R,
        buf: &mut B,
    ) -> Result<(), RelativeEncodeError>;

    /// Returns the number of bytes [`RelativeEncodable::relative_encode`] appends, without encoding.
    fn relative_encoded_length(&self, reference: &R) -> Result<usize, RelativeEncodeError>;

    /// Encodes this value relative to `reference` into a fresh, exactly sized buffer.
    fn relative_encode_to_bytes(&self, reference: &R) -> Result<Bytes, RelativeEncodeError> {
        let mut buf = BytesMut::with_capacity(self.relative_encoded_length(reference)?);
        self.relative_encode(reference, &mut buf)?;
        Ok(buf.freeze())
    }
}

/// A type that can be asynchronously decoded from bytes *encoded relative to `R`* produced by a [`ufotofu::BulkProducer`].
pub trait RelativeDecodable<R>: Sized {
    /// Decodes a value relative to `reference` from the bytes of `producer`, consuming exactly the bytes of its encoding.
    fn relative_decode<P>(
        reference: &R,
        producer: &mut P,
    ) -> impl Future<Output = Result<Self, DecodeError<P::Error>>>
    where
        P: BulkProducer<Item = u8>;

    /// Decodes a value relative to `reference` from the start of a fully buffered bytestring. Trailing bytes are ignored.
    fn relative_decode_from_slice(
        reference: &R,
        bytes: &[u8],
    ) -> Result<Self, DecodeError<Infallible>> {
        let mut producer = FromSlice::new(bytes);
        pollster::block_on(Self::relative_decode(reference, &mut producer))
    }

    /// Decodes a value relative to `reference` from incrementally arriving bytes, pruning its encoding from `bytes`.
    fn relative_decode_stream(
        reference: &R,
        bytes: &mut GrowingBytes,
    ) -> impl Future<Output = Result<Self, DecodeError<Infallible>>> {
        Self::relative_decode(reference, bytes)
    }
}

/// Everything needed to treat a type as an opaque value in Willow encodings: a canonical encoding with known length, and buffered as well as streaming decoding.
pub trait EncodingScheme: Encodable + Decodable {}

impl<T: Encodable + Decodable> EncodingScheme for T {}

impl Encodable for u8 {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(*self);
    }

    fn encoded_length(&self) -> usize {
        1
    }
}

impl Decodable for u8 {
    async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        produce_byte(producer).await
    }
}

/// Encoded as an 8-byte big-endian integer.
impl Encodable for u64 {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u64(*self);
    }

    fn encoded_length(&self) -> usize {
        8
    }
}

impl Decodable for u64 {
    async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let bytes = produce_array(producer).await?;
        Ok(u64::from_be_bytes(bytes))
    }
}

/// Encoded as its raw bytes.
impl<const N: usize> Encodable for [u8; N] {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(self);
    }

    fn encoded_length(&self) -> usize {
        N
    }
}

impl<const N: usize> Decodable for [u8; N] {
    async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        produce_array(producer).await
    }
}
