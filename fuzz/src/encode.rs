use core::fmt::Debug;

use willow_encoding::{
    Decodable, DecodeError, Encodable, GrowingBytes, RelativeDecodable, RelativeEncodable,
};

/// A [`GrowingBytes`] holding all of `data`, with no more bytes to come.
fn complete_bytes(data: &[u8]) -> GrowingBytes {
    let (feeder, bytes) = GrowingBytes::new();

    feeder.push(data);
    feeder.close();

    bytes
}

/// Encodes an item, checks the announced length, and decodes it again.
pub fn encoding_roundtrip<T>(item: &T)
where
    T: Encodable + Decodable + Debug + PartialEq,
{
    let encoded = item.encode_to_bytes();
    assert_eq!(item.encoded_length(), encoded.len());

    assert_eq!(T::decode_from_slice(&encoded).as_ref(), Ok(item));
}

/// Decodes arbitrary bytes. Whatever decodes must re-encode to exactly the consumed bytes.
pub fn encoding_random<T>(data: &[u8])
where
    T: Encodable + Decodable + Debug,
{
    let mut bytes = complete_bytes(data);

    match smol::block_on(T::decode_stream(&mut bytes)) {
        Ok(item) => {
            let encoded = item.encode_to_bytes();
            let consumed = data.len() - bytes.len();
            assert_eq!(&encoded[..], &data[..consumed]);
        }
        Err(DecodeError::UnexpectedEnd) | Err(DecodeError::InvalidInput(_)) => {}
        Err(DecodeError::Producer(never)) => match never {},
        Err(DecodeError::U64DoesNotFitUsize) => {
            panic!("returned U64DoesNotFitUsize on a 64-bit target")
        }
    }
}

/// Encodes an item relative to a reference it is consistent with, checks the announced length, and decodes it again.
pub fn relative_encoding_roundtrip<T, R>(subject: &T, reference: &R)
where
    T: RelativeEncodable<R> + RelativeDecodable<R> + Debug + PartialEq,
    R: Debug,
{
    let encoded = match subject.relative_encode_to_bytes(reference) {
        Ok(encoded) => encoded,
        Err(_) => return,
    };

    assert_eq!(subject.relative_encoded_length(reference), Ok(encoded.len()));

    assert_eq!(
        T::relative_decode_from_slice(reference, &encoded).as_ref(),
        Ok(subject)
    );
}

/// Decodes arbitrary bytes relative to a reference. Whatever decodes must re-encode to exactly the consumed bytes.
pub fn relative_encoding_random<R, T>(reference: &R, data: &[u8])
where
    T: RelativeEncodable<R> + RelativeDecodable<R> + Debug,
    R: Debug,
{
    let mut bytes = complete_bytes(data);

    match smol::block_on(T::relative_decode_stream(reference, &mut bytes)) {
        Ok(item) => {
            let encoded = item.relative_encode_to_bytes(reference).unwrap();
            let consumed = data.len() - bytes.len();
            assert_eq!(&encoded[..], &data[..consumed]);
        }
        Err(DecodeError::UnexpectedEnd) | Err(DecodeError::InvalidInput(_)) => {}
        Err(DecodeError::Producer(never)) => match never {},
        Err(DecodeError::U64DoesNotFitUsize) => {
            panic!("returned U64DoesNotFitUsize on a 64-bit target")
        }
    }
}

/// Decodes `data` once from a slice and once from a [`GrowingBytes`] fed in chunks of the given sizes. Both must agree.
pub fn streaming_matches_buffered<T>(data: &[u8], chunk_sizes: &[u8])
where
    T: Decodable + Debug + PartialEq,
{
    let buffered = T::decode_from_slice(data);

    let (feeder, mut bytes) = GrowingBytes::new();

    let streamed = smol::block_on(async {
        let decode = T::decode_stream(&mut bytes);

        let feed = async move {
            let mut remaining = data;
            let mut sizes = chunk_sizes.iter().cycle();

            while !remaining.is_empty() {
                let size = sizes.next().map_or(1, |size| (*size as usize).max(1));
                let (chunk, rest) = remaining.split_at(size.min(remaining.len()));

                feeder.push(chunk.to_vec());
                remaining = rest;

                smol::future::yield_now().await;
            }

            feeder.close();
        };

        let (decoded, ()) = futures::join!(decode, feed);
        decoded
    });

    assert_eq!(buffered, streamed);
}
