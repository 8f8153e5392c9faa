use core::mem::size_of;

use bytes::BufMut;
use ufotofu::BulkProducer;

use crate::error::DecodeError;
use crate::producer::produce_into_slice;

/// Returns the least natural number `n` such that 256^`n` is strictly greater than `max_size`.
///
/// Used for determining the minimal number of bytes needed to represent every unsigned integer up to a known bound, and more specifically [`path_length_power`](https://willowprotocol.org/specs/encodings/index.html#path_length_power) and [`path_count_power`](https://willowprotocol.org/specs/encodings/index.html#path_count_power).
pub const fn max_power(max_size: u64) -> u8 {
    if max_size < 256 {
        1
    } else if max_size < 256u64.pow(2) {
        2
    } else if max_size < 256u64.pow(3) {
        3
    } else if max_size < 256u64.pow(4) {
        4
    } else if max_size < 256u64.pow(5) {
        5
    } else if max_size < 256u64.pow(6) {
        6
    } else if max_size < 256u64.pow(7) {
        7
    } else {
        8
    }
}

/// Encodes a `usize` to a `n`-width big-endian unsigned integer, where `n` is the least number of bytes needed to represent `max_size`.
///
/// Panics if `value` is greater than `max_size`.
pub fn encode_max_power<B: BufMut>(value: usize, max_size: usize, buf: &mut B) {
    if value > max_size {
        panic!("Can't encode a value larger than its maximum possible value!")
    }

    let power = max_power(max_size as u64) as usize;
    let value_encoded_raw: [u8; size_of::<u64>()] = (value as u64).to_be_bytes();

    buf.put_slice(&value_encoded_raw[size_of::<u64>() - power..]);
}

/// Decodes a `u64` from a `n`-width bytestring, where `n` is the least number of bytes needed to represent `max_size`.
///
/// Rejects values greater than `max_size`.
pub async fn decode_max_power<P>(
    max_size: usize,
    producer: &mut P,
) -> Result<u64, DecodeError<P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    let power = max_power(max_size as u64) as usize;

    let mut raw = [0u8; size_of::<u64>()];
    produce_into_slice(producer, &mut raw[size_of::<u64>() - power..]).await?;

    let value = u64::from_be_bytes(raw);

    if value > max_size as u64 {
        return Err(DecodeError::invalid("value exceeds its declared maximum"));
    }

    Ok(value)
}
