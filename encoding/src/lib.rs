//! Utilities for implementing Willow's various [encodings](https://willowprotocol.org/specs/encodings/index.html#encodings).
//!
//! Encoders append to any [`bytes::BufMut`]. Decoders are written once against [`ufotofu::BulkProducer`]s of bytes and run both on fully buffered input (via [`ufotofu::producer::FromSlice`]) and on incrementally arriving input ([`GrowingBytes`]).

mod compact_width;
mod error;
mod growing_bytes;
mod max_power;
mod producer;
mod traits;

pub use compact_width::*;
pub use error::*;
pub use growing_bytes::*;
pub use max_power::{decode_max_power, encode_max_power, max_power};
pub use producer::*;
pub use traits::*;

/// Returns whether a bit at the given position is `1` or not. Position `0` is the most significant bit, position `7` the least significant bit.
pub fn is_bitflagged(byte: u8, position: u8) -> bool {
    let mask = 1 << (7 - position);
    byte & mask == mask
}
