use bytes::BufMut;
use ufotofu::BulkProducer;

use crate::error::DecodeError;
use crate::producer::produce_array;

/// A minimum width of bytes needed to represent a unsigned integer.
///
/// [Definition](https://willowprotocol.org/specs/encodings/index.html#compact_width)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompactWidth {
    /// The byte-width required to represent numbers up to 256 (i.e. a 8-bit number).
    One,
    /// The byte-width required to represent numbers up to 256^2 (i.e. a 16-bit number).
    Two,
    /// The byte-width required to represent numbers up to 256^4 (i.e. a 32-bit number).
    Four,
    /// The byte-width required to represent numbers up to 256^8 (i.e. a 64-bit number).
    Eight,
}

/// The four compact widths, indexed by the 2-bit class stored in flag bytes.
pub const COMPACT_WIDTH_CLASSES: [CompactWidth; 4] = [
    CompactWidth::One,
    CompactWidth::Two,
    CompactWidth::Four,
    CompactWidth::Eight,
];

/// Bit masks selecting a 2-bit width class, indexed by the bit position (0 is the most significant bit) at which the class starts.
pub const COMPACT_WIDTH_MASKS: [u8; 7] = [
    0b1100_0000,
    0b0110_0000,
    0b0011_0000,
    0b0001_1000,
    0b0000_1100,
    0b0000_0110,
    0b0000_0011,
];

impl CompactWidth {
    /// Returns the [`CompactWidth`] of the given byte count, or `None` if it is not 1, 2, 4, or 8.
    pub fn new(width: usize) -> Option<CompactWidth> {
        match width {
            1 => Some(CompactWidth::One),
            2 => Some(CompactWidth::Two),
            4 => Some(CompactWidth::Four),
            8 => Some(CompactWidth::Eight),
            _ => None,
        }
    }

    /// Return the most compact width in bytes (1, 2, 4, or 8) needed to represent a given `u64` as a corresponding 8-bit, 16-bit, 32-bit, or 64-bit number.
    ///
    /// [Definition](https://willowprotocol.org/specs/encodings/index.html#compact_width).
    pub fn from_u64(value: u64) -> Self {
        if value <= u8::MAX as u64 {
            CompactWidth::One
        } else if value <= u16::MAX as u64 {
            CompactWidth::Two
        } else if value <= u32::MAX as u64 {
            CompactWidth::Four
        } else {
            CompactWidth::Eight
        }
    }

    /// Return the width in bytes of this [`CompactWidth`].
    pub fn width(&self) -> usize {
        match self {
            CompactWidth::One => 1,
            CompactWidth::Two => 2,
            CompactWidth::Four => 4,
            CompactWidth::Eight => 8,
        }
    }

    /// The 2-bit integer `n` such that 2^n is the width of this [`CompactWidth`].
    pub fn class(&self) -> u8 {
        match self {
            CompactWidth::One => 0,
            CompactWidth::Two => 1,
            CompactWidth::Four => 2,
            CompactWidth::Eight => 3,
        }
    }

    /// Place the 2-bit class of this [`CompactWidth`] into a `u8` so that it starts at the bit-index of `position` (0 is the most significant bit).
    pub fn bitmask(&self, position: u8) -> u8 {
        (self.class() << 6) >> position
    }

    /// Read the 2-bit width class that starts at bit-index `position` of `flags`.
    pub fn decode_fixed_width_bitmask(flags: u8, position: u8) -> Self {
        let mask = COMPACT_WIDTH_MASKS[position as usize];
        let class = (flags & mask) >> (6 - position);

        COMPACT_WIDTH_CLASSES[class as usize]
    }
}

/// Returns the number of bytes (1, 2, 4, or 8) of the most compact width of `value`.
pub fn compact_width(value: u64) -> usize {
    CompactWidth::from_u64(value).width()
}

/// Encode a `u64` integer as a `compact_width(value)`-byte big-endian integer.
pub fn encode_compact_width_be<B: BufMut>(value: u64, buf: &mut B) {
    let width = compact_width(value);
    buf.put_slice(&value.to_be_bytes()[8 - width..]);
}

/// Decode a big-endian integer of the given width from a slice whose length must be exactly that width.
///
/// Returns `None` if the slice is not 1, 2, 4, or 8 bytes long.
pub fn decode_compact_width_slice(bytes: &[u8]) -> Option<u64> {
    let width = CompactWidth::new(bytes.len())?;

    let mut raw = [0u8; 8];
    raw[8 - width.width()..].copy_from_slice(bytes);

    Some(u64::from_be_bytes(raw))
}

/// Decode the bytes representing a [`CompactWidth`]-bytes integer into a `u64`.
///
/// Rejects encodings that use more bytes than necessary, so that every value has exactly one encoding.
pub async fn decode_compact_width_be<P>(
    compact_width: CompactWidth,
    producer: &mut P,
) -> Result<u64, DecodeError<P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    let decoded = match compact_width {
        CompactWidth::One => u8::from_be_bytes(produce_array(producer).await?) as u64,
        CompactWidth::Two => u16::from_be_bytes(produce_array(producer).await?) as u64,
        CompactWidth::Four => u32::from_be_bytes(produce_array(producer).await?) as u64,
        CompactWidth::Eight => u64::from_be_bytes(produce_array(producer).await?),
    };

    if CompactWidth::from_u64(decoded) != compact_width {
        return Err(DecodeError::invalid("compact width was not minimal"));
    }

    Ok(decoded)
}
