use core::num::TryFromIntError;

use thiserror::Error;

/// Everything that can go wrong when decoding a value from a producer whose errors are of type `ProducerError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError<ProducerError> {
    /// The producer of the bytes to be decoded errored.
    #[error("the underlying producer encountered an error: {0}")]
    Producer(ProducerError),
    /// The producer emitted its final value before a complete value could be decoded.
    #[error("the producer ended before the value was fully decoded")]
    UnexpectedEnd,
    /// The bytes cannot be decoded into anything meaningful. The string names the violated rule.
    #[error("decoding failed due to receiving invalid input: {0}")]
    InvalidInput(&'static str),
    /// Tried to use a u64 as a usize when the current compilation target's usize is not big enough.
    #[error("tried (and failed) to decode a u64 to a 32-bit usize")]
    U64DoesNotFitUsize,
}

impl<ProducerError> DecodeError<ProducerError> {
    /// Creates a [`DecodeError::InvalidInput`], emitting a debug event that names the rejected rule.
    pub fn invalid(reason: &'static str) -> Self {
        tracing::debug!(reason, "rejecting malformed encoding");
        DecodeError::InvalidInput(reason)
    }
}

impl RelativeEncodeError {
    /// Creates a [`RelativeEncodeError::NotIncluded`], emitting a debug event that names the reference.
    pub fn not_included(reference: &'static str) -> Self {
        tracing::debug!(reference, "rejecting value outside of its reference");
        RelativeEncodeError::NotIncluded(reference)
    }
}

impl<ProducerError> From<TryFromIntError> for DecodeError<ProducerError> {
    fn from(_: TryFromIntError) -> Self {
        DecodeError::U64DoesNotFitUsize
    }
}

/// Everything that can go wrong when encoding a value relative to some reference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RelativeEncodeError {
    /// The value is not included in the reference it should be encoded against. The string names the kind of reference.
    #[error("the value to encode is not included in the reference {0}")]
    NotIncluded(&'static str),
    /// The entry to encode belongs to a different namespace than the reference namespace.
    #[error("the entry to encode belongs to a different namespace than the reference")]
    NamespaceMismatch,
}
