use core::cmp::min;

use either::Either::{Left, Right};
use ufotofu::BulkProducer;

use crate::error::DecodeError;

/// Produce exactly one byte.
pub async fn produce_byte<P>(producer: &mut P) -> Result<u8, DecodeError<P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    match producer.produce().await {
        Ok(Left(byte)) => Ok(byte),
        Ok(Right(_)) => Err(DecodeError::UnexpectedEnd),
        Err(err) => Err(DecodeError::Producer(err)),
    }
}

/// Overwrite all of `buf` with produced bytes, taking as many bytes per step as the producer exposes.
pub async fn produce_into_slice<P>(
    producer: &mut P,
    buf: &mut [u8],
) -> Result<(), DecodeError<P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    let mut filled = 0;

    while filled < buf.len() {
        match producer.expose_items().await.map_err(DecodeError::Producer)? {
            Right(_) => return Err(DecodeError::UnexpectedEnd),
            Left(items) => {
                let amount = min(items.len(), buf.len() - filled);
                buf[filled..filled + amount].copy_from_slice(&items[..amount]);

                producer
                    .consider_produced(amount)
                    .await
                    .map_err(DecodeError::Producer)?;
                filled += amount;
            }
        }
    }

    Ok(())
}

/// Produce exactly `N` bytes into an array.
pub async fn produce_array<P, const N: usize>(
    producer: &mut P,
) -> Result<[u8; N], DecodeError<P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    let mut array = [0u8; N];
    produce_into_slice(producer, &mut array).await?;

    Ok(array)
}

/// Produce exactly `length` bytes into a fresh vector.
pub async fn produce_vec<P>(producer: &mut P, length: usize) -> Result<Vec<u8>, DecodeError<P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    let mut bytes = vec![0u8; length];
    produce_into_slice(producer, &mut bytes).await?;

    Ok(bytes)
}
