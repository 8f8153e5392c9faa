use bytes::BufMut;
use ufotofu::BulkProducer;

use willow_encoding::{
    decode_max_power, encode_max_power, max_power, produce_vec, DecodeError, Decodable,
    Encodable, RelativeDecodable, RelativeEncodable, RelativeEncodeError,
};

use super::*;

/// Appends the component count followed by each length-prefixed component.
fn encode_components<'a, const MCL: usize, const MCC: usize, B, I>(components: I, buf: &mut B)
where
    B: BufMut,
    I: ExactSizeIterator<Item = Component<'a, MCL>>,
{
    encode_max_power(components.len(), MCC, buf);

    for component in components {
        encode_max_power(component.len(), MCL, buf);
        buf.put_slice(&component);
    }
}

fn components_encoded_length<'a, const MCL: usize, const MCC: usize, I>(components: I) -> usize
where
    I: ExactSizeIterator<Item = Component<'a, MCL>>,
{
    let length_width = max_power(MCL as u64) as usize;
    let count_width = max_power(MCC as u64) as usize;

    components.fold(count_width, |total, component| {
        total + length_width + component.len()
    })
}

/// Decodes a component count (bounded by `max_count`) followed by that many length-prefixed components.
async fn decode_components<const MCL: usize, P>(
    max_count: usize,
    producer: &mut P,
) -> Result<Vec<Vec<u8>>, DecodeError<P::Error>>
where
    P: BulkProducer<Item = u8>,
{
    let count = usize::try_from(decode_max_power(max_count, producer).await?)?;
    let mut components = Vec::with_capacity(count);

    for _ in 0..count {
        let length = usize::try_from(decode_max_power(MCL, producer).await?)?;
        components.push(produce_vec(producer, length).await?);
    }

    Ok(components)
}

/// The [path encoding](https://willowprotocol.org/specs/encodings/index.html#enc_path): the component count, then each component prefixed by its length. Both counts and lengths use the least width that fits `MCC` and `MCL` respectively.
impl<const MCL: usize, const MCC: usize, const MPL: usize> Encodable for Path<MCL, MCC, MPL> {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        encode_components::<MCL, MCC, _, _>(self.components(), buf);
    }

    fn encoded_length(&self) -> usize {
        components_encoded_length::<MCL, MCC, _>(self.components())
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize> Decodable for Path<MCL, MCC, MPL> {
    async fn decode<P>(producer: &mut P) -> Result<Self, DecodeError<P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let components = decode_components::<MCL, _>(MCC, producer).await?;

        Path::from_checked_components(components.iter().map(|component| &component[..]))
            .map_err(|_| DecodeError::invalid("decoded path exceeds the maximum path length"))
    }
}

/// The [path relative to path encoding](https://willowprotocol.org/specs/encodings/index.html#enc_path_relative): the number of components of the longest common prefix with the reference, then the encoding of the remaining components.
impl<const MCL: usize, const MCC: usize, const MPL: usize> RelativeEncodable<Path<MCL, MCC, MPL>>
    for Path<MCL, MCC, MPL>
{
    fn relative_encode<B: BufMut>(
        &self,
        reference: &Path<MCL, MCC, MPL>,
        buf: &mut B,
    ) -> Result<(), RelativeEncodeError> {
        let lcp_length = self.common_prefix_length(reference);

        encode_max_power(lcp_length, MCC, buf);
        encode_components::<MCL, MCC, _, _>(self.suffix_components(lcp_length), buf);

        Ok(())
    }

    fn relative_encoded_length(
        &self,
        reference: &Path<MCL, MCC, MPL>,
    ) -> Result<usize, RelativeEncodeError> {
        Ok(encoded_path_relative_length(self, reference))
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize> RelativeDecodable<Path<MCL, MCC, MPL>>
    for Path<MCL, MCC, MPL>
{
    async fn relative_decode<P>(
        reference: &Path<MCL, MCC, MPL>,
        producer: &mut P,
    ) -> Result<Self, DecodeError<P::Error>>
    where
        P: BulkProducer<Item = u8>,
    {
        let lcp_length = usize::try_from(decode_max_power(MCC, producer).await?)?;

        if lcp_length > reference.component_count() {
            return Err(DecodeError::invalid(
                "common prefix is longer than the reference path",
            ));
        }

        let suffix = decode_components::<MCL, _>(MCC, producer).await?;

        if let (Some(first), Some(diverging)) = (suffix.first(), reference.component(lcp_length)) {
            if first[..] == diverging[..] {
                return Err(DecodeError::invalid(
                    "common prefix with the reference path was not maximal",
                ));
            }
        }

        let components = reference
            .components()
            .take(lcp_length)
            .map(Component::into_inner)
            .chain(suffix.iter().map(|component| &component[..]))
            .collect::<Vec<_>>();

        Path::from_checked_components(components)
            .map_err(|_| DecodeError::invalid("decoded path exceeds the maximum path length"))
    }
}

/// Returns the number of bytes of the encoding of `path` relative to `reference`, without encoding.
pub fn encoded_path_relative_length<const MCL: usize, const MCC: usize, const MPL: usize>(
    path: &Path<MCL, MCC, MPL>,
    reference: &Path<MCL, MCC, MPL>,
) -> usize {
    let lcp_length = path.common_prefix_length(reference);

    max_power(MCC as u64) as usize
        + components_encoded_length::<MCL, MCC, _>(path.suffix_components(lcp_length))
}
