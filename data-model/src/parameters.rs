use core::fmt::Debug;

use crate::grouping::{Range, RangeEnd};
use crate::order::successor_bytes_fixed_width;

/// A type for identifying [namespaces](https://willowprotocol.org/specs/data-model/index.html#namespace).
///
/// Encodings that need to transmit namespace ids additionally require [`willow_encoding::EncodingScheme`].
///
/// [Definition](https://willowprotocol.org/specs/data-model/index.html#NamespaceId).
pub trait NamespaceId: Eq + Default + Clone + Debug {}

/// A type for identifying [subspaces](https://willowprotocol.org/specs/data-model/index.html#subspace).
///
/// [Definition](https://willowprotocol.org/specs/data-model/index.html#SubspaceId).
///
/// ## Implementation notes
///
/// The [`Default`] implementation **must** return the least element in the total order of [`SubspaceId`].
pub trait SubspaceId: Ord + Default + Clone + Debug {
    /// Returns the next possible value in the set of all [`SubspaceId`], i.e. the (unique) least value that is strictly greater than `self`. Only if there is no greater value at all may this method return `None`.
    fn successor(&self) -> Option<Self>;

    /// Returns a range which *only* [includes](https://willowprotocol.org/specs/grouping-entries/index.html#range_include) the value of `self`.
    fn singleton_range(&self) -> Range<Self> {
        match self.successor() {
            Some(successor) => Range {
                start: self.clone(),
                end: RangeEnd::Closed(successor),
            },
            None => Range::new_open(self.clone()),
        }
    }
}

/// A totally ordered type for [content-addressing](https://en.wikipedia.org/wiki/Content_addressing) the data that Willow stores.
///
/// [Definition](https://willowprotocol.org/specs/data-model/index.html#PayloadDigest).
///
/// ## Implementation notes
///
/// The [`Default`] implementation **must** return the least element in the total order of [`PayloadDigest`].
pub trait PayloadDigest: Ord + Default + Clone + Debug {}

impl NamespaceId for u64 {}

impl SubspaceId for u64 {
    fn successor(&self) -> Option<Self> {
        self.checked_add(1)
    }
}

impl PayloadDigest for u64 {}

impl<const N: usize> NamespaceId for [u8; N] where [u8; N]: Default {}

/// Byte arrays are ordered lexicographically, so the successor is the fixed-width big-endian increment.
impl<const N: usize> SubspaceId for [u8; N]
where
    [u8; N]: Default,
{
    fn successor(&self) -> Option<Self> {
        let incremented = successor_bytes_fixed_width(self)?;

        let mut successor = [0u8; N];
        successor.copy_from_slice(&incremented);

        Some(successor)
    }
}

impl<const N: usize> PayloadDigest for [u8; N] where [u8; N]: Default {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_successors() {
        assert_eq!(3u64.successor(), Some(4));
        assert_eq!(u64::MAX.successor(), None);
        assert_eq!(u64::default(), 0);
    }

    #[test]
    fn array_successors() {
        assert_eq!([0u8, 0].successor(), Some([0, 1]));
        assert_eq!([0u8, 255].successor(), Some([1, 0]));
        assert_eq!([255u8, 255].successor(), None);

        let id = [1u8, 255];
        assert!(id < id.successor().unwrap());
    }

    #[test]
    fn singleton_ranges() {
        assert_eq!(7u64.singleton_range(), Range::new_closed(7, 8).unwrap());
        assert_eq!(u64::MAX.singleton_range(), Range::new_open(u64::MAX));

        let range = 7u64.singleton_range();
        assert!(range.includes(&7));
        assert!(!range.includes(&8));
        assert!(!range.includes(&6));
    }
}
