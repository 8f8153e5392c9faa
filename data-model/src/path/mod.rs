#[cfg(feature = "dev")]
use arbitrary::{size_hint::and_all, Arbitrary, Error as ArbitraryError, Unstructured};

use core::fmt::Debug;
use core::hash::Hash;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use thiserror::Error;

use crate::order::prefix_successor_bytes;

mod component;
pub use component::*;

mod scheme;
pub use scheme::*;

mod codec;
pub use codec::*;

/// An error arising from trying to construct a invalid [`Path`] from valid components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
pub enum InvalidPathError {
    /// The path's total length in bytes is too large.
    #[error("total length of a path in bytes exceeded the maximum path length")]
    PathTooLong,
    /// The path has too many components.
    #[error("number of components of a path exceeded the maximum component count")]
    TooManyComponents,
}

/// Raised upon failing to construct a [`Path`] from bytes that each may or may not exceed the maximum component length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PathConstructionError {
    /// The components are fine, but together they do not form a valid path.
    #[error(transparent)]
    InvalidPath(#[from] InvalidPathError),
    /// Some component is longer than the maximum component length.
    #[error("length of a path component in bytes exceeded the maximum component length")]
    ComponentTooLong,
}

/// An immutable Willow [path](https://willowprotocol.org/specs/data-model/index.html#Path). Thread-safe, cheap to clone, cheap to take prefixes of, expensive to append to (linear time complexity).
///
/// Enforces that each component has a length of at most `MCL` ([**m**ax\_**c**omponent\_**l**ength](https://willowprotocol.org/specs/data-model/index.html#max_component_length)), that each path has at most `MCC` ([**m**ax\_**c**omponent\_**c**count](https://willowprotocol.org/specs/data-model/index.html#max_component_count)) components, and that the total size in bytes of all components is at most `MPL` ([**m**ax\_**p**ath\_**l**ength](https://willowprotocol.org/specs/data-model/index.html#max_path_length)).
#[derive(Clone)]
pub struct Path<const MCL: usize, const MCC: usize, const MPL: usize> {
    /// The concatenated bytes of all components of the underlying path.
    data: Bytes,
    /// The offset in `data` at which each component of the underlying path ends.
    ends: Arc<[usize]>,
    /// Number of components of the underlying path that belong to this particular path (starting from the first component).
    /// Prefixes share `data` and `ends` and only adjust this count.
    component_count: usize,
}

impl<const MCL: usize, const MCC: usize, const MPL: usize> Path<MCL, MCC, MPL> {
    /// Assembles a path from components whose lengths have been checked against `MCL`, checking the component count and total length.
    fn from_checked_components<'a, I>(components: I) -> Result<Self, InvalidPathError>
    where
        I: IntoIterator<Item = &'a [u8]>,
        I::IntoIter: ExactSizeIterator,
    {
        let components = components.into_iter();

        if components.len() > MCC {
            return Err(InvalidPathError::TooManyComponents);
        }

        let mut data = BytesMut::new();
        let mut ends = Vec::with_capacity(components.len());

        for component in components {
            debug_assert!(component.len() <= MCL);

            data.extend_from_slice(component);
            if data.len() > MPL {
                return Err(InvalidPathError::PathTooLong);
            }

            ends.push(data.len());
        }

        let component_count = ends.len();

        Ok(Path {
            data: data.freeze(),
            ends: ends.into(),
            component_count,
        })
    }

    /// Assembles the path of the first `i` components of `self`, followed by `final_component`. The caller guarantees validity.
    fn prefix_then(&self, i: usize, final_component: &[u8]) -> Self {
        let prefix_length = self.path_length_of_prefix(i);

        let mut data = BytesMut::with_capacity(prefix_length + final_component.len());
        data.extend_from_slice(&self.data[..prefix_length]);
        data.extend_from_slice(final_component);

        let mut ends = Vec::with_capacity(i + 1);
        ends.extend_from_slice(&self.ends[..i]);
        ends.push(data.len());

        debug_assert!(ends.len() <= MCC && data.len() <= MPL && final_component.len() <= MCL);

        Path {
            data: data.freeze(),
            ends: ends.into(),
            component_count: i + 1,
        }
    }

    /// Returns an empty path, i.e., a path of zero components.
    ///
    /// #### Complexity
    ///
    /// Runs in `O(1)`, performs no allocations.
    pub fn new_empty() -> Self {
        Path {
            data: Bytes::new(),
            ends: Arc::new([]),
            component_count: 0,
        }
    }

    /// Creates a singleton path, i.e., a path of exactly one component.
    ///
    /// Copies the bytes of the component into an owned allocation on the heap.
    pub fn new_singleton(comp: Component<MCL>) -> Result<Self, InvalidPathError> {
        Self::from_checked_components([comp.into_inner()])
    }

    /// Creates a path from a slice of components.
    ///
    /// Copies the bytes of the components into an owned allocation on the heap.
    ///
    /// #### Complexity
    ///
    /// Runs in `O(n + m)`, where `n` is the total length of the path in bytes, and `m` is the number of components.
    pub fn new_from_slice(components: &[Component<MCL>]) -> Result<Self, InvalidPathError> {
        Self::from_checked_components(components.iter().map(|comp| comp.into_inner()))
    }

    /// Create a new path from a slice of byte slices.
    ///
    /// # Example
    ///
    /// ```
    /// # use willow_data_model::{Path, PathConstructionError, InvalidPathError};
    /// // Ok
    /// let path = Path::<12, 3, 30>::from_slices(&["alfie", "notes"]).unwrap();
    ///
    /// // Err
    /// let result1 = Path::<12, 3, 30>::from_slices(&["themaxpath", "lengthis30", "thisislonger"]);
    /// assert!(matches!(result1, Err(PathConstructionError::InvalidPath(InvalidPathError::PathTooLong))));
    ///
    /// // Err
    /// let result2 = Path::<12, 3, 30>::from_slices(&["too", "many", "components", "error"]);
    /// assert!(matches!(result2, Err(PathConstructionError::InvalidPath(InvalidPathError::TooManyComponents))));
    ///
    /// // Err
    /// let result3 = Path::<12, 3, 30>::from_slices(&["overencumbered"]);
    /// assert!(matches!(result3, Err(PathConstructionError::ComponentTooLong)));
    /// ```
    pub fn from_slices<T: AsRef<[u8]>>(slices: &[T]) -> Result<Self, PathConstructionError> {
        if slices.iter().any(|slice| slice.as_ref().len() > MCL) {
            return Err(PathConstructionError::ComponentTooLong);
        }

        Ok(Self::from_checked_components(
            slices.iter().map(|slice| slice.as_ref()),
        )?)
    }

    /// Creates a new path by appending a component to this one.
    ///
    /// #### Complexity
    ///
    /// Runs in `O(n + m)`, where `n` is the total length of the path in bytes, and `m` is the number of components. Copies all bytes into a fresh allocation.
    pub fn append(&self, comp: Component<MCL>) -> Result<Self, InvalidPathError> {
        self.append_slice(&[comp])
    }

    /// Creates a new path by appending a slice of components to this one.
    pub fn append_slice(&self, components: &[Component<MCL>]) -> Result<Self, InvalidPathError> {
        let all: Vec<&[u8]> = self
            .components()
            .map(Component::into_inner)
            .chain(components.iter().map(|comp| comp.into_inner()))
            .collect();

        Self::from_checked_components(all)
    }

    /// Returns the number of components in this path.
    ///
    /// Guaranteed to be at most `MCC`.
    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// Returns whether this path has zero components.
    pub fn is_empty(&self) -> bool {
        self.component_count() == 0
    }

    /// Returns the sum of the lengths of all components in this path.
    ///
    /// Guaranteed to be at most `MPL`.
    pub fn path_length(&self) -> usize {
        self.path_length_of_prefix(self.component_count())
    }

    /// Returns the sum of the lengths of the first `component_count` components in this path. More efficient than `path.create_prefix(component_count).path_length()`.
    ///
    /// Counts beyond the number of components yield the length of the whole path.
    pub fn path_length_of_prefix(&self, component_count: usize) -> usize {
        match component_count.min(self.component_count) {
            0 => 0,
            count => self.ends[count - 1],
        }
    }

    /// Returns the `i`-th [`Component`] of this path.
    ///
    /// #### Complexity
    ///
    /// Runs in `O(1)`, performs no allocations.
    pub fn component(&self, i: usize) -> Option<Component<MCL>> {
        if i < self.component_count {
            let start = self.path_length_of_prefix(i);
            Some(Component::new_trusted(&self.data[start..self.ends[i]]))
        } else {
            None
        }
    }

    /// Returns an owned handle to the `i`-th [`Component`] of this path.
    ///
    /// #### Complexity
    ///
    /// Runs in `O(1)`, performs no allocations.
    pub fn owned_component(&self, i: usize) -> Option<OwnedComponent<MCL>> {
        if i < self.component_count {
            let start = self.path_length_of_prefix(i);
            Some(OwnedComponent(self.data.slice(start..self.ends[i])))
        } else {
            None
        }
    }

    /// Creates an iterator over the components of this path.
    ///
    /// Stepping the iterator takes `O(1)` time and performs no memory allocations.
    pub fn components(
        &self,
    ) -> impl DoubleEndedIterator<Item = Component<MCL>> + ExactSizeIterator<Item = Component<MCL>>
    {
        self.suffix_components(0)
    }

    /// Creates an iterator over the components of this path, starting at the `i`-th component. If `i` is greater than or equal to the number of components, the iterator yields zero items.
    pub fn suffix_components(
        &self,
        i: usize,
    ) -> impl DoubleEndedIterator<Item = Component<MCL>> + ExactSizeIterator<Item = Component<MCL>>
    {
        let start = i.min(self.component_count);

        (start..self.component_count).map(move |j| {
            let component_start = self.path_length_of_prefix(j);
            Component::new_trusted(&self.data[component_start..self.ends[j]])
        })
    }

    /// Creates an iterator over owned handles to the components of this path.
    pub fn owned_components(
        &self,
    ) -> impl DoubleEndedIterator<Item = OwnedComponent<MCL>>
           + ExactSizeIterator<Item = OwnedComponent<MCL>>
           + '_ {
        (0..self.component_count).map(|j| {
            let component_start = self.path_length_of_prefix(j);
            OwnedComponent(self.data.slice(component_start..self.ends[j]))
        })
    }

    /// Creates a new path that consists of the first `component_count` components. More efficient than creating a new [`Path`] from scratch.
    ///
    /// Returns `None` if `component_count` is greater than `self.component_count()`.
    ///
    /// #### Complexity
    ///
    /// Runs in `O(1)`, performs no allocations.
    pub fn create_prefix(&self, component_count: usize) -> Option<Self> {
        if component_count > self.component_count() {
            None
        } else {
            Some(self.prefix_of_length(component_count))
        }
    }

    fn prefix_of_length(&self, component_count: usize) -> Self {
        Self {
            data: self.data.clone(),
            ends: self.ends.clone(),
            component_count: component_count.min(self.component_count),
        }
    }

    /// Creates an iterator over all prefixes of this path (including the empty path and the path itself), from shortest to longest.
    ///
    /// Stepping the iterator takes `O(1)` time and performs no memory allocations.
    pub fn all_prefixes(&self) -> impl DoubleEndedIterator<Item = Self> + '_ {
        (0..=self.component_count()).map(|i| self.prefix_of_length(i))
    }

    /// Tests whether this path is a prefix of the given path.
    /// Paths are always a prefix of themselves, and the empty path is a prefix of every path.
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.component_count() <= other.component_count()
            && self
                .components()
                .zip(other.components())
                .all(|(comp_a, comp_b)| comp_a == comp_b)
    }

    /// Tests whether this path is prefixed by the given path.
    /// Paths are always a prefix of themselves.
    pub fn is_prefixed_by(&self, other: &Self) -> bool {
        other.is_prefix_of(self)
    }

    /// Tests whether this path is _related_ to the given path, that is, whether either one is a prefix of the other.
    pub fn is_related(&self, other: &Self) -> bool {
        self.is_prefix_of(other) || self.is_prefixed_by(other)
    }

    /// Returns the longest common prefix of this path and the given path.
    ///
    /// Components are compared as a whole, two components that merely share some leading bytes do not contribute to the common prefix.
    ///
    /// #### Complexity
    ///
    /// Runs in `O(n + m)`, where `n` is the total length of the shorter of the two paths, and `m` is the lesser number of components. Performs no allocations.
    pub fn longest_common_prefix(&self, other: &Self) -> Self {
        self.prefix_of_length(self.common_prefix_length(other))
    }

    /// Returns the number of components of the longest common prefix of this path and the given path.
    pub fn common_prefix_length(&self, other: &Self) -> usize {
        self.components()
            .zip(other.components())
            .take_while(|(comp_a, comp_b)| comp_a == comp_b)
            .count()
    }

    /// Returns the least path which is strictly greater than `self`, or return `None` if `self` is the greatest possible path.
    ///
    /// #### Complexity
    ///
    /// Runs in `O(n + m)`, where `n` is the total length of the path in bytes, and `m` is the number of components. Performs a single allocation of `O(n + m)` bytes.
    pub fn successor(&self) -> Option<Self> {
        // Appending an empty component never changes the path length.
        if self.component_count() < MCC {
            return Some(self.prefix_then(self.component_count(), &[]));
        }

        // Every greater path that extends `self` would need another component.
        self.greater_but_not_prefixed()
    }

    /// Returns the least path that is strictly greater than `self` and which is not prefixed by `self`, or `None` if no such path exists.
    ///
    /// Returns `None` for the empty path, since it prefixes every path.
    pub fn greater_but_not_prefixed(&self) -> Option<Self> {
        // Replace the last component that admits a greater replacement by the least such replacement, and drop all later components.
        for (i, component) in self.components().enumerate().rev() {
            if component.len() < MCL && self.path_length_of_prefix(i + 1) < MPL {
                let mut lengthened = Vec::with_capacity(component.len() + 1);
                lengthened.extend_from_slice(&component);
                lengthened.push(0);

                return Some(self.prefix_then(i, &lengthened));
            }

            if let Some(incremented) = prefix_successor_bytes(&component) {
                return Some(self.prefix_then(i, &incremented));
            }
        }

        None
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize> Default for Path<MCL, MCC, MPL> {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize> PartialEq for Path<MCL, MCC, MPL> {
    fn eq(&self, other: &Self) -> bool {
        self.component_count == other.component_count && self.components().eq(other.components())
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize> Eq for Path<MCL, MCC, MPL> {}

impl<const MCL: usize, const MCC: usize, const MPL: usize> Hash for Path<MCL, MCC, MPL> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.component_count.hash(state);

        for comp in self.components() {
            comp.hash(state);
        }
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize> PartialOrd for Path<MCL, MCC, MPL> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Compares paths lexicographically, component by component, with a prefix sorting before its extensions.
impl<const MCL: usize, const MCC: usize, const MPL: usize> Ord for Path<MCL, MCC, MPL> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.components().cmp(other.components())
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize> Debug for Path<MCL, MCC, MPL> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data_vec: Vec<_> = self.components().collect();

        f.debug_tuple("Path").field(&data_vec).finish()
    }
}

#[cfg(feature = "dev")]
impl<'a, const MCL: usize, const MCC: usize, const MPL: usize> Arbitrary<'a>
    for Path<MCL, MCC, MPL>
{
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self, ArbitraryError> {
        let mut component_count: usize = Arbitrary::arbitrary(u)?;
        component_count %= MCC + 1;

        let mut remaining = MPL;
        let mut components: Vec<Vec<u8>> = Vec::with_capacity(component_count);

        for _ in 0..component_count {
            let mut component: Vec<u8> = Arbitrary::arbitrary(u)?;
            component.truncate(MCL.min(remaining));
            remaining -= component.len();

            components.push(component);
        }

        Self::from_checked_components(components.iter().map(Vec::as_slice))
            .map_err(|_| ArbitraryError::IncorrectFormat)
    }

    #[inline]
    fn size_hint(depth: usize) -> (usize, Option<usize>) {
        (
            and_all(&[usize::size_hint(depth), Vec::<u8>::size_hint(depth)]).0,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MCL: usize = 8;
    const MCC: usize = 4;
    const MPL: usize = 16;

    type TestPath = Path<MCL, MCC, MPL>;

    fn path(components: &[&[u8]]) -> TestPath {
        TestPath::from_slices(components).unwrap()
    }

    #[test]
    fn empty() {
        let empty_path = TestPath::new_empty();

        assert_eq!(empty_path.component_count(), 0);
        assert_eq!(empty_path.path_length(), 0);
        assert!(empty_path.is_empty());
        assert_eq!(empty_path.components().len(), 0);
        assert_eq!(empty_path.all_prefixes().count(), 1);
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            TestPath::from_slices(&[b"a".as_slice(); 5]),
            Err(PathConstructionError::InvalidPath(
                InvalidPathError::TooManyComponents
            ))
        );
        assert_eq!(
            TestPath::from_slices(&[[0u8; 8], [0u8; 8], [0u8; 8]]),
            Err(PathConstructionError::InvalidPath(InvalidPathError::PathTooLong))
        );
        assert_eq!(
            TestPath::from_slices(&[[0u8; 9]]),
            Err(PathConstructionError::ComponentTooLong)
        );

        let full = path(&[b"abcdefgh", b"abcdefgh"]);
        assert_eq!(
            full.append(Component::new(b"x").unwrap()),
            Err(InvalidPathError::PathTooLong)
        );
        assert!(full.append(Component::new_empty()).is_ok());
    }

    #[test]
    fn components() {
        let p = path(&[b"alfie", b"", b"notes"]);

        assert_eq!(p.component_count(), 3);
        assert_eq!(p.path_length(), 10);
        assert_eq!(p.path_length_of_prefix(1), 5);
        assert_eq!(p.component(1), Some(Component::new_empty()));
        assert_eq!(p.component(2).map(Component::into_inner), Some(&b"notes"[..]));
        assert_eq!(p.component(3), None);
        assert_eq!(&*p.owned_component(0).unwrap(), b"alfie");

        let suffix: Vec<_> = p.suffix_components(1).map(|c| c.to_vec()).collect();
        assert_eq!(suffix, vec![b"".to_vec(), b"notes".to_vec()]);
        assert_eq!(p.suffix_components(7).len(), 0);
        assert_eq!(p.owned_components().len(), 3);

        let singleton = TestPath::new_singleton(Component::new(b"alfie").unwrap()).unwrap();
        assert_eq!(p.create_prefix(1), Some(singleton));
        assert_eq!(p.create_prefix(4), None);
    }

    #[test]
    fn appending() {
        let p = path(&[b"a"]);
        let appended = p
            .append_slice(&[Component::new(b"b").unwrap(), Component::new(b"c").unwrap()])
            .unwrap();

        assert_eq!(appended, path(&[b"a", b"b", b"c"]));
        assert_eq!(
            p.append(Component::new(b"b").unwrap()).unwrap(),
            path(&[b"a", b"b"])
        );
        assert_eq!(p, path(&[b"a"]));
    }

    #[test]
    fn prefix_laws() {
        let empty = TestPath::new_empty();
        let p = path(&[b"a", b"bc"]);
        let extended = path(&[b"a", b"bc", b"d"]);

        assert!(p.is_prefix_of(&p));
        assert!(empty.is_prefix_of(&p));
        assert!(p.is_prefix_of(&extended));
        assert!(!extended.is_prefix_of(&p));
        assert!(extended.is_prefixed_by(&p));
        assert!(p.is_related(&extended));
        assert!(extended.is_related(&p));

        let partial = path(&[b"a", b"b"]);
        assert!(!partial.is_prefix_of(&p));
        assert!(!partial.is_related(&p));

        let prefixes: Vec<_> = extended.all_prefixes().collect();
        assert_eq!(
            prefixes,
            vec![empty, path(&[b"a"]), p.clone(), extended.clone()]
        );
    }

    #[test]
    fn longest_common_prefix() {
        let a = path(&[b"a", b"bc", b"d"]);
        let b = path(&[b"a", b"bcd"]);
        let c = path(&[b"a", b"bc", b"e", b"f"]);

        assert_eq!(a.longest_common_prefix(&b), path(&[b"a"]));
        assert_eq!(a.longest_common_prefix(&c), path(&[b"a", b"bc"]));
        assert_eq!(a.longest_common_prefix(&a), a);
        assert_eq!(a.common_prefix_length(&TestPath::new_empty()), 0);
    }

    #[test]
    fn ordering() {
        let empty = TestPath::new_empty();

        assert!(empty < path(&[b""]));
        assert!(path(&[b""]) < path(&[b"", b""]));
        assert!(path(&[b"a"]) < path(&[b"a", b""]));
        assert!(path(&[b"a", b"z"]) < path(&[b"b"]));
        assert!(path(&[b"a"]) < path(&[b"a\0"]));
        assert_eq!(path(&[b"x"]).cmp(&path(&[b"x"])), core::cmp::Ordering::Equal);
    }

    #[test]
    fn prefixes_share_memory_but_not_identity() {
        let p = path(&[b"a", b"b"]);
        let prefix = p.create_prefix(1).unwrap();

        assert_eq!(prefix, path(&[b"a"]));
        assert_ne!(prefix, p);
        assert_eq!(prefix.path_length(), 1);
        assert_eq!(prefix.path_length_of_prefix(2), 1);
    }

    #[test]
    fn successor_vectors() {
        assert_eq!(TestPath::new_empty().successor(), Some(path(&[b""])));
        assert_eq!(path(&[b"a"]).successor(), Some(path(&[b"a", b""])));

        type Tiny = Path<3, 1, 3>;
        assert_eq!(
            Tiny::from_slices(&[[255u8, 255, 255]]).unwrap().successor(),
            None
        );
        assert_eq!(
            Tiny::from_slices(&[[0u8, 255, 255]]).unwrap().successor(),
            Some(Tiny::from_slices(&[[1u8]]).unwrap())
        );
        assert_eq!(
            Tiny::from_slices(&[[7u8]]).unwrap().successor(),
            Some(Tiny::from_slices(&[[7u8, 0]]).unwrap())
        );

        // Only an earlier component can carry.
        type Pair = Path<2, 2, 4>;
        assert_eq!(
            Pair::from_slices(&[[1u8, 5], [255, 255]]).unwrap().successor(),
            Some(Pair::from_slices(&[[1u8, 6]]).unwrap())
        );

        // Total length limit reached before the component length limit.
        type Short = Path<4, 2, 3>;
        assert_eq!(
            Short::from_slices(&[vec![1u8, 2], vec![3]]).unwrap().successor(),
            Some(Short::from_slices(&[vec![1u8, 2], vec![4]]).unwrap())
        );
    }

    #[test]
    fn greater_but_not_prefixed_vectors() {
        assert_eq!(TestPath::new_empty().greater_but_not_prefixed(), None);
        assert_eq!(
            path(&[b"a"]).greater_but_not_prefixed(),
            Some(path(&[b"a\0"]))
        );

        type Tiny = Path<2, 2, 4>;
        assert_eq!(
            Tiny::from_slices(&[vec![3u8], vec![255, 255]])
                .unwrap()
                .greater_but_not_prefixed(),
            Some(Tiny::from_slices(&[vec![3u8, 0]]).unwrap())
        );
        assert_eq!(
            Tiny::from_slices(&[vec![255u8, 255], vec![255, 255]])
                .unwrap()
                .greater_but_not_prefixed(),
            None
        );
    }

    /// Enumerates every path of `Path<2, 2, 3>` over the alphabet `{0, 1, 255}`.
    fn all_small_paths() -> Vec<Path<2, 2, 3>> {
        let alphabet = [0u8, 1, 255];
        let mut components: Vec<Vec<u8>> = vec![vec![]];
        for a in alphabet {
            components.push(vec![a]);
            for b in alphabet {
                components.push(vec![a, b]);
            }
        }

        let mut paths = vec![Path::new_empty()];
        for first in components.iter() {
            paths.push(Path::from_slices(&[first]).unwrap());

            for second in components.iter() {
                if let Ok(p) = Path::from_slices(&[first, second]) {
                    paths.push(p);
                }
            }
        }

        paths.sort();
        paths
    }

    #[test]
    fn successors_are_direct() {
        let paths = all_small_paths();

        for p in paths.iter() {
            if let Some(successor) = p.successor() {
                assert!(*p < successor);
                assert!(!paths.iter().any(|q| p < q && *q < successor));
            } else {
                assert!(!paths.iter().any(|q| p < q));
            }

            if let Some(successor) = p.greater_but_not_prefixed() {
                assert!(*p < successor);
                assert!(!successor.is_prefixed_by(p));
                assert!(!paths
                    .iter()
                    .any(|q| p < q && *q < successor && !q.is_prefixed_by(p)));
            } else {
                assert!(!paths.iter().any(|q| p < q && !q.is_prefixed_by(p)));
            }
        }
    }
}
