use core::borrow::Borrow;
use core::ops::Deref;

use bytes::Bytes;

/// A [component](https://willowprotocol.org/specs/data-model/index.html#Component) of a Willow Path, borrowed from the path that contains it.
///
/// A thin wrapper around `&'a [u8]` that enforces the const-generic [maximum component length](https://willowprotocol.org/specs/data-model/index.html#max_component_length) `MCL`. Use the `AsRef`, `Deref`, or `Borrow` implementation to access the bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Component<'a, const MCL: usize>(&'a [u8]);

impl<'a, const MCL: usize> Component<'a, MCL> {
    /// Creates a `Component` from a byte slice. Returns `None` if the slice is longer than `MCL`.
    pub fn new(slice: &'a [u8]) -> Option<Self> {
        if slice.len() <= MCL {
            Some(Self(slice))
        } else {
            None
        }
    }

    /// Wraps a slice whose length the caller has already checked against `MCL`.
    pub(crate) fn new_trusted(slice: &'a [u8]) -> Self {
        debug_assert!(slice.len() <= MCL);
        Self(slice)
    }

    /// Returns an empty component.
    pub fn new_empty() -> Self {
        Self(&[])
    }

    /// Consumes self and returns the raw underlying slice.
    pub fn into_inner(self) -> &'a [u8] {
        self.0
    }
}

impl<const MCL: usize> Deref for Component<'_, MCL> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl<const MCL: usize> AsRef<[u8]> for Component<'_, MCL> {
    fn as_ref(&self) -> &[u8] {
        self.0
    }
}

impl<const MCL: usize> Borrow<[u8]> for Component<'_, MCL> {
    fn borrow(&self) -> &[u8] {
        self.0
    }
}

/// An owned [component](https://willowprotocol.org/specs/data-model/index.html#Component) of a Willow Path that uses reference counting for cheap cloning.
///
/// Handles obtained from [`Path::owned_component`](crate::Path::owned_component) share the memory of the path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnedComponent<const MCL: usize>(pub(crate) Bytes);

impl<const MCL: usize> OwnedComponent<MCL> {
    /// Creates an `OwnedComponent` by copying data from a byte slice. Returns `None` if the slice is longer than `MCL`.
    ///
    /// #### Complexity
    ///
    /// Runs in `O(n)`, where `n` is the length of the slice. Performs a single allocation of `O(n)` bytes.
    pub fn new(data: &[u8]) -> Option<Self> {
        if data.len() <= MCL {
            Some(Self(Bytes::copy_from_slice(data)))
        } else {
            None
        }
    }

    /// Returns an empty component.
    pub fn new_empty() -> Self {
        Self(Bytes::new())
    }

    /// Borrows this as a [`Component`].
    pub fn as_component(&self) -> Component<'_, MCL> {
        Component::new_trusted(&self.0)
    }
}

impl<const MCL: usize> Deref for OwnedComponent<MCL> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const MCL: usize> AsRef<[u8]> for OwnedComponent<MCL> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const MCL: usize> Borrow<[u8]> for OwnedComponent<MCL> {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}
