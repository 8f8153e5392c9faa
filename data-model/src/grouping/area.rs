#[cfg(feature = "dev")]
use arbitrary::Arbitrary;

use crate::{
    entry::{Entry, Timestamp},
    grouping::range_3d::Position3d,
    path::Path,
};

use super::range::Range;

/// The possible values of an [`Area`]'s `subspace`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
#[cfg_attr(feature = "dev", derive(Arbitrary))]
pub enum AreaSubspace<S> {
    /// A value that signals that an [`Area`] includes Entries with arbitrary subspace_ids.
    Any,
    /// A concrete [`SubspaceId`](crate::SubspaceId).
    Id(S),
}

impl<S> AreaSubspace<S> {
    /// Returns whether this [`AreaSubspace`] includes Entries with arbitrary subspace_ids.
    pub fn is_any(&self) -> bool {
        matches!(self, AreaSubspace::Any)
    }

    /// Returns the concrete subspace id, if any.
    pub fn id(&self) -> Option<&S> {
        match self {
            AreaSubspace::Any => None,
            AreaSubspace::Id(id) => Some(id),
        }
    }
}

impl<S: PartialEq> AreaSubspace<S> {
    /// Returns whether this [`AreaSubspace`] includes a given [`SubspaceId`](crate::SubspaceId).
    pub fn includes(&self, sub: &S) -> bool {
        match self {
            AreaSubspace::Any => true,
            AreaSubspace::Id(id) => sub == id,
        }
    }

    /// Returns whether this [`AreaSubspace`] includes a given [`AreaSubspace`], i.e., whether its restriction is looser or equal.
    pub fn includes_area_subspace(&self, other: &Self) -> bool {
        match (self, other) {
            (AreaSubspace::Any, _) => true,
            (AreaSubspace::Id(_), AreaSubspace::Any) => false,
            (AreaSubspace::Id(id), AreaSubspace::Id(id_other)) => id == id_other,
        }
    }
}

impl<S: PartialEq + Clone> AreaSubspace<S> {
    /// Returns the intersection between two [`AreaSubspace`]s: the more specific one, or `None` if they name different subspaces.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Self::Any, Self::Any) => Some(Self::Any),
            (Self::Id(a), Self::Any) => Some(Self::Id(a.clone())),
            (Self::Any, Self::Id(b)) => Some(Self::Id(b.clone())),
            (Self::Id(a), Self::Id(b)) if a == b => Some(Self::Id(a.clone())),
            (Self::Id(_), Self::Id(_)) => None,
        }
    }
}

/// A grouping of entries.
///
/// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#areas).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
#[cfg_attr(feature = "dev", derive(Arbitrary))]
pub struct Area<const MCL: usize, const MCC: usize, const MPL: usize, S> {
    /// To be included in this [`Area`], an [`Entry`]’s `subspace_id` must be equal to the subspace_id, unless it is any.
    subspace: AreaSubspace<S>,
    /// To be included in this [`Area`], an [`Entry`]’s `path` must be prefixed by the path.
    path: Path<MCL, MCC, MPL>,
    /// To be included in this [`Area`], an [`Entry`]’s `timestamp` must be included in the times.
    times: Range<Timestamp>,
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S> Area<MCL, MCC, MPL, S> {
    /// Creates a new [`Area`].
    pub fn new(
        subspace: AreaSubspace<S>,
        path: Path<MCL, MCC, MPL>,
        times: Range<Timestamp>,
    ) -> Self {
        Area {
            subspace,
            path,
            times,
        }
    }

    /// Returns a reference to the [`AreaSubspace`].
    ///
    /// To be included in this [`Area`], an [`Entry`]’s `subspace_id` must be equal to the subspace_id, unless it is any.
    pub fn subspace(&self) -> &AreaSubspace<S> {
        &self.subspace
    }

    /// Returns a reference to the [`Path`].
    ///
    /// To be included in this [`Area`], an [`Entry`]’s `path` must be prefixed by the path.
    pub fn path(&self) -> &Path<MCL, MCC, MPL> {
        &self.path
    }

    /// Returns a reference to the range of [`Timestamp`]s.
    ///
    /// To be included in this [`Area`], an [`Entry`]’s `timestamp` must be included in the times.
    pub fn times(&self) -> &Range<Timestamp> {
        &self.times
    }

    /// Returns an [`Area`] which includes all entries.
    ///
    /// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#full_area).
    pub fn new_full() -> Self {
        Self {
            subspace: AreaSubspace::Any,
            path: Path::new_empty(),
            times: Range::new_open(0),
        }
    }

    /// Returns an [`Area`] which includes all entries within a given [subspace](https://willowprotocol.org/specs/data-model/index.html#subspace).
    ///
    /// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#subspace_area).
    pub fn new_subspace(sub: S) -> Self {
        Self {
            subspace: AreaSubspace::Id(sub),
            path: Path::new_empty(),
            times: Range::new_open(0),
        }
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S> Area<MCL, MCC, MPL, S>
where
    S: PartialEq,
{
    /// Returns whether an [`Area`] [includes](https://willowprotocol.org/specs/grouping-entries/index.html#area_include) an [`Entry`].
    pub fn includes_entry<N, PD>(&self, entry: &Entry<MCL, MCC, MPL, N, S, PD>) -> bool {
        self.includes_triplet(entry.subspace_id(), entry.path(), entry.timestamp())
    }

    /// Returns whether an [`Area`] includes a [`Position3d`].
    pub fn includes_position(&self, position: &Position3d<MCL, MCC, MPL, S>) -> bool {
        self.includes_triplet(&position.subspace, &position.path, position.time)
    }

    /// Returns whether an [`Area`] [includes](https://willowprotocol.org/specs/grouping-entries/index.html#area_include) an entry with a given subspace_id, path, and timestamp.
    pub fn includes_triplet(
        &self,
        subspace_id: &S,
        path: &Path<MCL, MCC, MPL>,
        timestamp: Timestamp,
    ) -> bool {
        self.subspace.includes(subspace_id)
            && self.path.is_prefix_of(path)
            && self.times.includes(&timestamp)
    }

    /// Returns whether entries of the given subspace can be included in this [`Area`] at all.
    pub fn includes_subspace(&self, subspace_id: &S) -> bool {
        self.subspace.includes(subspace_id)
    }

    /// Returns whether an [`Area`] fully [includes](https://willowprotocol.org/specs/grouping-entries/index.html#area_include_area) another [`Area`].
    pub fn includes_area(&self, area: &Self) -> bool {
        self.subspace.includes_area_subspace(&area.subspace)
            && self.path.is_prefix_of(&area.path)
            && self.times.includes_range(&area.times)
    }

    /// Returns whether an [`Entry`] can cause prefix-pruning in this [`Area`].
    pub fn could_be_pruned_by<N, PD>(&self, entry: &Entry<MCL, MCC, MPL, N, S, PD>) -> bool {
        self.could_be_pruned_by_triplet(entry.subspace_id(), entry.path(), entry.timestamp())
    }

    /// Returns whether an [`Entry`] of the given subspace_id, path, and timestamp can cause prefix-pruning in this [`Area`].
    pub fn could_be_pruned_by_triplet(
        &self,
        subspace_id: &S,
        path: &Path<MCL, MCC, MPL>,
        timestamp: Timestamp,
    ) -> bool {
        if !self.subspace.includes(subspace_id) {
            return false;
        }

        if timestamp < self.times().start {
            return false;
        }

        path.is_related(&self.path)
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S> Area<MCL, MCC, MPL, S>
where
    S: PartialEq + Clone,
{
    /// Returns the intersection of this [`Area`] with another, or `None` if they share no entries.
    ///
    /// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#area_intersection).
    pub fn intersection(&self, other: &Area<MCL, MCC, MPL, S>) -> Option<Self> {
        let subspace = self.subspace.intersection(&other.subspace)?;

        let path = if self.path.is_prefix_of(&other.path) {
            other.path.clone()
        } else if self.path.is_prefixed_by(&other.path) {
            self.path.clone()
        } else {
            return None;
        };

        let times = self.times.intersection(&other.times)?;

        Some(Self {
            subspace,
            path,
            times,
        })
    }
}
