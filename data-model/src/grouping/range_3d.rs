#[cfg(feature = "dev")]
use arbitrary::Arbitrary;

use core::cmp::Ordering;

use crate::{
    entry::{Entry, Timestamp},
    grouping::{area::Area, area::AreaSubspace, range::Range, range::RangeEnd},
    parameters::SubspaceId,
    path::Path,
};

/// A point in the three-dimensional space of [`SubspaceId`]s, [`Path`]s, and [`Timestamp`]s, such as the position of an [`Entry`].
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "dev", derive(Arbitrary))]
pub struct Position3d<const MCL: usize, const MCC: usize, const MPL: usize, S> {
    /// The [`SubspaceId`] coordinate.
    pub subspace: S,
    /// The [`Path`] coordinate.
    pub path: Path<MCL, MCC, MPL>,
    /// The [`Timestamp`] coordinate.
    pub time: Timestamp,
}

/// A three-dimensional range that includes every Entry included in all three of its ranges.
///
/// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#D3Range).
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Range3d<const MCL: usize, const MCC: usize, const MPL: usize, S> {
    /// A range of [`SubspaceId`]s.
    /// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#SubspaceRange).
    subspaces: Range<S>,
    /// A range of [`Path`]s.
    /// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#PathRange).
    paths: Range<Path<MCL, MCC, MPL>>,
    /// A range of [`Timestamp`]s.
    /// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#TimeRange).
    times: Range<Timestamp>,
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S> Range3d<MCL, MCC, MPL, S> {
    /// Creates a new [`Range3d`].
    pub fn new(
        subspaces: Range<S>,
        paths: Range<Path<MCL, MCC, MPL>>,
        times: Range<Timestamp>,
    ) -> Self {
        Range3d {
            subspaces,
            paths,
            times,
        }
    }

    /// Returns a reference to the range of [`SubspaceId`]s.
    ///
    /// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#SubspaceRange).
    pub fn subspaces(&self) -> &Range<S> {
        &self.subspaces
    }

    /// Returns a reference to the range of [`Path`]s.
    ///
    /// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#PathRange).
    pub fn paths(&self) -> &Range<Path<MCL, MCC, MPL>> {
        &self.paths
    }

    /// Returns a reference to the range of [`Timestamp`]s.
    ///
    /// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#TimeRange).
    pub fn times(&self) -> &Range<Timestamp> {
        &self.times
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S> Range3d<MCL, MCC, MPL, S>
where
    S: Default,
{
    /// Creates a new [`Range3d`] that covers everything. Requires `S::default()` to be the least `S` to be correct.
    pub fn new_full() -> Self {
        Self::new(
            Range::full(),
            Range::new_open(Path::new_empty()),
            Range::new_open(0),
        )
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S> Range3d<MCL, MCC, MPL, S>
where
    S: Ord,
{
    /// Returns whether all three ranges are [valid](Range::is_valid).
    pub fn is_valid(&self) -> bool {
        self.subspaces.is_valid() && self.paths.is_valid() && self.times.is_valid()
    }

    /// Returns whether a [`Position3d`] lies within all three ranges.
    pub fn includes_position(&self, position: &Position3d<MCL, MCC, MPL, S>) -> bool {
        self.includes_triplet(&position.subspace, &position.path, position.time)
    }

    /// Returns whether an [`Entry`] is [included](https://willowprotocol.org/specs/grouping-entries/index.html#d3_range_include) by this 3d range.
    pub fn includes_entry<N, PD>(&self, entry: &Entry<MCL, MCC, MPL, N, S, PD>) -> bool {
        self.includes_triplet(entry.subspace_id(), entry.path(), entry.timestamp())
    }

    /// Returns whether an entry with the given subspace_id, path, and timestamp is included by this 3d range.
    pub fn includes_triplet(
        &self,
        subspace_id: &S,
        path: &Path<MCL, MCC, MPL>,
        timestamp: Timestamp,
    ) -> bool {
        self.subspaces.includes(subspace_id)
            && self.paths.includes(path)
            && self.times.includes(&timestamp)
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S> Range3d<MCL, MCC, MPL, S>
where
    S: Ord + Clone,
{
    /// Returns the intersection between this [`Range3d`] and another, or `None` if they are disjoint along any dimension.
    pub fn intersection(&self, other: &Range3d<MCL, MCC, MPL, S>) -> Option<Self> {
        let paths = self.paths.intersection(&other.paths)?;
        let times = self.times.intersection(&other.times)?;
        let subspaces = self.subspaces.intersection(&other.subspaces)?;
        Some(Self {
            paths,
            times,
            subspaces,
        })
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S: Default> Default
    for Range3d<MCL, MCC, MPL, S>
{
    /// The default 3dRange, assuming that `S::default()` yields the default SubspaceId.
    ///
    /// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#default_3d_range)
    fn default() -> Self {
        Self::new_full()
    }
}

/// Converts an [`Area`] into the [`Range3d`] that includes exactly the same entries.
impl<const MCL: usize, const MCC: usize, const MPL: usize, S: SubspaceId>
    From<&Area<MCL, MCC, MPL, S>> for Range3d<MCL, MCC, MPL, S>
{
    fn from(area: &Area<MCL, MCC, MPL, S>) -> Self {
        let subspaces = match area.subspace() {
            AreaSubspace::Any => Range::full(),
            AreaSubspace::Id(id) => id.singleton_range(),
        };

        let paths = Range {
            start: area.path().clone(),
            end: match area.path().greater_but_not_prefixed() {
                Some(successor) => RangeEnd::Closed(successor),
                None => RangeEnd::Open,
            },
        };

        Self::new(subspaces, paths, area.times().clone())
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S: SubspaceId>
    From<Area<MCL, MCC, MPL, S>> for Range3d<MCL, MCC, MPL, S>
{
    fn from(area: Area<MCL, MCC, MPL, S>) -> Self {
        Self::from(&area)
    }
}

/// Orders by subspace range first, then by path range, then by time range.
impl<const MCL: usize, const MCC: usize, const MPL: usize, S: Ord> Ord
    for Range3d<MCL, MCC, MPL, S>
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.subspaces
            .cmp(&other.subspaces)
            .then_with(|| self.paths.cmp(&other.paths))
            .then_with(|| self.times.cmp(&other.times))
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S: Ord> PartialOrd
    for Range3d<MCL, MCC, MPL, S>
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "dev")]
impl<'a, const MCL: usize, const MCC: usize, const MPL: usize, S> Arbitrary<'a>
    for Range3d<MCL, MCC, MPL, S>
where
    S: Ord + Arbitrary<'a>,
{
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self {
            subspaces: Arbitrary::arbitrary(u)?,
            paths: Arbitrary::arbitrary(u)?,
            times: Arbitrary::arbitrary(u)?,
        })
    }
}
