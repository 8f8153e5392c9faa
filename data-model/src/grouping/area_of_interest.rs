#[cfg(feature = "dev")]
use arbitrary::Arbitrary;

use crate::grouping::area::Area;

/// A grouping of [`Entry`](crate::Entry)s that are among the newest in some store.
///
/// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#aois).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "dev", derive(Arbitrary))]
pub struct AreaOfInterest<const MCL: usize, const MCC: usize, const MPL: usize, S> {
    /// To be included in this [`AreaOfInterest`], an [`Entry`](crate::Entry) must be included in the [`Area`].
    pub area: Area<MCL, MCC, MPL, S>,
    /// To be included in this AreaOfInterest, an Entry’s timestamp must be among the max_count greatest Timestamps, unless max_count is zero.
    pub max_count: u64,
    /// The total payload_lengths of all included Entries is at most max_size, unless max_size is zero.
    pub max_size: u64,
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S> AreaOfInterest<MCL, MCC, MPL, S> {
    /// Creates a new [`AreaOfInterest`].
    pub fn new(area: Area<MCL, MCC, MPL, S>, max_count: u64, max_size: u64) -> Self {
        Self {
            area,
            max_count,
            max_size,
        }
    }
}

impl<const MCL: usize, const MCC: usize, const MPL: usize, S> AreaOfInterest<MCL, MCC, MPL, S>
where
    S: PartialEq + Clone,
{
    /// Return the intersection of this [`AreaOfInterest`] with another, or `None` if their areas do not intersect.
    ///
    /// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#aoi_intersection).
    pub fn intersection(&self, other: &AreaOfInterest<MCL, MCC, MPL, S>) -> Option<Self> {
        let area = self.area.intersection(&other.area)?;

        Some(Self {
            area,
            max_count: min_limit(self.max_count, other.max_count),
            max_size: min_limit(self.max_size, other.max_size),
        })
    }
}

/// The tighter of two limits, where zero means unlimited.
fn min_limit(a: u64, b: u64) -> u64 {
    match (a, b) {
        (0, limit) | (limit, 0) => limit,
        (a, b) => a.min(b),
    }
}
