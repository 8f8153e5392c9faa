#[cfg(feature = "dev")]
use arbitrary::Arbitrary;

use core::cmp;
use core::cmp::Ordering;

/// Determines whether a [`Range`] is _closed_ or _open_.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "dev", derive(Arbitrary))]
pub enum RangeEnd<T> {
    /// A [closed range](https://willowprotocol.org/specs/grouping-entries/index.html#closed_range) consists of a [start value](https://willowprotocol.org/specs/grouping-entries/index.html#start_value) and an [end_value](https://willowprotocol.org/specs/grouping-entries/index.html#end_value).
    Closed(T),
    /// An [open range](https://willowprotocol.org/specs/grouping-entries/index.html#open_range) consists only of a [start value](https://willowprotocol.org/specs/grouping-entries/index.html#start_value).
    Open,
}

impl<T> RangeEnd<T> {
    /// Returns whether this end is [`RangeEnd::Open`].
    pub fn is_open(&self) -> bool {
        matches!(self, RangeEnd::Open)
    }

    /// Returns the end value of a closed end.
    pub fn closed(&self) -> Option<&T> {
        match self {
            RangeEnd::Closed(value) => Some(value),
            RangeEnd::Open => None,
        }
    }
}

impl<T: Ord> RangeEnd<T> {
    /// Returns whether the [`RangeEnd`] is strictly greater than the given value. An open end is greater than every value.
    pub fn gt_val(&self, val: &T) -> bool {
        match self {
            RangeEnd::Open => true,
            RangeEnd::Closed(end_val) => end_val > val,
        }
    }
}

/// Open ends are greater than all closed ends.
impl<T: Ord> Ord for RangeEnd<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RangeEnd::Closed(end_value), RangeEnd::Closed(other_end_value)) => {
                end_value.cmp(other_end_value)
            }
            (RangeEnd::Closed(_), RangeEnd::Open) => Ordering::Less,
            (RangeEnd::Open, RangeEnd::Closed(_)) => Ordering::Greater,
            (RangeEnd::Open, RangeEnd::Open) => Ordering::Equal,
        }
    }
}

impl<T: Ord> PartialOrd for RangeEnd<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One-dimensional grouping over a type of value, the half-open interval `[start, end)`.
///
/// [Definition](https://willowprotocol.org/specs/grouping-entries/index.html#range)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range<T> {
    /// A range [includes](https://willowprotocol.org/specs/grouping-entries/index.html#range_include) all values greater than or equal to its [start value](https://willowprotocol.org/specs/grouping-entries/index.html#start_value) **and** less than its [end_value](https://willowprotocol.org/specs/grouping-entries/index.html#end_value)
    pub start: T,
    /// A range [includes](https://willowprotocol.org/specs/grouping-entries/index.html#range_include) all values strictly less than its end value (if it is not open) **and** greater than or equal to its [start value](https://willowprotocol.org/specs/grouping-entries/index.html#start_value).
    pub end: RangeEnd<T>,
}

impl<T> Range<T> {
    /// Construct a new [open range](https://willowprotocol.org/specs/grouping-entries/index.html#open_range) from a [start value](https://willowprotocol.org/specs/grouping-entries/index.html#start_value).
    pub fn new_open(start: T) -> Self {
        Self {
            start,
            end: RangeEnd::Open,
        }
    }

    /// Returns whether this range has an open end.
    pub fn is_open(&self) -> bool {
        self.end.is_open()
    }
}

impl<T: Ord> Range<T> {
    /// Construct a new [closed range](https://willowprotocol.org/specs/grouping-entries/index.html#closed_range) from a [start](https://willowprotocol.org/specs/grouping-entries/index.html#start_value) and [end_value](https://willowprotocol.org/specs/grouping-entries/index.html#end_value), or [`None`] if the resulting range would never [include](https://willowprotocol.org/specs/grouping-entries/index.html#range_include) any values.
    pub fn new_closed(start: T, end: T) -> Option<Self> {
        if start < end {
            return Some(Self {
                start,
                end: RangeEnd::Closed(end),
            });
        }

        None
    }

    /// Returns whether this range is open, or closed with a start strictly less than its end.
    ///
    /// The fields are public, so ranges that include nothing can be built by hand; [`Range::new_closed`] never creates them.
    pub fn is_valid(&self) -> bool {
        self.end.gt_val(&self.start)
    }

    /// Return whether a given value is [included](https://willowprotocol.org/specs/grouping-entries/index.html#range_include) by the [`Range`] or not.
    pub fn includes(&self, value: &T) -> bool {
        &self.start <= value && self.end.gt_val(value)
    }

    /// Returns `true` if `other` range is fully [included](https://willowprotocol.org/specs/grouping-entries/index.html#range_include) in this [`Range`].
    pub fn includes_range(&self, other: &Range<T>) -> bool {
        self.start <= other.start && self.end >= other.end
    }
}

impl<T: Ord + Clone> Range<T> {
    /// Create the [intersection](https://willowprotocol.org/specs/grouping-entries/index.html#range_intersection) between this [`Range`] and another `Range`, or `None` if they are disjoint.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = cmp::max(&self.start, &other.start);
        let end = cmp::min(&self.end, &other.end);

        match end {
            RangeEnd::Open => Some(Self::new_open(start.clone())),
            RangeEnd::Closed(end_value) => Self::new_closed(start.clone(), end_value.clone()),
        }
    }
}

impl<T: Default> Range<T> {
    /// Create a new range which [includes](https://willowprotocol.org/specs/grouping-entries/index.html#range_include) everything, provided that `T::default()` is the least value of `T`.
    pub fn full() -> Self {
        Self::new_open(T::default())
    }
}

impl<T: Default> Default for Range<T> {
    fn default() -> Self {
        Self::full()
    }
}

/// Orders by start value first, then by end value.
impl<T: Ord> Ord for Range<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl<T: Ord> PartialOrd for Range<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "dev")]
impl<'a, T> Arbitrary<'a> for Range<T>
where
    T: Arbitrary<'a> + Ord,
{
    /// Closed ends are ordered behind the start, and a closed end equal to the start yields an open range.
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let start: T = Arbitrary::arbitrary(u)?;
        let end: RangeEnd<T> = Arbitrary::arbitrary(u)?;

        Ok(match end {
            RangeEnd::Open => Self::new_open(start),
            RangeEnd::Closed(end_value) => match start.cmp(&end_value) {
                Ordering::Less => Self {
                    start,
                    end: RangeEnd::Closed(end_value),
                },
                Ordering::Greater => Self {
                    start: end_value,
                    end: RangeEnd::Closed(start),
                },
                Ordering::Equal => Self::new_open(start),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_end_ord() {
        assert!(RangeEnd::Closed(0) == RangeEnd::Closed(0));
        assert!(RangeEnd::Closed(1) < RangeEnd::Closed(2));
        assert!(RangeEnd::Closed(100) < RangeEnd::Open);
        assert!(RangeEnd::<usize>::Open == RangeEnd::Open);
    }

    #[test]
    fn range_new_closed() {
        assert!(Range::new_closed(0, 0).is_none());
        assert!(Range::new_closed(2, 1).is_none());
        assert!(Range::new_closed(5, 10).is_some());
    }

    #[test]
    fn validity() {
        assert!(Range::new_open(3).is_valid());
        assert!(Range::new_closed(3, 4).unwrap().is_valid());

        let empty = Range {
            start: 4,
            end: RangeEnd::Closed(4),
        };
        assert!(!empty.is_valid());
        assert!(!empty.includes(&4));
    }

    #[test]
    fn range_includes() {
        let open_range = Range::new_open(20);

        assert!(open_range.includes(&20));
        assert!(open_range.includes(&30));
        assert!(!open_range.includes(&10));

        let closed_range = Range::new_closed(5, 10).unwrap();

        assert!(closed_range.includes(&5));
        assert!(closed_range.includes(&8));
        assert!(!closed_range.includes(&10));
        assert!(!closed_range.includes(&1));
    }

    #[test]
    fn range_includes_range() {
        let open_range = Range::new_open(0);
        let open_range_2 = Range::new_open(2);

        assert!(open_range.includes_range(&open_range_2));
        assert!(!open_range_2.includes_range(&open_range));

        let closed_range = Range::new_closed(0, 10).unwrap();
        let closed_range_2 = Range::new_closed(5, 10).unwrap();
        let closed_range_3 = Range::new_closed(5, 15).unwrap();

        assert!(closed_range.includes_range(&closed_range_2));
        assert!(!closed_range_2.includes_range(&closed_range));
        assert!(!closed_range.includes_range(&closed_range_3));

        assert!(open_range.includes_range(&closed_range));
        assert!(!closed_range.includes_range(&open_range_2));
    }

    #[test]
    fn range_intersection() {
        let closed_1 = Range::new_closed(0, 10).unwrap();
        let closed_2 = Range::new_closed(5, 15).unwrap();

        assert_eq!(
            closed_1.intersection(&closed_2),
            Some(Range::new_closed(5, 10).unwrap())
        );
        assert_eq!(
            closed_2.intersection(&closed_1),
            Some(Range::new_closed(5, 10).unwrap())
        );

        let open_1 = Range::new_open(5);

        assert_eq!(
            open_1.intersection(&closed_1),
            Some(Range::new_closed(5, 10).unwrap())
        );

        let closed_3 = Range::new_closed(20, 30).unwrap();
        assert_eq!(closed_3.intersection(&closed_1), None);
        assert_eq!(closed_1.intersection(&closed_3), None);

        let open_2 = Range::new_open(50);
        assert_eq!(closed_3.intersection(&open_2), None);

        assert_eq!(open_1.intersection(&open_2), Some(Range::new_open(50)));

        // Touching ranges share no value.
        let touching = Range::new_closed(10, 12).unwrap();
        assert_eq!(closed_1.intersection(&touching), None);
    }

    #[test]
    fn full_and_ordering() {
        let full = Range::<u64>::full();
        assert_eq!(full, Range::new_open(0));
        assert!(full.includes(&u64::MAX));
        assert_eq!(Range::<u64>::default(), full);

        assert!(Range::new_closed(0, 5).unwrap() < Range::new_closed(0, 6).unwrap());
        assert!(Range::new_closed(0, 5).unwrap() < Range::new_open(0));
        assert!(Range::new_open(0) < Range::new_closed(1, 2).unwrap());
    }
}
