//! Utilities for Willow's entry [groupings](https://willowprotocol.org/specs/grouping-entries/index.html#grouping_entries).
//!
//! A [`Range`] is a half-open interval over some totally ordered type, a [`Range3d`] combines one range per dimension of entry positions, and an [`Area`] selects entries by a path prefix, an optional subspace, and a time range.
mod area;
pub use area::*;
mod area_of_interest;
pub use area_of_interest::*;
mod range;
pub use range::*;
mod range_3d;
pub use range_3d::*;
