use arbitrary::{Arbitrary, Unstructured};

use willow_encoding::RelativeEncodable;

use crate::grouping::{Area, Range, Range3d};
use crate::Entry;

use super::assert_relative_round_trip;

const MCL: usize = 4;
const MCC: usize = 4;
const MPL: usize = 8;

type TestEntry = Entry<MCL, MCC, MPL, [u8; 1], u64, [u8; 2]>;
type TestArea = Area<MCL, MCC, MPL, u64>;
type TestRange3d = Range3d<MCL, MCC, MPL, u64>;

const SEEDS: u64 = 512;

/// Fills a buffer with bytes derived from `seed` by a splitmix64 sequence.
///
/// Every eighth byte is kept small so that the generated values often share components, subspaces and timestamps.
fn seeded_bytes(seed: u64) -> Vec<u8> {
    let mut state = seed;
    let mut bytes = Vec::with_capacity(512);

    while bytes.len() < 512 {
        state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;

        let mut chunk = z.to_be_bytes();
        chunk[0] %= 4;
        bytes.extend_from_slice(&chunk);
    }

    bytes
}

/// Runs `check` once per seed on a fresh [`Unstructured`], and asserts that nearly every seed produced values to check.
fn for_each_seed(mut check: impl FnMut(&mut Unstructured) -> arbitrary::Result<()>) {
    let mut exercised = 0;

    for seed in 0..SEEDS {
        let bytes = seeded_bytes(seed);
        let mut u = Unstructured::new(&bytes);

        if check(&mut u).is_ok() {
            exercised += 1;
        }
    }

    assert!(
        exercised >= SEEDS - SEEDS / 16,
        "only {exercised} of {SEEDS} seeds produced values"
    );
}

#[test]
fn generated_ranges_are_valid() {
    for_each_seed(|u| {
        let range = Range::<u64>::arbitrary(u)?;
        assert!(range.is_valid());

        let range = TestRange3d::arbitrary(u)?;
        assert!(range.is_valid());
        Ok(())
    });
}

#[test]
fn entries_relative_to_entries() {
    for_each_seed(|u| {
        let entry = TestEntry::arbitrary(u)?;
        let reference = TestEntry::arbitrary(u)?;

        assert_relative_round_trip(&entry, &reference);
        assert_relative_round_trip(&entry, &entry);
        Ok(())
    });
}

#[test]
fn entries_relative_to_areas() {
    for_each_seed(|u| {
        let entry = TestEntry::arbitrary(u)?;
        let area = TestArea::arbitrary(u)?;
        let reference = (*entry.namespace_id(), area.clone());

        if area.includes_entry(&entry) {
            assert_relative_round_trip(&entry, &reference);
        } else {
            assert!(entry.relative_encode_to_bytes(&reference).is_err());
        }

        let subspace_area = TestArea::new_subspace(*entry.subspace_id());
        assert_relative_round_trip(&entry, &(*entry.namespace_id(), subspace_area));
        Ok(())
    });
}

#[test]
fn entries_relative_to_3d_ranges() {
    for_each_seed(|u| {
        let entry = TestEntry::arbitrary(u)?;
        let range = TestRange3d::arbitrary(u)?;
        let reference = (*entry.namespace_id(), range.clone());

        if range.includes_entry(&entry) {
            assert_relative_round_trip(&entry, &reference);
        } else {
            assert!(entry.relative_encode_to_bytes(&reference).is_err());
        }

        assert_relative_round_trip(&entry, &(*entry.namespace_id(), TestRange3d::new_full()));
        Ok(())
    });
}

#[test]
fn areas_relative_to_areas() {
    for_each_seed(|u| {
        let outer = TestArea::arbitrary(u)?;
        let other = TestArea::arbitrary(u)?;

        if outer.includes_area(&other) {
            assert_relative_round_trip(&other, &outer);
        } else {
            assert!(other.relative_encode_to_bytes(&outer).is_err());
        }

        if let Some(inner) = outer.intersection(&other) {
            assert!(outer.includes_area(&inner));
            assert!(other.includes_area(&inner));

            assert_relative_round_trip(&inner, &outer);
            assert_relative_round_trip(&inner, &other);
        }

        Ok(())
    });
}

#[test]
fn ranges_relative_to_ranges() {
    for_each_seed(|u| {
        let range = TestRange3d::arbitrary(u)?;
        let reference = TestRange3d::arbitrary(u)?;

        assert_relative_round_trip(&range, &reference);
        assert_relative_round_trip(&range, &range);

        if let Some(intersection) = range.intersection(&reference) {
            assert!(intersection.is_valid());
            assert_relative_round_trip(&intersection, &reference);
        }

        Ok(())
    });
}
