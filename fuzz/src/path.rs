/*
* Utilities for testing the correctness of path successor and path prefix successors via fuzz testing.
*/

use willow_data_model::Path;

pub fn test_successor<const MCL: usize, const MCC: usize, const MPL: usize>(
    // A path whose successor was computed.
    baseline: Path<MCL, MCC, MPL>,
    // Some other path that must not lie strictly between the baseline and its successor.
    candidate: Path<MCL, MCC, MPL>,
    // The greatest path for the given choice of MCL, MCC, MPL.
    max_path: Path<MCL, MCC, MPL>,
) {
    match baseline.successor() {
        None => {
            assert_eq!(
                baseline, max_path,
                "returned None for a path that is not the greatest path"
            );
        }
        Some(successor) => {
            assert!(
                successor > baseline,
                "successor {successor:?} is not greater than {baseline:?}"
            );

            assert!(
                !(candidate < successor && candidate > baseline),
                "{candidate:?} lies between {baseline:?} and its successor {successor:?}"
            );
        }
    }
}

pub fn test_greater_but_not_prefixed<const MCL: usize, const MCC: usize, const MPL: usize>(
    baseline: Path<MCL, MCC, MPL>,
    candidate: Path<MCL, MCC, MPL>,
    // The paths that every greater path is prefixed by.
    unsucceedable: &[Path<MCL, MCC, MPL>],
) {
    match baseline.greater_but_not_prefixed() {
        None => {
            assert!(
                unsucceedable.contains(&baseline),
                "returned None for {baseline:?}, which has greater paths it does not prefix"
            );
        }
        Some(greater) => {
            assert!(
                greater > baseline,
                "{greater:?} is not greater than {baseline:?}"
            );

            assert!(
                !greater.is_prefixed_by(&baseline),
                "{greater:?} is prefixed by {baseline:?}"
            );

            assert!(
                baseline.is_prefix_of(&candidate) || !(candidate < greater && candidate > baseline),
                "{candidate:?} lies between {baseline:?} and {greater:?} without being prefixed by it"
            );
        }
    }
}
