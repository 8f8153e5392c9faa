#![no_main]

use libfuzzer_sys::fuzz_target;
use willow_data_model::Path;
use willow_fuzz::path::test_successor;

// MCL, MCC, MPL
fuzz_target!(|data: (Path<3, 3, 3>, Path<3, 3, 3>)| {
    let (baseline, candidate) = data;
    let max_path = Path::from_slices(&[vec![255u8, 255, 255], vec![], vec![]]).unwrap();

    test_successor(baseline, candidate, max_path);
});
