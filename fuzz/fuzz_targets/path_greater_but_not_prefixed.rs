#![no_main]

use libfuzzer_sys::fuzz_target;
use willow_data_model::Path;
use willow_fuzz::path::test_greater_but_not_prefixed;

// MCL, MCC, MPL
fuzz_target!(|data: (Path<2, 3, 3>, Path<2, 3, 3>)| {
    let (baseline, candidate) = data;
    let unsucceedables = [
        Path::new_empty(),
        Path::from_slices(&[vec![255u8, 255]]).unwrap(),
        Path::from_slices(&[vec![255u8, 255], vec![255]]).unwrap(),
        Path::from_slices(&[vec![255u8, 255], vec![255], vec![]]).unwrap(),
    ];

    test_greater_but_not_prefixed(baseline, candidate, &unsucceedables);
});
