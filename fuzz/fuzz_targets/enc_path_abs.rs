#![no_main]

use libfuzzer_sys::fuzz_target;
use willow_data_model::Path;
use willow_fuzz::encode::{encoding_random, encoding_roundtrip};

const MCL: usize = 300;
const MCC: usize = 300;
const MPL: usize = 300;

fuzz_target!(|data: (Path<MCL, MCC, MPL>, &[u8])| {
    let (path, random_bytes) = data;

    encoding_roundtrip(&path);
    encoding_random::<Path<MCL, MCC, MPL>>(random_bytes);
});
