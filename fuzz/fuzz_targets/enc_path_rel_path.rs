#![no_main]

use libfuzzer_sys::fuzz_target;
use willow_data_model::Path;
use willow_fuzz::encode::{relative_encoding_random, relative_encoding_roundtrip};

const MCL: usize = 300;
const MCC: usize = 300;
const MPL: usize = 300;

fuzz_target!(|data: (Path<MCL, MCC, MPL>, Path<MCL, MCC, MPL>, &[u8])| {
    let (path, reference, random_bytes) = data;

    relative_encoding_roundtrip(&path, &reference);
    relative_encoding_random::<_, Path<MCL, MCC, MPL>>(&reference, random_bytes);
});
