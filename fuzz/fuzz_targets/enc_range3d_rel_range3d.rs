#![no_main]

use libfuzzer_sys::fuzz_target;
use willow_fuzz::encode::{relative_encoding_random, relative_encoding_roundtrip};
use willow_fuzz::params::FuzzRange3d;

fuzz_target!(|data: (FuzzRange3d, FuzzRange3d, &[u8])| {
    let (range, reference, random_bytes) = data;

    relative_encoding_roundtrip(&range, &reference);
    relative_encoding_random::<_, FuzzRange3d>(&reference, random_bytes);
});
