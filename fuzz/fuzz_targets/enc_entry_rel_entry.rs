#![no_main]

use libfuzzer_sys::fuzz_target;
use willow_fuzz::encode::{relative_encoding_random, relative_encoding_roundtrip};
use willow_fuzz::params::FuzzEntry;

fuzz_target!(|data: (FuzzEntry, FuzzEntry, &[u8])| {
    let (entry, reference, random_bytes) = data;

    relative_encoding_roundtrip(&entry, &reference);
    relative_encoding_random::<_, FuzzEntry>(&reference, random_bytes);
});
