#![no_main]

use libfuzzer_sys::fuzz_target;
use willow_fuzz::encode::{encoding_random, encoding_roundtrip};
use willow_fuzz::params::FuzzEntry;

fuzz_target!(|data: (FuzzEntry, &[u8])| {
    let (entry, random_bytes) = data;

    encoding_roundtrip(&entry);
    encoding_random::<FuzzEntry>(random_bytes);
});
