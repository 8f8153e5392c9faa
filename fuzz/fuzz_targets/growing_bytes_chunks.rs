#![no_main]

use libfuzzer_sys::fuzz_target;
use willow_fuzz::encode::streaming_matches_buffered;
use willow_fuzz::params::{FuzzEntry, FuzzPath};

fuzz_target!(|data: (&[u8], &[u8])| {
    let (bytes, chunk_sizes) = data;

    streaming_matches_buffered::<FuzzPath>(bytes, chunk_sizes);
    streaming_matches_buffered::<FuzzEntry>(bytes, chunk_sizes);
});
