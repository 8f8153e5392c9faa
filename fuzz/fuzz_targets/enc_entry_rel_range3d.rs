#![no_main]

use libfuzzer_sys::fuzz_target;
use willow_encoding::{RelativeEncodable, RelativeEncodeError};
use willow_fuzz::encode::{relative_encoding_random, relative_encoding_roundtrip};
use willow_fuzz::params::{FuzzEntry, FuzzRange3d};

fuzz_target!(|data: (FuzzEntry, FuzzRange3d, &[u8])| {
    let (entry, range, random_bytes) = data;
    let reference = (*entry.namespace_id(), range);

    if reference.1.includes_entry(&entry) {
        relative_encoding_roundtrip(&entry, &reference);
    } else {
        assert_eq!(
            entry.relative_encoded_length(&reference),
            Err(RelativeEncodeError::NotIncluded("3d range"))
        );
    }

    relative_encoding_random::<_, FuzzEntry>(&reference, random_bytes);
});
