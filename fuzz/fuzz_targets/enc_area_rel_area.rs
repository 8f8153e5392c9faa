#![no_main]

use libfuzzer_sys::fuzz_target;
use willow_encoding::{RelativeEncodable, RelativeEncodeError};
use willow_fuzz::encode::{relative_encoding_random, relative_encoding_roundtrip};
use willow_fuzz::params::FuzzArea;

fuzz_target!(|data: (FuzzArea, FuzzArea, &[u8])| {
    let (inner, outer, random_bytes) = data;

    if outer.includes_area(&inner) {
        relative_encoding_roundtrip(&inner, &outer);
    } else {
        assert_eq!(
            inner.relative_encoded_length(&outer),
            Err(RelativeEncodeError::NotIncluded("area"))
        );
    }

    // The intersection is always included in both areas.
    if let Some(intersection) = inner.intersection(&outer) {
        relative_encoding_roundtrip(&intersection, &outer);
        relative_encoding_roundtrip(&intersection, &inner);
    }

    relative_encoding_random::<_, FuzzArea>(&outer, random_bytes);
});
