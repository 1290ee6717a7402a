#![no_main]
use cgbi_normalizer::{parse, serialize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(image) = parse(data) {
        assert_eq!(serialize(&image), data);
    }
});
