#![no_main]

use libfuzzer_sys::fuzz_target;

// Arbitrary input must be either rejected or decoded, but never panic or hang.
fuzz_target!(|data: &[u8]| {
    let _ = hufkit::decompress(data);
});
