#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let compressed = hufkit::compress(data).unwrap();
    let decompressed = hufkit::decompress(&compressed).unwrap();

    assert_eq!(decompressed, data);
});
