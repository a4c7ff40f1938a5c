#![no_main]

use std::sync::{Arc, LazyLock};

use janus::{Detector, SignatureDatabase};
use libfuzzer_sys::fuzz_target;

static DETECTOR: LazyLock<Detector> =
    LazyLock::new(|| Detector::new(Arc::new(SignatureDatabase::new())));

fuzz_target!(|data: &[u8]| {
    let _ = DETECTOR.detect_bytes(data, "fuzzed.bin");
});
