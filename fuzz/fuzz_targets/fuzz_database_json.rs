#![no_main]

use janus::SignatureDatabase;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = std::str::from_utf8(data) {
        let _ = SignatureDatabase::from_json(json);
    }
});
