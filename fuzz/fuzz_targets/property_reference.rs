#![no_main]

use libfuzzer_sys::fuzz_target;
use dsgen::serializer::PropertyReferenceSerializer;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(expression) = PropertyReferenceSerializer::deserialize(text) {
            let _ = PropertyReferenceSerializer::serialize(&expression);
        }
    }
});
