#![no_main]

use libfuzzer_sys::fuzz_target;

// The XML loader is the one path whose failures propagate to the caller
// (spec.md §4.3, §7 `InvalidXml`) — it must never panic on arbitrary
// bytes, only return `Err`.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut lib = asterix_core::model::DescriptionLibrary::new();
    let _ = lib.load_category_str(text, "fuzz");
});
