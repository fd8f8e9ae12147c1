#![no_main]

use libfuzzer_sys::fuzz_target;

// Bounded-reads property (spec.md §8(2)): no read may ever access a byte
// outside the input slice, for any buffer contents or length, including
// truncated headers and bogus `incl_len`/`snaplen` combinations.
fuzz_target!(|data: &[u8]| {
    let _ = asterix_core::demux::pcap::demux(data);
});
