#![no_main]

use libfuzzer_sys::fuzz_target;
use quic_wire::QuicTag;

fuzz_target!(|data: &[u8]| {
    // Any accepted message re-encodes to the bytes it was read from
    if let Ok((tag, consumed)) = QuicTag::decode(data) {
        if let Ok(bytes) = tag.to_bytes() {
            assert_eq!(bytes.len(), consumed);
            assert_eq!(&bytes[8..], &data[8..consumed]);
        }
    }
});
