#![no_main]

use libfuzzer_sys::fuzz_target;
use quic_wire::{decode_frames, Frame};

fuzz_target!(|data: &[u8]| {
    // Single frame and full payload decoding must never panic
    if let Ok((frame, consumed)) = Frame::from_bytes(data) {
        assert!(consumed <= data.len());
        assert_eq!(frame.to_bytes().len(), frame.encoded_len());
    }
    let _ = decode_frames(data);
});
