//! Fuzz target: `RingBuffer` push/pop sequences
//!
//! Each input byte is one operation: odd bytes push `byte >> 1`, even bytes
//! pop.  Asserts the length bookkeeping never drifts from a counted model
//! and that the non-destructive iterator agrees with `len`.
//!
//! cargo fuzz run fuzz_ring_buffer

#![no_main]

use greenhouse::ring_buffer::RingBuffer;
use libfuzzer_sys::fuzz_target;

const CAP: usize = 10;

fuzz_target!(|data: &[u8]| {
    let mut rb: RingBuffer<u8, CAP> = RingBuffer::new();
    let mut len = 0usize;

    for &byte in data {
        if byte & 1 == 1 {
            rb.push(byte >> 1);
            len = (len + 1).min(CAP);
        } else {
            let popped = rb.pop();
            assert_eq!(popped.is_some(), len > 0, "pop disagrees with length");
            len = len.saturating_sub(1);
        }
        assert_eq!(rb.len(), len);
        assert_eq!(rb.iter().count(), len);
        assert_eq!(rb.is_full(), len == CAP);
    }
});
