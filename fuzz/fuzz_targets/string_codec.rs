//! Fuzzes the length-prefixed string decoders over raw buffer contents:
//! arbitrary prefixes and payloads must either decode or fail cleanly,
//! never panic or read out of bounds.

#![no_main]

use ballast::{BufferView, ByteOrder, DirectBuffer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let view = BufferView::wrap(data);
    for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
        let _ = view.get_string_ascii_order(0, order);
        let _ = view.get_string_utf8_order(0, order);
    }
    let mut sink = String::new();
    if let Ok(read) = view.get_string_ascii_into(0, &mut sink) {
        assert!(read <= data.len());
        assert!(read >= 4);
    }
    if !data.is_empty() {
        let _ = view.get_string_without_length_utf8(0, data.len());
        let _ = view.parse_long_ascii(0, data.len());
    }
});
