//! Fuzzes the decimal parsers with arbitrary bytes: they must never
//! panic, and on success must agree with the standard library.

#![no_main]

use ballast::{parse_int_ascii, parse_long_ascii, parse_natural_long_ascii};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let ours = parse_long_ascii(data);
    if let Ok(value) = ours {
        let text = std::str::from_utf8(data).expect("accepted input must be ASCII digits");
        assert_eq!(value, text.parse::<i64>().unwrap());
    }

    let ours = parse_int_ascii(data);
    if let Ok(value) = ours {
        let text = std::str::from_utf8(data).expect("accepted input must be ASCII digits");
        assert_eq!(value, text.parse::<i32>().unwrap());
    }

    if let Ok(value) = parse_natural_long_ascii(data) {
        assert!(value >= 0);
    }
});
