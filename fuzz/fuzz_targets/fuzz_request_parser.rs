//! Fuzz target: `Request::parse`
//!
//! Feeds arbitrary text through both parse modes and checks that the
//! parser never panics and never exceeds its fixed capacities.
//!
//! cargo fuzz run fuzz_request_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use ptpbridge::ParseMode;
use ptpbridge::rpc::request::{MAX_PARAMS, MAX_STRING_LEN, Request};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    let lenient = Request::parse(text, ParseMode::Lenient);
    if let Ok(req) = &lenient {
        assert!(req.params().len() <= MAX_PARAMS);
        assert!(req.string().map_or(0, str::len) <= MAX_STRING_LEN);
        assert!(!req.operation().contains(';'));
    }

    // Anything strict accepts, lenient accepts identically.
    if let Ok(req) = Request::parse(text, ParseMode::Strict) {
        assert_eq!(lenient.as_ref().ok(), Some(&req));
    }
});
