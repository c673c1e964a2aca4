#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Arbitrary, possibly half-typed queries must never panic
    let _ = fieldq::query::tokenize(data);
    let _ = fieldq::query::parse_query_report(data, &["title", "author"], Some("date"));
});
