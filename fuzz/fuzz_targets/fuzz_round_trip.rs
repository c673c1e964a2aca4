#![no_main]

use arbitrary::Arbitrary;
use fieldq::filter::{FieldEntry, FilterState, Operator};
use libfuzzer_sys::fuzz_target;

const FIELDS: [&str; 3] = ["title", "author", "subject"];

#[derive(Debug, Arbitrary)]
struct Entry {
    field: u8,
    value: String,
    or: bool,
    negated: bool,
}

fuzz_target!(|entries: Vec<Entry>| {
    let mut state = FilterState::new();
    for entry in entries {
        let field = FIELDS[entry.field as usize % FIELDS.len()];
        let mut e = FieldEntry::new(entry.value);
        if entry.or {
            e = e.with_operator(Operator::Or);
        }
        if entry.negated {
            e = e.negate();
        }
        state.push(field, e);
    }

    let query = fieldq::query::build_query(&state, None, "date", fieldq::utils::percent_encode);
    let parsed = fieldq::query::parse_query(&query, &FIELDS);

    for field in FIELDS {
        let mut expected: Vec<_> = state
            .get(field)
            .unwrap_or_default()
            .iter()
            .filter(|e| !e.is_blank())
            .map(|e| (e.value.clone(), e.negated))
            .collect();
        let mut actual: Vec<_> = parsed
            .get(field)
            .unwrap_or_default()
            .iter()
            .filter(|e| !e.is_blank())
            .map(|e| (e.value.clone(), e.negated))
            .collect();
        expected.sort();
        actual.sort();
        assert_eq!(expected, actual, "query: {}", query);
    }
});
