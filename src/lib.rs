//! # fieldq - Structured filters to boolean queries and back
//!
//! fieldq compiles per-field search filters (values combined with
//! AND/OR/NOT) into a single boolean query string for a search backend, and
//! parses such a query string back into editable filters.
//!
//! ## Architecture
//!
//! - [`filter`] - Filter state model and the pure edit reducer
//! - [`query`] - Query builder, tokenizer, term parser and query parser
//! - [`output`] - Terminal output for the CLI
//! - [`utils`] - Percent-encoding, term extraction, configuration
//!
//! ## Quick Start
//!
//! ```
//! use fieldq::filter::{DateRange, FieldEntry, FilterState};
//! use fieldq::query::{build_query, parse_query};
//! use fieldq::utils::identity;
//!
//! let state = FilterState::new()
//!     .with_field("title", vec![FieldEntry::new("rust"), FieldEntry::new("go").negate()]);
//! let range = DateRange::new("2020-01-01", "2020-12-31");
//!
//! let query = build_query(&state, Some(&range), "date", identity);
//! assert_eq!(
//!     query,
//!     r#"(title:"rust" AND NOT title:"go") AND date:[2020-01-01T00:00:00Z TO 2020-12-31T23:59:59Z]"#
//! );
//!
//! let parsed = parse_query(&query, &["title"]);
//! assert_eq!(parsed.get("title").unwrap().len(), 2);
//! ```
//!
//! ## Round trips
//!
//! Parsing a built query recovers the same `(field, value, negated)`
//! clauses per field, not necessarily the same text: operators and
//! parenthesization may come back normalized. The split on ` AND ` / ` OR `
//! is textual, so values containing those words in unquoted form and field
//! names containing `:` are not supported.

pub mod filter;
pub mod output;
pub mod query;
pub mod utils;
