pub mod builder;
pub mod parser;
pub mod term;
pub mod tokenizer;

pub use builder::build_query;
pub use parser::{ParseReport, SkipReason, SkippedClause, parse_query, parse_query_report};
pub use term::{Term, parse_term};
pub use tokenizer::{Scan, Token, scan, tokenize};
