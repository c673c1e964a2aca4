use super::term::{Term, parse_term, strip_not};
use super::tokenizer::{self, Token, strip_enclosing_parens};
use crate::filter::{DateRange, FieldEntry, FilterState, Operator};
use crate::utils::decode_query;
use log::{debug, trace};
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Nesting depth up to which parenthesized groups are expanded into their
/// clauses. Deeper groups are handed to the term parser as-is.
pub const MAX_GROUP_DEPTH: usize = 8;

/// Why a clause was dropped while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Not of the form `field:value`
    MalformedToken,
    /// Field is not in the known-field set
    UnknownField,
    /// Value is empty once unquoted
    EmptyValue,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MalformedToken => write!(f, "malformed clause"),
            SkipReason::UnknownField => write!(f, "unknown field"),
            SkipReason::EmptyValue => write!(f, "empty value"),
        }
    }
}

/// A clause the parser could not use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedClause {
    pub token: String,
    pub reason: SkipReason,
}

/// Everything recovered from a raw query
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseReport {
    pub state: FilterState,
    /// Range clause on the reserved date field, if one was present
    pub date_range: Option<DateRange>,
    pub skipped: Vec<SkippedClause>,
    /// Parentheses or quotes were left open somewhere in the input
    pub unbalanced: bool,
}

/// Parse a raw (possibly percent-encoded) query back into filter state.
///
/// The result holds every field of `known_fields`, in that order. Fields
/// with no recognized clause get a single blank placeholder entry. Clauses
/// that are malformed or name an unknown field are dropped.
pub fn parse_query<S: AsRef<str>>(raw: &str, known_fields: &[S]) -> FilterState {
    parse_query_report(raw, known_fields, None).state
}

/// Like [`parse_query`], also reporting skipped clauses and recovering the
/// range clause on `date_field`
pub fn parse_query_report<S: AsRef<str>>(
    raw: &str,
    known_fields: &[S],
    date_field: Option<&str>,
) -> ParseReport {
    let mut parser = QueryParser::new(known_fields, date_field);
    parser.parse(raw)
}

/// Query parser
struct QueryParser<'a> {
    order: Vec<&'a str>,
    known: FxHashSet<&'a str>,
    date_field: Option<&'a str>,
    clauses: FxHashMap<&'a str, Vec<FieldEntry>>,
    date_range: Option<DateRange>,
    skipped: Vec<SkippedClause>,
    unbalanced: bool,
}

impl<'a> QueryParser<'a> {
    fn new<S: AsRef<str>>(known_fields: &'a [S], date_field: Option<&'a str>) -> Self {
        let order: Vec<&str> = known_fields.iter().map(AsRef::as_ref).collect();
        let known = order.iter().copied().collect();
        Self {
            order,
            known,
            date_field,
            clauses: FxHashMap::default(),
            date_range: None,
            skipped: Vec::new(),
            unbalanced: false,
        }
    }

    fn parse(&mut self, raw: &str) -> ParseReport {
        let decoded = decode_query(raw);
        let body = strip_enclosing_parens(&decoded).unwrap_or_else(|| decoded.trim());

        self.parse_group(body, None, false, 0);

        ParseReport {
            state: self.finish_state(),
            date_range: self.date_range.take(),
            skipped: std::mem::take(&mut self.skipped),
            unbalanced: self.unbalanced,
        }
    }

    /// Tokenize `expr` and parse each token. `lead` replaces the first
    /// token's operator so a group keeps the operator it was joined with.
    fn parse_group(&mut self, expr: &str, lead: Option<Operator>, negate: bool, depth: usize) {
        let scan = tokenizer::scan(expr);
        if !scan.is_balanced() {
            debug!(
                "unbalanced query (depth {}, open quote {}): {:?}",
                scan.depth, scan.in_quotes, expr
            );
            self.unbalanced = true;
        }

        for (i, token) in scan.tokens.into_iter().enumerate() {
            let operator = match lead {
                Some(op) if i == 0 => op,
                _ => token.operator,
            };
            self.parse_token(token, operator, negate, depth);
        }
    }

    fn parse_token(&mut self, token: Token<'_>, operator: Operator, negate: bool, depth: usize) {
        trace!("token {:?} ({})", token.text, operator);

        if depth < MAX_GROUP_DEPTH {
            let (negated, body) = match strip_not(token.text) {
                Some(rest) => (true, rest),
                None => (false, token.text),
            };
            if let Some(inner) = strip_enclosing_parens(body) {
                self.parse_group(inner, Some(operator), negate ^ negated, depth + 1);
                return;
            }
        }

        match parse_term(token.text) {
            Ok(term) => self.accept(token.text, term, operator, negate),
            Err(reason) => self.skip(token.text, reason),
        }
    }

    fn accept(&mut self, token: &str, term: Term<'_>, operator: Operator, negate: bool) {
        if self.date_field == Some(term.field) {
            if let Some(range) = parse_date_range(&term.value) {
                self.date_range = Some(range);
                return;
            }
        }

        let Some(&field) = self.known.get(term.field) else {
            self.skip(token, SkipReason::UnknownField);
            return;
        };

        let entries = self.clauses.entry(field).or_default();
        // The first entry of a chain carries no operator
        let operator = if entries.is_empty() {
            Operator::None
        } else {
            operator
        };
        entries.push(FieldEntry {
            value: term.value.into_owned(),
            operator,
            negated: term.negated ^ negate,
        });
    }

    fn skip(&mut self, token: &str, reason: SkipReason) {
        debug!("skipping {:?}: {}", token, reason);
        self.skipped.push(SkippedClause {
            token: token.to_string(),
            reason,
        });
    }

    fn finish_state(&mut self) -> FilterState {
        let mut state = FilterState::new();
        for &field in &self.order {
            if state.contains_field(field) {
                continue;
            }
            let entries = self
                .clauses
                .remove(field)
                .unwrap_or_else(|| vec![FieldEntry::blank()]);
            state.set(field, entries);
        }
        state
    }
}

fn date_range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\[\s*(\S+)\s+TO\s+([^\s\]]+)\s*\]$").expect("date range pattern is valid")
    })
}

/// `[2020-01-01T00:00:00Z TO 2020-12-31T23:59:59Z]` to its day bounds
fn parse_date_range(value: &str) -> Option<DateRange> {
    let caps = date_range_regex().captures(value.trim())?;
    let day = |s: &str| s.split('T').next().unwrap_or(s).to_string();
    let range = DateRange::new(day(&caps[1]), day(&caps[2]));
    range.is_complete().then_some(range)
}
