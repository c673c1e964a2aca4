use crate::filter::{DateRange, FieldEntry, FilterState};
use std::borrow::Cow;

/// Serialize filter state into a boolean query string.
///
/// Each field becomes one sub-expression and the sub-expressions are ANDed in
/// field order. Within a field, positive entries chain with their own
/// operators and negated entries are ORed under a single `NOT`:
///
/// ```text
/// title:"a"                                one positive
/// (title:"a" OR title:"b")                 several positive
/// NOT (title:"c" OR title:"d")             several negated
/// (title:"a" AND NOT title:"c")            both
/// ```
///
/// A complete `date_range` is appended last as a range clause on
/// `date_field`; entries stored under `date_field` itself are skipped.
/// Backslashes and quotes inside a value are escaped with a backslash.
/// `encode` is applied to every quoted value, e.g.
/// [`percent_encode`](crate::utils::percent_encode) for URL transport.
/// Returns an empty string when nothing is set.
pub fn build_query<E>(
    state: &FilterState,
    date_range: Option<&DateRange>,
    date_field: &str,
    encode: E,
) -> String
where
    E: Fn(&str) -> String,
{
    let builder = QueryBuilder { date_field, encode };
    builder.build(state, date_range)
}

struct QueryBuilder<'a, E> {
    date_field: &'a str,
    encode: E,
}

impl<E> QueryBuilder<'_, E>
where
    E: Fn(&str) -> String,
{
    fn build(&self, state: &FilterState, date_range: Option<&DateRange>) -> String {
        let mut clauses: Vec<String> = state
            .iter()
            .filter(|(field, _)| *field != self.date_field)
            .filter_map(|(field, entries)| self.field_clause(field, entries))
            .collect();

        if let Some(range) = date_range.filter(|r| r.is_complete()) {
            clauses.push(self.date_clause(range));
        }

        clauses.join(" AND ")
    }

    fn field_clause(&self, field: &str, entries: &[FieldEntry]) -> Option<String> {
        let (negative, positive): (Vec<&FieldEntry>, Vec<&FieldEntry>) = entries
            .iter()
            .filter(|entry| !entry.is_blank())
            .partition(|entry| entry.negated);

        match (
            self.positive_group(field, &positive),
            self.negative_group(field, &negative),
        ) {
            (Some(pos), Some(neg)) => Some(format!("({} AND {})", pos, neg)),
            (Some(pos), None) => Some(pos),
            (None, Some(neg)) => Some(neg),
            (None, None) => None,
        }
    }

    /// Chain with each entry's own operator; the first entry's is ignored
    fn positive_group(&self, field: &str, entries: &[&FieldEntry]) -> Option<String> {
        let (first, rest) = entries.split_first()?;

        let mut expr = self.atom(field, &first.value);
        for entry in rest {
            expr.push(' ');
            expr.push_str(entry.operator.keyword());
            expr.push(' ');
            expr.push_str(&self.atom(field, &entry.value));
        }

        if rest.is_empty() {
            Some(expr)
        } else {
            Some(format!("({})", expr))
        }
    }

    fn negative_group(&self, field: &str, entries: &[&FieldEntry]) -> Option<String> {
        if entries.is_empty() {
            return None;
        }

        let atoms: Vec<String> = entries
            .iter()
            .map(|entry| self.atom(field, &entry.value))
            .collect();

        if atoms.len() > 1 {
            Some(format!("NOT ({})", atoms.join(" OR ")))
        } else {
            Some(format!("NOT {}", atoms[0]))
        }
    }

    fn atom(&self, field: &str, value: &str) -> String {
        let quoted = format!("\"{}\"", escape_value(value));
        format!("{}:{}", field, (self.encode)(&quoted))
    }

    fn date_clause(&self, range: &DateRange) -> String {
        format!(
            "{}:[{}T00:00:00Z TO {}T23:59:59Z]",
            self.date_field,
            range.min.trim(),
            range.max.trim()
        )
    }
}

fn escape_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '"']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        if c == '\\' || c == '"' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Operator;
    use crate::utils::{identity, percent_encode};

    fn build(state: &FilterState) -> String {
        build_query(state, None, "date", identity)
    }

    #[test]
    fn test_empty_state() {
        assert_eq!(build(&FilterState::new()), "");
        assert_eq!(build(&FilterState::with_placeholders(["a", "b"])), "");
    }

    #[test]
    fn test_single_atom() {
        let state = FilterState::new().with_field("title", vec![FieldEntry::new("rust")]);
        assert_eq!(build(&state), r#"title:"rust""#);
    }

    #[test]
    fn test_positive_chain_uses_entry_operators() {
        let state = FilterState::new().with_field(
            "title",
            vec![
                FieldEntry::new("a").with_operator(Operator::Or),
                FieldEntry::new("b").with_operator(Operator::Or),
                FieldEntry::new("c"),
            ],
        );
        assert_eq!(
            build(&state),
            r#"(title:"a" OR title:"b" AND title:"c")"#
        );
    }

    #[test]
    fn test_negation_grouping() {
        let state = FilterState::new().with_field(
            "f",
            vec![FieldEntry::new("a").negate(), FieldEntry::new("b").negate()],
        );
        assert_eq!(build(&state), r#"NOT (f:"a" OR f:"b")"#);
    }

    #[test]
    fn test_single_negation_is_not_parenthesized() {
        let state = FilterState::new().with_field("f", vec![FieldEntry::new("a").negate()]);
        assert_eq!(build(&state), r#"NOT f:"a""#);
    }

    #[test]
    fn test_mixed_polarity() {
        let state = FilterState::new().with_field(
            "f",
            vec![FieldEntry::new("x"), FieldEntry::new("y").negate()],
        );
        assert_eq!(build(&state), r#"(f:"x" AND NOT f:"y")"#);
    }

    #[test]
    fn test_negated_operators_are_ignored() {
        let state = FilterState::new().with_field(
            "f",
            vec![
                FieldEntry::new("a").negate(),
                FieldEntry::new("b").negate().with_operator(Operator::And),
            ],
        );
        assert_eq!(build(&state), r#"NOT (f:"a" OR f:"b")"#);
    }

    #[test]
    fn test_blank_entries_suppressed() {
        let state = FilterState::new()
            .with_field("a", vec![FieldEntry::blank(), FieldEntry::new("1")])
            .with_field("b", vec![FieldEntry::new("   ").negate()]);
        assert_eq!(build(&state), r#"a:"1""#);
    }

    #[test]
    fn test_fields_joined_in_insertion_order() {
        let state = FilterState::new()
            .with_field("z", vec![FieldEntry::new("1")])
            .with_field("a", vec![FieldEntry::new("2")]);
        assert_eq!(build(&state), r#"z:"1" AND a:"2""#);
    }

    #[test]
    fn test_date_clause_appended_last() {
        let state = FilterState::new().with_field("title", vec![FieldEntry::new("rust")]);
        let range = DateRange::new("2020-01-01", "2020-12-31");
        assert_eq!(
            build_query(&state, Some(&range), "date", identity),
            r#"title:"rust" AND date:[2020-01-01T00:00:00Z TO 2020-12-31T23:59:59Z]"#
        );
    }

    #[test]
    fn test_date_clause_alone() {
        let range = DateRange::new("2020-01-01", "2020-12-31");
        assert_eq!(
            build_query(&FilterState::new(), Some(&range), "published", identity),
            "published:[2020-01-01T00:00:00Z TO 2020-12-31T23:59:59Z]"
        );
    }

    #[test]
    fn test_incomplete_date_range_ignored() {
        let range = DateRange::new("2020-01-01", "");
        assert_eq!(build_query(&FilterState::new(), Some(&range), "date", identity), "");
    }

    #[test]
    fn test_reserved_date_field_entries_skipped() {
        let state = FilterState::new()
            .with_field("date", vec![FieldEntry::new("2020")])
            .with_field("title", vec![FieldEntry::new("rust")]);
        assert_eq!(build(&state), r#"title:"rust""#);
    }

    #[test]
    fn test_values_are_encoded() {
        let state = FilterState::new().with_field("title", vec![FieldEntry::new("war & peace")]);
        assert_eq!(
            build_query(&state, None, "date", percent_encode),
            "title:%22war%20%26%20peace%22"
        );
    }

    #[test]
    fn test_backslashes_and_quotes_are_escaped() {
        let state = FilterState::new()
            .with_field("path", vec![FieldEntry::new(r"C:\")])
            .with_field("title", vec![FieldEntry::new(r#"say "hi""#)]);
        assert_eq!(
            build(&state),
            r#"path:"C:\\" AND title:"say \"hi\"""#
        );
    }
}
