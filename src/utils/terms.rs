use crate::filter::FilterState;
use rustc_hash::FxHashSet;

/// Field name fragments that mark a field as holding dates
pub const DEFAULT_DATE_HINTS: [&str; 4] = ["date", "year", "month", "day"];

/// Decides which fields hold dates, whose values make poor highlight terms.
///
/// A field matches if it is listed as reserved (exact match) or if its name
/// contains one of the hints, ignoring case.
#[derive(Debug, Clone)]
pub struct DateFieldMatcher {
    hints: Vec<String>,
    reserved: Vec<String>,
}

impl DateFieldMatcher {
    pub fn new<I, J, S, T>(hints: I, reserved: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            hints: hints
                .into_iter()
                .map(|h| h.as_ref().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
            reserved: reserved.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, field: &str) -> bool {
        if self.reserved.iter().any(|r| r == field) {
            return true;
        }
        let lower = field.to_lowercase();
        self.hints.iter().any(|hint| lower.contains(hint.as_str()))
    }
}

impl Default for DateFieldMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_HINTS, Vec::<String>::new())
    }
}

/// Values worth highlighting in search results.
///
/// Collects the trimmed values of every positive, non-blank entry on fields
/// that are not date fields, without duplicates, in first-seen order.
pub fn extract_search_terms<F>(state: &FilterState, is_date_field: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let mut seen = FxHashSet::default();
    let mut terms = Vec::new();

    for (field, entries) in state.iter() {
        if is_date_field(field) {
            continue;
        }
        for entry in entries {
            if entry.negated || entry.is_blank() {
                continue;
            }
            let value = entry.value.trim();
            if seen.insert(value) {
                terms.push(value.to_string());
            }
        }
    }

    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FieldEntry;

    #[test]
    fn test_default_matcher_hints() {
        let matcher = DateFieldMatcher::default();
        assert!(matcher.matches("publication_date"));
        assert!(matcher.matches("Year"));
        assert!(matcher.matches("birthday"));
        assert!(!matcher.matches("title"));
    }

    #[test]
    fn test_reserved_fields_are_exact() {
        let matcher = DateFieldMatcher::new(Vec::<String>::new(), ["published"]);
        assert!(matcher.matches("published"));
        assert!(!matcher.matches("Published"));
        assert!(!matcher.matches("date"));
    }

    #[test]
    fn test_extract_terms() {
        let state = FilterState::new()
            .with_field(
                "title",
                vec![
                    FieldEntry::new("rust"),
                    FieldEntry::new("go").negate(),
                    FieldEntry::blank(),
                    FieldEntry::new(" parsing "),
                ],
            )
            .with_field("year", vec![FieldEntry::new("2020")])
            .with_field("body", vec![FieldEntry::new("rust"), FieldEntry::new("async")]);

        let matcher = DateFieldMatcher::default();
        let terms = extract_search_terms(&state, |f| matcher.matches(f));
        assert_eq!(terms, vec!["rust", "parsing", "async"]);
    }

    #[test]
    fn test_extract_terms_empty_state() {
        let terms = extract_search_terms(&FilterState::new(), |_| false);
        assert!(terms.is_empty());
    }
}
