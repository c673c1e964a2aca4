//! Pure state transitions for filter editing.
//!
//! UIs dispatch a [`FilterEvent`] and replace their state with the result of
//! [`apply`]. Events that point at a missing field or entry are ignored so a
//! stale event from a re-rendered row can never corrupt the state.

use super::types::{FieldEntry, FilterState, Operator};
use log::debug;
use serde::{Deserialize, Serialize};

/// An edit made by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterEvent {
    /// Append a blank row chained with `operator`
    AddEntry { field: String, operator: Operator },
    /// Remove a row; the last row of a field becomes a blank placeholder
    RemoveEntry { field: String, index: usize },
    SetValue {
        field: String,
        index: usize,
        value: String,
    },
    SetOperator {
        field: String,
        index: usize,
        operator: Operator,
    },
    ToggleNegated { field: String, index: usize },
    /// Reset one field to a single blank row
    ClearField { field: String },
    /// Fresh state with one blank row per field
    Reset { fields: Vec<String> },
    /// Merge in a state, e.g. one produced by the query parser. Fields it
    /// carries are overwritten; the others are left alone.
    Replace { state: FilterState },
}

/// Apply `event` to `state`, returning the next state
pub fn apply(mut state: FilterState, event: FilterEvent) -> FilterState {
    match event {
        FilterEvent::AddEntry { field, operator } => match state.get_mut(&field) {
            Some(entries) => entries.push(FieldEntry::blank().with_operator(operator)),
            None => debug!("add_entry: unknown field {:?}", field),
        },
        FilterEvent::RemoveEntry { field, index } => {
            if let Some(entries) = entry_list(&mut state, &field, index) {
                entries.remove(index);
                if entries.is_empty() {
                    entries.push(FieldEntry::blank());
                }
            }
        }
        FilterEvent::SetValue {
            field,
            index,
            value,
        } => {
            if let Some(entries) = entry_list(&mut state, &field, index) {
                entries[index].value = value;
            }
        }
        FilterEvent::SetOperator {
            field,
            index,
            operator,
        } => {
            if let Some(entries) = entry_list(&mut state, &field, index) {
                entries[index].operator = operator;
            }
        }
        FilterEvent::ToggleNegated { field, index } => {
            if let Some(entries) = entry_list(&mut state, &field, index) {
                entries[index].negated = !entries[index].negated;
            }
        }
        FilterEvent::ClearField { field } => match state.get_mut(&field) {
            Some(entries) => *entries = vec![FieldEntry::blank()],
            None => debug!("clear_field: unknown field {:?}", field),
        },
        FilterEvent::Reset { fields } => {
            state = FilterState::with_placeholders(fields);
        }
        FilterEvent::Replace { state: next } => state.merge(next),
    }

    state
}

/// Entry list for `field` if `index` is in range
fn entry_list<'s>(
    state: &'s mut FilterState,
    field: &str,
    index: usize,
) -> Option<&'s mut Vec<FieldEntry>> {
    match state.get_mut(field) {
        Some(entries) if index < entries.len() => Some(entries),
        Some(entries) => {
            debug!(
                "ignoring event for {:?}[{}]: field has {} entries",
                field,
                index,
                entries.len()
            );
            None
        }
        None => {
            debug!("ignoring event for unknown field {:?}", field);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_state() -> FilterState {
        FilterState::with_placeholders(["title", "author"])
    }

    #[test]
    fn test_add_and_set_value() {
        let state = apply(
            title_state(),
            FilterEvent::SetValue {
                field: "title".into(),
                index: 0,
                value: "rust".into(),
            },
        );
        let state = apply(
            state,
            FilterEvent::AddEntry {
                field: "title".into(),
                operator: Operator::Or,
            },
        );

        let entries = state.get("title").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, "rust");
        assert_eq!(entries[1].operator, Operator::Or);
        assert!(entries[1].is_blank());
    }

    #[test]
    fn test_remove_last_entry_leaves_placeholder() {
        let state = apply(
            title_state(),
            FilterEvent::RemoveEntry {
                field: "title".into(),
                index: 0,
            },
        );
        assert_eq!(state.get("title"), Some(&[FieldEntry::blank()][..]));
    }

    #[test]
    fn test_remove_middle_entry() {
        let state = FilterState::new().with_field(
            "title",
            vec![FieldEntry::new("a"), FieldEntry::new("b"), FieldEntry::new("c")],
        );
        let state = apply(
            state,
            FilterEvent::RemoveEntry {
                field: "title".into(),
                index: 1,
            },
        );
        let values: Vec<_> = state
            .get("title")
            .unwrap()
            .iter()
            .map(|e| e.value.as_str())
            .collect();
        assert_eq!(values, vec!["a", "c"]);
    }

    #[test]
    fn test_toggle_negated_twice() {
        let event = FilterEvent::ToggleNegated {
            field: "author".into(),
            index: 0,
        };
        let state = apply(title_state(), event.clone());
        assert!(state.get("author").unwrap()[0].negated);
        let state = apply(state, event);
        assert!(!state.get("author").unwrap()[0].negated);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let before = title_state();
        let after = apply(
            before.clone(),
            FilterEvent::SetOperator {
                field: "title".into(),
                index: 5,
                operator: Operator::Or,
            },
        );
        assert_eq!(before, after);

        let after = apply(
            before.clone(),
            FilterEvent::AddEntry {
                field: "missing".into(),
                operator: Operator::And,
            },
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_clear_and_reset() {
        let state = FilterState::new().with_field(
            "title",
            vec![FieldEntry::new("a"), FieldEntry::new("b").negate()],
        );
        let cleared = apply(
            state,
            FilterEvent::ClearField {
                field: "title".into(),
            },
        );
        assert!(cleared.is_blank());
        assert_eq!(cleared.get("title").unwrap().len(), 1);

        let reset = apply(
            cleared,
            FilterEvent::Reset {
                fields: vec!["x".into(), "y".into()],
            },
        );
        assert_eq!(reset.field_names().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_event_json_tagging() {
        let event: FilterEvent =
            serde_json::from_str(r#"{"type":"toggle_negated","field":"title","index":0}"#)
                .unwrap();
        assert_eq!(
            event,
            FilterEvent::ToggleNegated {
                field: "title".into(),
                index: 0
            }
        );
    }

    #[test]
    fn test_replace_keeps_fields_missing_from_parsed_state() {
        let state = FilterState::new()
            .with_field("title", vec![FieldEntry::new("old")])
            .with_field("author", vec![FieldEntry::new("klabnik")])
            .with_field("subject", vec![FieldEntry::blank()]);
        let parsed = FilterState::new().with_field("title", vec![FieldEntry::new("rust")]);

        let state = apply(state, FilterEvent::Replace { state: parsed });

        assert_eq!(
            state.field_names().collect::<Vec<_>>(),
            vec!["title", "author", "subject"]
        );
        assert_eq!(state.get("title").unwrap()[0].value, "rust");
        assert_eq!(state.get("author").unwrap()[0].value, "klabnik");
        assert!(state.get("subject").unwrap()[0].is_blank());
    }
}
