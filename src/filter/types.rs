use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Boolean operator joining a clause to the one before it in a field's chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// Start of a chain, or not chosen yet
    #[default]
    None,
    And,
    Or,
}

impl Operator {
    /// Keyword used when joining atoms. An unset operator joins with `AND`.
    pub fn keyword(self) -> &'static str {
        match self {
            Operator::None | Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::None => write!(f, "NONE"),
            Operator::And => write!(f, "AND"),
            Operator::Or => write!(f, "OR"),
        }
    }
}

/// A single filter clause on one field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldEntry {
    pub value: String,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default)]
    pub negated: bool,
}

impl FieldEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            operator: Operator::None,
            negated: false,
        }
    }

    /// Empty editable row
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }

    /// Blank entries are inert: never serialized, never highlighted.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Structured per-field filters, in field insertion order.
///
/// Serializes as a plain JSON object (`{"title": [{"value": ...}], ...}`)
/// whose key order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    fields: IndexMap<String, Vec<FieldEntry>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// One blank placeholder row per field
    pub fn with_placeholders<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = Self::new();
        for field in fields {
            state.set(field, vec![FieldEntry::blank()]);
        }
        state
    }

    /// Builder-style insert, mostly useful for tests and fixtures
    pub fn with_field(mut self, field: impl Into<String>, entries: Vec<FieldEntry>) -> Self {
        self.set(field, entries);
        self
    }

    /// Replace a field's entries. A new field is appended at the end.
    pub fn set(&mut self, field: impl Into<String>, entries: Vec<FieldEntry>) {
        self.fields.insert(field.into(), entries);
    }

    /// Take every field of `other`, overwriting fields already present.
    /// Fields only in `self` keep their entries and position.
    pub fn merge(&mut self, other: FilterState) {
        for (field, entries) in other.fields {
            self.set(field, entries);
        }
    }

    /// Append an entry to a field, creating the field if needed
    pub fn push(&mut self, field: impl Into<String>, entry: FieldEntry) {
        self.fields.entry(field.into()).or_default().push(entry);
    }

    pub fn get(&self, field: &str) -> Option<&[FieldEntry]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Vec<FieldEntry>> {
        self.fields.get_mut(field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldEntry])> {
        self.fields
            .iter()
            .map(|(field, entries)| (field.as_str(), entries.as_slice()))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when no field holds a non-blank entry
    pub fn is_blank(&self) -> bool {
        self.fields
            .values()
            .all(|entries| entries.iter().all(FieldEntry::is_blank))
    }
}

/// Inclusive day range bound to the reserved date field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub min: String,
    pub max: String,
}

impl DateRange {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Both bounds must be set for the range to be emitted
    pub fn is_complete(&self) -> bool {
        !self.min.trim().is_empty() && !self.max.trim().is_empty()
    }
}
