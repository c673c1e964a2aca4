//! Structured filter model and its pure edit reducer.

pub mod reducer;
pub mod types;

pub use reducer::{FilterEvent, apply};
pub use types::{DateRange, FieldEntry, FilterState, Operator};
