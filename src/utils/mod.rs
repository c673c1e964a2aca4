//! Utility functions shared by the query compiler and the CLI.
//!
//! ## Modules
//!
//! - [`app_data`] - Configuration file in the app data directory
//! - [`encoding`] - Percent-encoding for URL transport
//! - [`terms`] - Highlight term extraction from filter state
//!
//! ```
//! use fieldq::filter::{FieldEntry, FilterState};
//! use fieldq::utils::{extract_search_terms, DateFieldMatcher};
//!
//! let state = FilterState::new()
//!     .with_field("title", vec![FieldEntry::new("rust")])
//!     .with_field("year", vec![FieldEntry::new("2020")]);
//! let matcher = DateFieldMatcher::default();
//! assert_eq!(extract_search_terms(&state, |f| matcher.matches(f)), vec!["rust"]);
//! ```

pub mod app_data;
pub mod encoding;
pub mod terms;

pub use app_data::*;
pub use encoding::*;
pub use terms::*;
