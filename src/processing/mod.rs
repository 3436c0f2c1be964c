//! In-memory pipeline stages between loading and reporting.
//!
//! Currently implemented:
//!
//! - [`classify()`]: split columns into metadata and categorical columns
//! - [`select()`]: resolve 1-based operator indices into categorical column names
//! - [`filter()`]: keep rows marked in any selected column and project the columns
//!
//! ## Example: classify → select → filter
//!
//! ```rust
//! use journal_registry::processing::{classify, filter, select};
//! use journal_registry::types::{DataSet, Schema};
//!
//! let ds = DataSet::new(
//!     vec!["Lp.".into(), "Punkty".into(), "A".into(), "B".into()],
//!     vec![
//!         vec!["1".into(), "100".into(), "x".into(), "".into()],
//!         vec!["2".into(), "40".into(), "".into(), "X".into()],
//!         vec!["3".into(), "20".into(), "no".into(), "no".into()],
//!     ],
//! );
//!
//! let classes = classify(&ds.columns, &Schema::journal_registry());
//! assert_eq!(classes.categorical, vec!["A", "B"]);
//!
//! let selected = select(&[2], &classes.categorical).unwrap();
//! let filtered = filter(&ds, &classes.metadata, &selected);
//! assert_eq!(filtered.columns, vec!["Lp.", "Punkty", "B"]);
//! assert_eq!(filtered.row_count(), 1);
//! ```

pub mod classify;
pub mod filter;
pub mod select;

pub use classify::{ColumnClasses, classify};
pub use filter::{filter, is_marked, rows_marked_in};
pub use select::{enumerate, parse_indices, select};
