//! `journal-registry` turns the published journal list into a category-filtered snapshot and a
//! multi-sheet Excel report.
//!
//! A run is a straight line of stages:
//!
//! 1. [`ingestion::load`] reads a CSV or spreadsheet source into a [`types::DataSet`] of text
//!    cells.
//! 2. [`processing::classify`] splits the columns into the fixed bibliographic metadata (see
//!    [`types::Schema::journal_registry`]) and the categorical columns.
//! 3. [`processing::select`] resolves 1-based column numbers into category names.
//! 4. [`processing::filter`] keeps rows marked `x` in any selected category.
//! 5. [`report::write_report`] writes the snapshot and the workbook.
//!
//! [`pipeline::Pipeline`] runs all of them and reports each stage to a
//! [`observability::PipelineObserver`]. [`viewer`] reads a snapshot back for display.
//!
//! ## Quick example
//!
//! ```no_run
//! use journal_registry::pipeline::{Pipeline, PipelineOptions};
//!
//! # fn main() -> Result<(), journal_registry::RegistryError> {
//! let pipeline = Pipeline::new(PipelineOptions::default());
//! let summary = pipeline.run("registry.xlsx", &[1, 3])?;
//! for sheet in &summary.sheets {
//!     println!("{}: {} rows", sheet.name, sheet.rows);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Filtering an in-memory dataset
//!
//! ```rust
//! use journal_registry::processing::{classify, filter};
//! use journal_registry::types::{DataSet, Schema};
//!
//! let ds = DataSet::new(
//!     vec!["Lp.".to_string(), "Fizyka".to_string(), "Prawo".to_string()],
//!     vec![
//!         vec!["1".to_string(), "x".to_string(), "".to_string()],
//!         vec!["2".to_string(), "".to_string(), "X".to_string()],
//!     ],
//! );
//! let classes = classify(&ds.columns, &Schema::journal_registry());
//! let out = filter(&ds, &classes.metadata, &["Prawo".to_string()]);
//! assert_eq!(out.columns, vec!["Lp.", "Prawo"]);
//! assert_eq!(out.row_count(), 1);
//! ```

pub mod download;
pub mod error;
pub mod ingestion;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod types;
pub mod viewer;

pub use error::{RegistryError, RegistryResult};
