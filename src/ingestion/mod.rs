//! Loader: source tables into an in-memory [`crate::types::DataSet`].
//!
//! Most callers should use [`load`] (from [`unified`]) which:
//!
//! - detects the format by file extension (or you can force it via [`LoadOptions`])
//! - reads every cell as canonical text
//! - optionally reports success/failure/alerts to a [`crate::observability::PipelineObserver`]
//!
//! Format-specific functions are also available under [`csv`] and [`excel`].

pub mod csv;
pub mod excel;
mod headers;
pub mod unified;

pub use unified::{LoadOptions, SourceFormat, load};
