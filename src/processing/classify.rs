//! Column classification.

use crate::types::Schema;

/// Columns of a loaded dataset, split into fixed metadata and categorical columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnClasses {
    /// Schema fields present in the dataset, in schema order.
    pub metadata: Vec<String>,
    /// Every other column, in dataset order.
    pub categorical: Vec<String>,
}

/// Partition `columns` into metadata (as described by `schema`) and categorical columns.
///
/// An empty categorical list is valid; the selection step then has nothing to offer.
pub fn classify(columns: &[String], schema: &Schema) -> ColumnClasses {
    ColumnClasses {
        metadata: schema.present_in(columns),
        categorical: columns
            .iter()
            .filter(|c| !schema.contains(c))
            .cloned()
            .collect(),
    }
}
