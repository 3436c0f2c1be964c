//! Core data model types.
//!
//! Every loaded table becomes an in-memory [`DataSet`] of text cells. The fixed bibliographic
//! columns are described once by a [`Schema`]; spreadsheet sources whose leading header cells are
//! blank are named through a [`HeaderMapping`].

use serde::{Deserialize, Serialize};

/// Names of the bibliographic fields, in canonical order.
pub const LP: &str = "Lp.";
pub const JOURNAL_ID: &str = "Unikatowy Identyfikator Czasopisma";
pub const TITLE_1: &str = "Tytuł 1";
pub const ISSN: &str = "issn";
pub const E_ISSN: &str = "e-issn";
pub const TITLE_2: &str = "Tytuł 2";
pub const ISSN_2: &str = "issn 2";
pub const E_ISSN_2: &str = "e-issn 2";
pub const POINTS: &str = "Punkty";

const JOURNAL_FIELDS: [&str; 9] = [
    LP, JOURNAL_ID, TITLE_1, ISSN, E_ISSN, TITLE_2, ISSN_2, E_ISSN_2, POINTS,
];

/// A single named metadata field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Whether a loaded table is expected to carry this column.
    pub required: bool,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            required,
        }
    }
}

/// Ordered descriptor of the metadata columns that are always kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// The nine bibliographic fields of the journal registry, all required.
    pub fn journal_registry() -> Self {
        Self::new(JOURNAL_FIELDS.iter().map(|name| Field::new(*name, true)).collect())
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns `true` if `name` is one of the schema fields.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Schema field names that occur in `columns`, in schema order.
    pub fn present_in(&self, columns: &[String]) -> Vec<String> {
        self.field_names()
            .filter(|name| columns.iter().any(|c| c == name))
            .map(str::to_owned)
            .collect()
    }

    /// Required schema field names absent from `columns`.
    pub fn missing_from(&self, columns: &[String]) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.required && !columns.iter().any(|c| *c == f.name))
            .map(|f| f.name.clone())
            .collect()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::journal_registry()
    }
}

/// Positional names for blank spreadsheet header cells.
///
/// The published registry leaves the first nine header cells empty (their labels live in a second
/// header row that is discarded), so those columns are named by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMapping {
    /// Identifies the source layout this mapping belongs to.
    pub version: String,
    /// `(zero-based column position, column name)` pairs.
    pub entries: Vec<(usize, String)>,
}

impl HeaderMapping {
    /// Create a mapping from `(position, name)` pairs.
    pub fn new(version: impl Into<String>, entries: Vec<(usize, String)>) -> Self {
        Self {
            version: version.into(),
            entries,
        }
    }

    /// Layout of the ministry journal list: positions 0..=8 hold the metadata fields in order.
    pub fn journal_list_v1() -> Self {
        Self::new(
            "journal-list/v1",
            JOURNAL_FIELDS
                .iter()
                .enumerate()
                .map(|(idx, name)| (idx, (*name).to_owned()))
                .collect(),
        )
    }

    /// Name assigned to column `position`, if the mapping covers it.
    pub fn name_for(&self, position: usize) -> Option<&str> {
        self.entries
            .iter()
            .find(|(idx, _)| *idx == position)
            .map(|(_, name)| name.as_str())
    }
}

impl Default for HeaderMapping {
    fn default() -> Self {
        Self::journal_list_v1()
    }
}

/// In-memory tabular dataset of canonical text values.
///
/// Rows are stored as `Vec<Vec<String>>` in the same order as `columns`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataSet {
    /// Column names; unique within a dataset.
    pub columns: Vec<String>,
    /// Row-major value storage.
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    /// Create a dataset from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of `column` in row `row`, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.index_of(column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original columns and relative row order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[String]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Create a new dataset keeping only `columns`, in the given order.
    ///
    /// Names that are not present, and repeated names, are skipped.
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(columns.len());
        let mut idxs: Vec<usize> = Vec::with_capacity(columns.len());
        for name in columns.iter().map(AsRef::as_ref) {
            if names.iter().any(|n| n == name) {
                continue;
            }
            if let Some(idx) = self.index_of(name) {
                names.push(name.to_owned());
                idxs.push(idx);
            }
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                idxs.iter()
                    .map(|&i| row.get(i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Self {
            columns: names,
            rows,
        }
    }
}
