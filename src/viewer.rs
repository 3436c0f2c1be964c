//! Read-only view over a snapshot.
//!
//! A [`ViewModel`] holds everything the display depends on: the visible columns, the points range
//! and the category filter. It is never mutated; each `with_*` call returns a new model, and
//! [`ViewModel::render`] recomputes the [`View`] from the snapshot from scratch.

use std::cmp::Ordering;
use std::path::Path;

use serde::Serialize;

use crate::error::RegistryResult;
use crate::processing::{classify, is_marked};
use crate::report::read_snapshot;
use crate::types::{DataSet, ISSN, POINTS, Schema, TITLE_1};

/// Inclusive points range used for a bound the caller leaves open.
pub const DEFAULT_POINTS_RANGE: (f64, f64) = (0.0, 200.0);

/// Load the dataset stored in the snapshot at `path`.
pub fn load_snapshot(path: impl AsRef<Path>) -> RegistryResult<DataSet> {
    read_snapshot(path)
}

/// Numeric reading of a points cell.
///
/// Accepts a comma as decimal separator. Blank, `nan` and unparsable values are `None`.
pub fn points(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|p| !p.is_nan())
}

/// Which rows to show with respect to categories.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No category restriction.
    #[default]
    All,
    /// Only rows marked in this category.
    Only(String),
}

/// Immutable display state.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    /// Columns to display; rendered in dataset order.
    pub visible_columns: Vec<String>,
    /// Inclusive `(min, max)` points range; `None` until one is set.
    pub points_range: Option<(f64, f64)>,
    pub category: CategoryFilter,
}

impl ViewModel {
    /// Initial state for `dataset`: title, points, ISSN and every category visible, no points
    /// range, no category restriction.
    pub fn initial(dataset: &DataSet, schema: &Schema) -> Self {
        let classes = classify(&dataset.columns, schema);
        let visible_columns = dataset
            .columns
            .iter()
            .filter(|c| [TITLE_1, POINTS, ISSN].contains(&c.as_str()) || classes.categorical.contains(c))
            .cloned()
            .collect();
        Self {
            visible_columns,
            points_range: None,
            category: CategoryFilter::All,
        }
    }

    #[must_use]
    pub fn with_visible_columns(&self, columns: Vec<String>) -> Self {
        Self {
            visible_columns: columns,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_points_range(&self, min: f64, max: f64) -> Self {
        Self {
            points_range: Some((min, max)),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_category(&self, category: CategoryFilter) -> Self {
        Self {
            category,
            ..self.clone()
        }
    }

    /// Compute what to display.
    ///
    /// An unfiltered model shows every row in snapshot order. Once a range or category is set,
    /// rows outside the range (including those with missing points) or without a mark in the
    /// category are dropped, and the rest are sorted by points, highest first. Ties keep snapshot
    /// order and rows with missing points go last.
    pub fn render(&self, dataset: &DataSet) -> View {
        let filtered = self.points_range.is_some() || self.category != CategoryFilter::All;
        let points_idx = dataset.index_of(POINTS);
        let category_idx = match &self.category {
            CategoryFilter::All => None,
            CategoryFilter::Only(name) => Some(dataset.index_of(name)),
        };

        let mut kept: Vec<(Option<f64>, &Vec<String>)> = dataset
            .rows
            .iter()
            .filter_map(|row| {
                let p = points_idx.and_then(|i| row.get(i)).and_then(|v| points(v));
                if let Some((min, max)) = self.points_range {
                    let v = p?;
                    if v < min || v > max {
                        return None;
                    }
                }
                match category_idx {
                    None => {}
                    Some(Some(i)) if row.get(i).is_some_and(|v| is_marked(v)) => {}
                    Some(_) => return None,
                }
                Some((p, row))
            })
            .collect();
        if filtered {
            kept.sort_by(|a, b| match (a.0, b.0) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }

        let col_idxs: Vec<usize> = dataset
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| self.visible_columns.contains(c))
            .map(|(i, _)| i)
            .collect();

        View {
            columns: col_idxs.iter().map(|&i| dataset.columns[i].clone()).collect(),
            rows: kept
                .into_iter()
                .map(|(_, row)| {
                    col_idxs
                        .iter()
                        .map(|&i| row.get(i).cloned().unwrap_or_default())
                        .collect()
                })
                .collect(),
        }
    }
}

/// Rendered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl View {
    /// Rows as JSON objects keyed by column name, in column order.
    pub fn to_json(&self) -> serde_json::Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let obj: serde_json::Map<String, serde_json::Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned().map(serde_json::Value::String))
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> DataSet {
        let columns = ["Lp.", "Tytuł 1", "issn", "Punkty", "Fizyka", "Prawo"];
        let rows = [
            ["1", "Alpha", "1111", "40", "x", ""],
            ["2", "Beta", "2222", "200", "", "x"],
            ["3", "Gamma", "3333", "nan", "x", ""],
            ["4", "Delta", "4444", "140", "X", "x"],
            ["5", "Eps", "5555", "40", "x", ""],
        ];
        DataSet::new(
            columns.iter().map(|s| (*s).to_owned()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| (*s).to_owned()).collect())
                .collect(),
        )
    }

    fn lp_column(view: &View) -> Vec<String> {
        let idx = view.columns.iter().position(|c| c == "Lp.").unwrap();
        view.rows.iter().map(|r| r[idx].clone()).collect()
    }

    #[test]
    fn points_parsing() {
        assert_eq!(points(" 140 "), Some(140.0));
        assert_eq!(points("2,5"), Some(2.5));
        assert_eq!(points(""), None);
        assert_eq!(points("nan"), None);
        assert_eq!(points("n/a"), None);
    }

    #[test]
    fn initial_model_shows_title_points_issn_and_categories() {
        let ds = snapshot();
        let model = ViewModel::initial(&ds, &Schema::journal_registry());
        assert_eq!(
            model.visible_columns,
            vec!["Tytuł 1", "issn", "Punkty", "Fizyka", "Prawo"]
        );
        assert_eq!(model.points_range, None);
        assert_eq!(model.category, CategoryFilter::All);
    }

    #[test]
    fn unfiltered_render_keeps_every_row_in_snapshot_order() {
        let ds = snapshot();
        let model = ViewModel::initial(&ds, &Schema::journal_registry())
            .with_visible_columns(vec!["Lp.".into(), "Punkty".into()]);
        let view = model.render(&ds);
        assert_eq!(view.columns, vec!["Lp.", "Punkty"]);
        assert_eq!(lp_column(&view), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn range_sorts_by_points_and_drops_missing_points() {
        let ds = snapshot();
        let model = ViewModel::initial(&ds, &Schema::journal_registry())
            .with_visible_columns(vec!["Lp.".into()])
            .with_points_range(DEFAULT_POINTS_RANGE.0, DEFAULT_POINTS_RANGE.1);
        assert_eq!(lp_column(&model.render(&ds)), vec!["2", "4", "1", "5"]);
    }

    #[test]
    fn render_applies_range_and_category() {
        let ds = snapshot();
        let base = ViewModel::initial(&ds, &Schema::journal_registry())
            .with_visible_columns(vec!["Lp.".into()]);

        let ranged = base.with_points_range(50.0, 150.0);
        assert_eq!(lp_column(&ranged.render(&ds)), vec!["4"]);

        // Category alone sorts too; the row without points goes last.
        let physics = base.with_category(CategoryFilter::Only("Fizyka".into()));
        assert_eq!(lp_column(&physics.render(&ds)), vec!["4", "1", "5", "3"]);

        let unknown = base.with_category(CategoryFilter::Only("Chemia".into()));
        assert!(unknown.render(&ds).rows.is_empty());

        // The base model is untouched by derived models.
        assert_eq!(base.points_range, None);
        assert_eq!(base.category, CategoryFilter::All);
    }

    #[test]
    fn json_rows_are_keyed_by_column() {
        let view = View {
            columns: vec!["Lp.".into(), "Punkty".into()],
            rows: vec![vec!["1".into(), "40".into()]],
        };
        let json = view.to_json();
        assert_eq!(json[0]["Lp."], "1");
        assert_eq!(json[0]["Punkty"], "40");
    }
}
