//! Marker-presence filtering for [`crate::types::DataSet`].

use crate::types::DataSet;

/// Returns `true` if a marker cell signals membership: trimmed and case-folded, it equals `"x"`.
pub fn is_marked(value: &str) -> bool {
    value.trim().to_lowercase() == "x"
}

/// Keep rows marked in at least one of `selected`, projected to `metadata ++ selected`.
///
/// Only selected columns are consulted; a mark in any other column is irrelevant. Repeated
/// column names are projected once. Surviving rows keep their original relative order and their
/// metadata values untouched.
pub fn filter<S: AsRef<str>>(dataset: &DataSet, metadata: &[S], selected: &[S]) -> DataSet {
    let selected_idxs: Vec<usize> = selected
        .iter()
        .filter_map(|name| dataset.index_of(name.as_ref()))
        .collect();

    let kept = dataset.filter_rows(|row| {
        selected_idxs
            .iter()
            .any(|&i| row.get(i).is_some_and(|v| is_marked(v)))
    });

    let columns: Vec<&str> = metadata
        .iter()
        .chain(selected.iter())
        .map(AsRef::as_ref)
        .collect();
    kept.project(&columns)
}

/// Rows of `dataset` marked in `column`, with all columns kept.
///
/// Empty if `column` does not exist.
pub fn rows_marked_in(dataset: &DataSet, column: &str) -> DataSet {
    match dataset.index_of(column) {
        Some(idx) => dataset.filter_rows(|row| row.get(idx).is_some_and(|v| is_marked(v))),
        None => DataSet::new(dataset.columns.clone(), Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> DataSet {
        DataSet::new(
            vec!["Lp.".into(), "Punkty".into(), "c1".into(), "c2".into(), "c3".into()],
            vec![
                vec!["1".into(), "100".into(), "X".into(), "no".into(), "  x ".into()],
                vec!["2".into(), "40".into(), "".into(), "x".into(), "".into()],
                vec!["3".into(), "20".into(), "".into(), "".into(), "x".into()],
            ],
        )
    }

    #[test]
    fn marker_ignores_case_and_surrounding_whitespace() {
        assert!(is_marked("x"));
        assert!(is_marked(" X\t"));
        assert!(!is_marked("xx"));
        assert!(!is_marked(""));
        assert!(!is_marked("yes"));
    }

    #[test]
    fn keeps_rows_marked_in_any_selected_column() {
        let ds = sample_dataset();
        let out = filter(&ds, &["Lp.", "Punkty"], &["c1", "c3"]);
        assert_eq!(out.columns, vec!["Lp.", "Punkty", "c1", "c3"]);
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.rows[0], vec!["1", "100", "X", "  x "]);
        assert_eq!(out.rows[1], vec!["3", "20", "", "x"]);
    }

    #[test]
    fn mark_in_unselected_column_does_not_retain_row() {
        let ds = sample_dataset();
        let out = filter(&ds, &["Lp.", "Punkty"], &["c1", "c3"]);
        assert!(out.rows.iter().all(|r| r[0] != "2"));
    }

    #[test]
    fn duplicate_selection_projects_once() {
        let ds = sample_dataset();
        let out = filter(&ds, &["Lp."], &["c2", "c2"]);
        assert_eq!(out.columns, vec!["Lp.", "c2"]);
        assert_eq!(out.rows, vec![vec!["2", "x"]]);
    }

    #[test]
    fn empty_selection_keeps_no_rows() {
        let ds = sample_dataset();
        let out = filter::<&str>(&ds, &["Lp."], &[]);
        assert_eq!(out.columns, vec!["Lp."]);
        assert!(out.rows.is_empty());
    }

    #[test]
    fn filtering_is_deterministic() {
        let ds = sample_dataset();
        let a = filter(&ds, &["Lp."], &["c3", "c1"]);
        let b = filter(&ds, &["Lp."], &["c3", "c1"]);
        assert_eq!(a, b);
    }

    #[test]
    fn rows_marked_in_unknown_column_is_empty() {
        let ds = sample_dataset();
        assert_eq!(rows_marked_in(&ds, "c3").row_count(), 2);
        assert_eq!(rows_marked_in(&ds, "nope").row_count(), 0);
    }
}
