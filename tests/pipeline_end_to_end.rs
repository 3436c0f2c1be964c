use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use calamine::{Reader, Xlsx, open_workbook};

use journal_registry::ingestion::excel::canonical_text;
use journal_registry::ingestion::{LoadOptions, load};
use journal_registry::observability::Severity;
use journal_registry::pipeline::{Pipeline, PipelineOptions};
use journal_registry::processing::{classify, filter, select};
use journal_registry::report::{SNAPSHOT_MAGIC, read_snapshot};
use journal_registry::types::{DataSet, Schema};
use journal_registry::RegistryError;

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("journal-registry-{name}-{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn pipeline_in(dir: &Path) -> Pipeline {
    Pipeline::new(PipelineOptions {
        snapshot_path: dir.join("dane_filtered.bin"),
        workbook_path: dir.join("baza_czasopism.xlsx"),
        ..Default::default()
    })
}

/// Every sheet as `(name, rows of canonical text)`, header row included.
fn read_workbook(path: &Path) -> Vec<(String, Vec<Vec<String>>)> {
    let mut wb: Xlsx<_> = open_workbook(path).unwrap();
    wb.sheet_names()
        .into_iter()
        .map(|name| {
            let range = wb.worksheet_range(&name).unwrap();
            let rows = range
                .rows()
                .map(|r| r.iter().map(canonical_text).collect())
                .collect();
            (name, rows)
        })
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn two_category_scenario_produces_all_and_one_sheet_per_category() {
    let dir = tmp_dir("scenario");
    let source = dir.join("source.csv");
    std::fs::write(
        &source,
        "Lp.,Tytuł 1,Punkty,A,B\n1,Alpha,40,x,\n2,Beta,100,,X\n3,Gamma,20,no,no\n",
    )
    .unwrap();

    let pipeline = pipeline_in(&dir);
    let summary = pipeline.run(&source, &[1, 2]).unwrap();
    assert_eq!(summary.loaded_rows, 3);
    assert_eq!(summary.filtered_rows, 2);

    let sheets = read_workbook(&summary.workbook_path);
    let names: Vec<&str> = sheets.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["All", "A", "B"]);

    let (_, all) = &sheets[0];
    assert_eq!(all[0], strings(&["Lp.", "Tytuł 1", "Punkty", "A", "B"]));
    assert_eq!(all.len() - 1, 2);
    assert_eq!(all[1], strings(&["1", "Alpha", "40", "x", ""]));
    assert_eq!(all[2], strings(&["2", "Beta", "100", "", "X"]));

    let (_, a) = &sheets[1];
    assert_eq!(a[0], strings(&["Lp.", "Tytuł 1", "Punkty", "A"]));
    assert_eq!(a[1..], [strings(&["1", "Alpha", "40", "x"])]);

    let (_, b) = &sheets[2];
    assert_eq!(b[0], strings(&["Lp.", "Tytuł 1", "Punkty", "B"]));
    assert_eq!(b[1..], [strings(&["2", "Beta", "100", "X"])]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn every_sheet_is_a_styled_table_with_one_header_per_column() {
    let dir = tmp_dir("tables");
    let summary = pipeline_in(&dir)
        .run("tests/fixtures/registry.csv", &[1, 2])
        .unwrap();

    let mut wb: Xlsx<_> = open_workbook(&summary.workbook_path).unwrap();
    wb.load_tables().unwrap();
    for sheet in &summary.sheets {
        let tables: Vec<String> = wb
            .table_names_in_sheet(&sheet.name)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(tables.len(), 1, "sheet {}", sheet.name);
        let table = wb.table_by_name(&tables[0]).unwrap();
        let range = wb.worksheet_range(&sheet.name).unwrap();
        let header: Vec<String> = range.rows().next().unwrap().iter().map(canonical_text).collect();
        assert_eq!(table.columns(), header.as_slice());
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn category_without_marked_rows_gets_no_sheet() {
    let dir = tmp_dir("omitted");
    let source = dir.join("source.csv");
    std::fs::write(&source, "Lp.,Punkty,c1,c2\n1,10,x,\n2,20,x,\n").unwrap();

    let summary = pipeline_in(&dir).run(&source, &[1, 2]).unwrap();
    let names: Vec<&str> = summary.sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["All", "c1"]);

    let on_disk: Vec<String> = read_workbook(&summary.workbook_path)
        .into_iter()
        .map(|(n, _)| n)
        .collect();
    assert_eq!(on_disk, strings(&["All", "c1"]));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn empty_result_still_writes_the_all_sheet_headers() {
    let dir = tmp_dir("empty");
    let source = dir.join("source.csv");
    std::fs::write(&source, "Lp.,Punkty,c1\n1,10,\n").unwrap();

    let summary = pipeline_in(&dir).run(&source, &[1]).unwrap();
    assert_eq!(summary.filtered_rows, 0);

    let sheets = read_workbook(&summary.workbook_path);
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].0, "All");
    assert_eq!(sheets[0].1, vec![strings(&["Lp.", "Punkty", "c1"])]);

    let snapshot = read_snapshot(&summary.snapshot_path).unwrap();
    assert_eq!(snapshot.columns, strings(&["Lp.", "Punkty", "c1"]));
    assert_eq!(snapshot.row_count(), 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn marker_matching_ignores_case_and_surrounding_whitespace() {
    let ds = DataSet::new(
        strings(&["Lp.", "c1", "c2", "c3"]),
        vec![
            strings(&["1", "X", "", ""]),
            strings(&["2", "", "", "  x "]),
            strings(&["3", "", "x", ""]),
            strings(&["4", "xx", "", "y"]),
        ],
    );
    let classes = classify(&ds.columns, &Schema::journal_registry());
    let out = filter(&ds, &classes.metadata, &strings(&["c1", "c3"]));

    assert_eq!(out.columns, strings(&["Lp.", "c1", "c3"]));
    let kept: Vec<&str> = out.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(kept, vec!["1", "2"]);
}

#[test]
fn metadata_of_surviving_rows_is_unchanged() {
    let loaded = load("tests/fixtures/registry.csv", &LoadOptions::default()).unwrap();
    let dir = tmp_dir("metadata");
    let summary = pipeline_in(&dir)
        .run("tests/fixtures/registry.csv", &[1, 2, 3])
        .unwrap();
    let snapshot = read_snapshot(&summary.snapshot_path).unwrap();
    assert_eq!(snapshot.row_count(), 4);

    let schema = Schema::journal_registry();
    for row in 0..snapshot.row_count() {
        let lp = snapshot.value(row, "Lp.").unwrap();
        let original = (0..loaded.row_count())
            .find(|&r| loaded.value(r, "Lp.") == Some(lp))
            .unwrap();
        for field in schema.field_names() {
            assert_eq!(snapshot.value(row, field), loaded.value(original, field), "{field}");
        }
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn repeated_runs_produce_identical_artifacts() {
    let dir = tmp_dir("idempotent");
    let pipeline = pipeline_in(&dir);

    let first = pipeline.run("tests/fixtures/registry.csv", &[2, 1]).unwrap();
    let snapshot_1 = std::fs::read(&first.snapshot_path).unwrap();
    let workbook_1 = read_workbook(&first.workbook_path);

    let second = pipeline.run("tests/fixtures/registry.csv", &[2, 1]).unwrap();
    let snapshot_2 = std::fs::read(&second.snapshot_path).unwrap();
    let workbook_2 = read_workbook(&second.workbook_path);

    assert_eq!(first, second);
    assert!(snapshot_1.starts_with(&SNAPSHOT_MAGIC));
    assert_eq!(snapshot_1, snapshot_2);
    assert_eq!(workbook_1, workbook_2);

    let names: Vec<&str> = workbook_1.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["All", "Prawo", "Fizyka"]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn workbook_failure_keeps_the_new_snapshot() {
    let dir = tmp_dir("workbook-failure");
    let source = dir.join("source.csv");
    std::fs::write(&source, "Lp.,Punkty,A\n1,10,x\n2,20,\n").unwrap();
    // A directory where the workbook should go cannot be replaced by a file.
    let workbook_path = dir.join("report.xlsx");
    std::fs::create_dir_all(&workbook_path).unwrap();
    let snapshot_path = dir.join("dane_filtered.bin");

    let pipeline = Pipeline::new(PipelineOptions {
        snapshot_path: snapshot_path.clone(),
        workbook_path: workbook_path.clone(),
        ..Default::default()
    });
    let err = pipeline.run(&source, &[1]).unwrap_err();

    match &err {
        RegistryError::Persist { path, .. } => assert_eq!(path, &workbook_path),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.severity(), Severity::Critical);
    assert!(workbook_path.is_dir());

    let snapshot = read_snapshot(&snapshot_path).unwrap();
    assert_eq!(snapshot.columns, strings(&["Lp.", "Punkty", "A"]));
    assert_eq!(snapshot.rows, vec![strings(&["1", "10", "x"])]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn long_category_ending_in_apostrophe_still_gets_a_sheet() {
    let dir = tmp_dir("apostrophe");
    let category = format!("{}'tail", "a".repeat(30));
    let source = dir.join("source.csv");
    std::fs::write(&source, format!("Lp.,Punkty,{category}\n1,10,x\n")).unwrap();

    let summary = pipeline_in(&dir).run(&source, &[1]).unwrap();
    let names: Vec<String> = read_workbook(&summary.workbook_path)
        .into_iter()
        .map(|(n, _)| n)
        .collect();
    assert_eq!(names, vec!["All".to_string(), "a".repeat(30)]);
    assert_eq!(summary.sheets[1].category.as_deref(), Some(category.as_str()));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn invalid_selection_lists_every_bad_index() {
    let categorical = strings(&["a", "b", "c", "d", "e"]);
    let err = select(&[2, 7, 0, 4], &categorical).unwrap_err();
    match err {
        RegistryError::Selection { invalid, available } => {
            assert_eq!(invalid, vec![7, 0]);
            assert_eq!(available, 5);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
