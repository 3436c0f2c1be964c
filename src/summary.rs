use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use journal_registry::pipeline::RunSummary;
use journal_registry::viewer::View;

pub fn print_run_summary(summary: &RunSummary) {
    println!("Snapshot saved to {}", summary.snapshot_path.display());
    println!("Workbook saved to {}", summary.workbook_path.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Category"),
        header_cell("Records"),
    ]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(2) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for sheet in &summary.sheets {
        let category = match &sheet.category {
            Some(name) => Cell::new(name),
            None => Cell::new("-").add_attribute(Attribute::Dim),
        };
        table.add_row(vec![Cell::new(&sheet.name), category, Cell::new(sheet.rows)]);
    }
    println!("{table}");
    println!(
        "{} of {} journals kept",
        summary.filtered_rows, summary.loaded_rows
    );
}

pub fn print_columns(lines: &[String]) {
    if lines.is_empty() {
        println!("No categorical columns found.");
        return;
    }
    println!("Available columns:");
    for line in lines {
        println!("{line}");
    }
}

pub fn print_view_table(view: &View) {
    let mut table = Table::new();
    table.set_header(view.columns.iter().map(|c| header_cell(c)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for row in &view.rows {
        table.add_row(row);
    }
    println!("{table}");
    println!("{} journals", view.rows.len());
}

pub fn print_view_json(view: &View) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(&view.to_json())?);
    Ok(())
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}
