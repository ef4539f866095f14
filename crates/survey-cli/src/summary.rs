//! Human-readable summary tables.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use survey_model::{ComparisonResult, QuestionStatus};

use crate::commands::ReportOutcome;

/// Print the outcome of a direct two-export comparison.
pub fn print_comparison(result: &ComparisonResult) {
    println!("Comparing {} → {}", result.source_a, result.source_b);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Type"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for diff in &result.question_diffs {
        table.add_row(vec![
            Cell::new(&diff.code),
            Cell::new(diff.element_type),
            status_cell(diff.status),
        ]);
    }
    println!("{table}");

    println!(
        "{} matched, {} added, {} removed",
        result.matched().count(),
        result.added().count(),
        result.removed().count()
    );
}

/// Print the per-export summary of a report run.
pub fn print_report_summary(outcome: &ReportOutcome) {
    println!("Report data: {}", outcome.data_path.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Export"),
        header_cell("Identical"),
        header_cell("Text changed"),
        header_cell("Structure changed"),
        header_cell("Added"),
        header_cell("Removed"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for result in &outcome.results {
        table.add_row(vec![
            Cell::new(&result.source_b)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            count_cell(status_count(result, QuestionStatus::Identical), Color::Green),
            count_cell(status_count(result, QuestionStatus::TextChanged), Color::Yellow),
            count_cell(
                status_count(result, QuestionStatus::StructureChanged),
                Color::Red,
            ),
            count_cell(result.added().count(), Color::Green),
            count_cell(result.removed().count(), Color::Red),
        ]);
    }
    println!("{table}");
}

fn status_count(result: &ComparisonResult, status: QuestionStatus) -> usize {
    result
        .question_diffs
        .iter()
        .filter(|diff| diff.status == status)
        .count()
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn status_cell(status: QuestionStatus) -> Cell {
    match status {
        QuestionStatus::Identical => dim_cell(status),
        QuestionStatus::TextChanged => Cell::new(status).fg(Color::Yellow),
        QuestionStatus::StructureChanged => Cell::new(status)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        QuestionStatus::Added => Cell::new(status).fg(Color::Green),
        QuestionStatus::Removed => Cell::new(status).fg(Color::Red),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
