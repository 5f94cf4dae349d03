use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use memsynth_model::ListState;
use memsynth_validate::FailureLine;

use memsynth_cli::types::{CheckOutcome, ColumnStatus, ExpectationSummary};

pub fn print_check_summary(outcome: &CheckOutcome) {
    println!("List: {}", outcome.name);
    println!("Rows: {}", outcome.rows);
    println!("Condition: {}", outcome.condition);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Present"),
        header_cell("Hard"),
        header_cell("Soft"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    let mut total_hard = 0usize;
    let mut total_soft = 0usize;
    for status in &outcome.columns {
        total_hard += status.hard;
        total_soft += status.soft;
        table.add_row(column_row(status));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        count_cell(total_hard, Color::Red).add_attribute(Attribute::Bold),
        count_cell(total_soft, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_failure_table(outcome);
    println!("Result: {}", verdict_text(outcome));
}

fn column_row(status: &ColumnStatus) -> Vec<Cell> {
    let name = if status.present {
        Cell::new(&status.column)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(&status.column).fg(Color::DarkGrey)
    };
    vec![
        name,
        Cell::new(status.data_type),
        flag_cell(status.required),
        flag_cell(status.present),
        count_cell(status.hard, Color::Red),
        count_cell(status.soft, Color::Yellow),
    ]
}

fn print_failure_table(outcome: &CheckOutcome) {
    if outcome.report.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Line"),
        header_cell("Severity"),
        header_cell("Value"),
        header_cell("Parameters"),
    ]);
    apply_failure_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for column in &outcome.report.columns {
        for failure in &column.failures {
            table.add_row(vec![
                Cell::new(&column.column),
                Cell::new(failure.line),
                severity_cell(failure.soft),
                value_cell(failure),
                Cell::new(parameter_list(failure)),
            ]);
        }
    }
    println!();
    println!("Failures:");
    println!("{table}");
}

pub fn print_schema_table(expectations: &[ExpectationSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Nullable"),
        header_cell("Patterns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Center);
    for exp in expectations {
        let patterns = if exp.patterns.is_empty() {
            dim_cell("-")
        } else if exp.soft_patterns > 0 {
            Cell::new(format!(
                "{}\n({} soft)",
                exp.patterns.join("\n"),
                exp.soft_patterns
            ))
        } else {
            Cell::new(exp.patterns.join("\n"))
        };
        table.add_row(vec![
            Cell::new(&exp.column)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(exp.data_type),
            flag_cell(exp.required),
            flag_cell(exp.nullable),
            patterns,
        ]);
    }
    println!("{table}");
}

fn verdict_text(outcome: &CheckOutcome) -> &'static str {
    match (outcome.passed, outcome.condition) {
        (true, ListState::SoftFailure) => "passed with soft failures",
        (true, _) => "passed",
        (false, ListState::SoftFailure) => "failed (soft failures)",
        (false, _) => "failed",
    }
}

fn parameter_list(failure: &FailureLine) -> String {
    failure
        .parameters
        .iter()
        .map(|tag| tag.parameter.clone())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_failure_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(20)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(soft: bool) -> Cell {
    if soft {
        Cell::new("SOFT").fg(Color::Yellow)
    } else {
        Cell::new("HARD")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn value_cell(failure: &FailureLine) -> Cell {
    match &failure.value {
        Some(value) => Cell::new(value),
        None => dim_cell("<null>"),
    }
}

fn flag_cell(flag: bool) -> Cell {
    if flag {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
