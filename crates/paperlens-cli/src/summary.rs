use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use paperlens_ingest::PaperSections;
use paperlens_model::{Confidence, ImplementationKind, Job, JobStatus};
use paperlens_rules::{RuleCategory, RuleSet};

use crate::types::{AnalyzeOutcome, BatchOutcome};

pub fn print_batch_summary(outcome: &BatchOutcome) {
    let summary = &outcome.summary;
    if let Some(dir) = &outcome.output_dir {
        println!("Output: {}", dir.display());
    }
    for path in &outcome.report_files {
        println!("Report: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Document"),
        header_cell("Status"),
        header_cell("Type"),
        header_cell("Confidence"),
        header_cell("Attempts"),
        header_cell("Time (ms)"),
        header_cell("Code"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    for job in &summary.jobs {
        table.add_row(job_row(job));
    }
    for job in &summary.skipped {
        table.add_row(vec![
            dim_cell(job.id),
            Cell::new(&job.document.title),
            Cell::new("SKIPPED").fg(Color::DarkGrey),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell(0),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} documents", summary.total))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{:.1}%", summary.success_rate())).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(summary.total_duration_ms()).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    println!(
        "Succeeded: {}  Failed: {}  Skipped: {}",
        summary.succeeded,
        summary.failed,
        summary.skipped.len()
    );
    let failures = summary.failures();
    if !failures.is_empty() {
        eprintln!("Failed documents:");
        for failure in failures {
            eprintln!(
                "- {} ({} attempts): {}",
                failure.document, failure.attempts, failure.error
            );
        }
    }
    if let Some(reason) = &outcome.aborted {
        eprintln!("Batch aborted: {reason}");
    }
}

pub fn print_analysis(outcome: &AnalyzeOutcome) {
    match &outcome.markdown {
        Some(markdown) => println!("{markdown}"),
        None => eprintln!(
            "Analysis failed: {}",
            outcome.job.error.as_deref().unwrap_or("unknown error")
        ),
    }
    for path in &outcome.job.outputs {
        println!("Wrote: {}", path.display());
    }
    if let Some(sections) = &outcome.sections {
        print_sections(sections);
    }
}

fn print_sections(sections: &PaperSections) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Section"), header_cell("Characters")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, content) in sections.entries() {
        let chars = content.chars().count();
        let count = if chars == 0 {
            dim_cell(chars)
        } else {
            Cell::new(chars)
        };
        table.add_row(vec![Cell::new(name), count]);
    }
    println!("{table}");
}

pub fn print_rules(rules: &RuleSet) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Patterns"),
        header_cell("Case"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for category in RuleCategory::ALL {
        let patterns = rules.rules(category);
        let insensitive = patterns.iter().all(|rule| rule.case_insensitive);
        table.add_row(vec![
            Cell::new(category.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(patterns.len()),
            if insensitive {
                dim_cell("ignore")
            } else {
                Cell::new("exact")
            },
        ]);
    }
    println!("{table}");

    let thresholds = rules.thresholds();
    let mut table = Table::new();
    table.set_header(vec![header_cell("Threshold"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, value) in [
        ("high_confidence_matches", thresholds.high_confidence_matches),
        ("evidence_limit", thresholds.evidence_limit),
        ("snippet_radius", thresholds.snippet_radius),
        ("sentence_limit", thresholds.sentence_limit),
    ] {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    println!("{table}");
}

fn job_row(job: &Job) -> Vec<Cell> {
    let (kind, confidence, code) = match &job.analysis {
        Some(analysis) => {
            let implementation = &analysis.implementation;
            (
                kind_cell(implementation.kind),
                confidence_cell(implementation.confidence),
                implementation
                    .code_url
                    .as_deref()
                    .map_or_else(|| dim_cell("-"), Cell::new),
            )
        }
        None => (dim_cell("-"), dim_cell("-"), dim_cell("-")),
    };
    vec![
        Cell::new(job.id),
        Cell::new(&job.document.title),
        status_cell(job.status),
        kind,
        confidence,
        attempts_cell(job.attempts),
        job.duration_ms()
            .map_or_else(|| dim_cell("-"), Cell::new),
        code,
    ]
}

fn status_cell(status: JobStatus) -> Cell {
    match status {
        JobStatus::Success => Cell::new("OK").fg(Color::Green),
        JobStatus::Failed => Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        JobStatus::Pending | JobStatus::Running => dim_cell(status.as_str()),
    }
}

fn kind_cell(kind: ImplementationKind) -> Cell {
    match kind {
        ImplementationKind::Official => Cell::new(kind.as_str())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        ImplementationKind::Unofficial => Cell::new(kind.as_str()).fg(Color::Yellow),
        ImplementationKind::Unknown => dim_cell(kind.as_str()),
    }
}

fn confidence_cell(confidence: Confidence) -> Cell {
    match confidence {
        Confidence::High => Cell::new(confidence).add_attribute(Attribute::Bold),
        Confidence::Medium => Cell::new(confidence),
        Confidence::Low => dim_cell(confidence),
    }
}

fn attempts_cell(attempts: u32) -> Cell {
    if attempts > 1 {
        Cell::new(attempts).fg(Color::Yellow)
    } else {
        Cell::new(attempts)
    }
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 8 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(4)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ]);
    }
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
