//! Terminal tables for the `check` and `rules` subcommands

use console::style;
use prettytable::{format, Cell, Row, Table};
use std::path::Path;
use strum::IntoEnumIterator;

use crate::image_check::{ImageCategory, RuleSet, ValidationResult};

/// One line of the check table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionRow {
    pub criterion: &'static str,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

/// Expected vs. actual for every criterion of `rules`
pub fn criterion_rows(result: &ValidationResult, rules: &RuleSet) -> Vec<CriterionRow> {
    let failed = |name: &str| result.violations.iter().any(|v| v.criterion() == name);
    let attrs = &result.attributes;

    let mut rows = vec![
        CriterionRow {
            criterion: "format",
            expected: rules.format.to_string(),
            actual: attrs.format.clone(),
            passed: !failed("format"),
        },
        CriterionRow {
            criterion: "size",
            expected: rules.size_label(),
            actual: attrs.size_label(),
            passed: !failed("size"),
        },
        CriterionRow {
            criterion: "mode",
            expected: rules.mode.to_string(),
            actual: attrs.mode.clone(),
            passed: !failed("mode"),
        },
    ];

    if rules.require_transparency {
        rows.push(CriterionRow {
            criterion: "transparency",
            expected: "> 0 transparent pixels".to_string(),
            actual: format!("{} transparent pixels", attrs.transparent_pixels),
            passed: !failed("transparency"),
        });
    }

    rows
}

/// Print the verdict for one file
pub fn print_check_report(path: &Path, category: ImageCategory, result: &ValidationResult) {
    println!(
        "{} {} ({})",
        style("Checking").bold().cyan(),
        path.display(),
        category
    );
    println!();

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.add_row(Row::new(vec![
        Cell::new("Criterion"),
        Cell::new("Expected"),
        Cell::new("Actual"),
        Cell::new("OK"),
    ]));

    for row in criterion_rows(result, category.rules()) {
        table.add_row(Row::new(vec![
            Cell::new(row.criterion),
            Cell::new(&row.expected),
            Cell::new(&row.actual),
            Cell::new(if row.passed { "✓" } else { "✗" }),
        ]));
    }

    table.printstd();
    println!();

    if result.success {
        println!("{}", style(format!("✓ {}", result.message)).green().bold());
    } else {
        println!("{}", style(format!("✗ {}", result.message)).red().bold());
    }
}

/// Print the requirements of every category
pub fn print_rules_table() {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.add_row(Row::new(vec![
        Cell::new("Type"),
        Cell::new("Alias"),
        Cell::new("Format"),
        Cell::new("Size"),
        Cell::new("Mode"),
        Cell::new("Transparent"),
    ]));

    for category in ImageCategory::iter() {
        let rules = category.rules();
        table.add_row(Row::new(vec![
            Cell::new(&category.to_string()),
            Cell::new(category.alias()),
            Cell::new(rules.format),
            Cell::new(&rules.size_label()),
            Cell::new(rules.mode),
            Cell::new(if rules.require_transparency { "required" } else { "-" }),
        ]));
    }

    table.printstd();
}
