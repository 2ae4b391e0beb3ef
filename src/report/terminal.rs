use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{Dependency, License, Violation, ViolationKind};

/// Render a colored terminal report.
pub fn render(
    dependencies: &BTreeSet<Dependency>,
    violations: &[Violation],
    used_licenses: &BTreeSet<License>,
    path: &Path,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let total = dependencies.len();
    let unlisted_count = violations
        .iter()
        .filter(|v| v.kind == ViolationKind::Unlisted)
        .count();
    let not_allowed_count = violations
        .iter()
        .filter(|v| v.kind == ViolationKind::NotAllowed)
        .count();
    let clean_count = total - violations.len();

    if quiet {
        println!(
            "Total: {}  Clean: {}  Unlisted: {}  Not allowed: {}",
            total,
            clean_count.to_string().green(),
            unlisted_count.to_string().yellow(),
            not_allowed_count.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "license-gate".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Scanning: {}\n", path.display());

    let used = summarize_used_licenses(used_licenses);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total dependencies : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  Clean           : {:>4}", "✓".green(), clean_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Unlisted        : {:>4}", "⚠".yellow(), unlisted_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Not allowed     : {:>4}", "✗".red(), not_allowed_count)
    );
    println!(" │  {:<48} │", format!("Used licenses      : {}", used));
    println!(" └────────────────────────────────────────────────────┘\n");

    if !violations.is_empty() {
        println!(
            " {} Dependencies violating policy:\n",
            "[VIOLATION]".red().bold()
        );
        render_violation_table(violations);
        println!();
    }

    if verbose && total > 0 {
        println!(" {} All scanned dependencies:\n", "[ALL]".cyan().bold());
        render_dependency_table(dependencies);
        println!();
    }

    Ok(())
}

fn render_violation_table(violations: &[Violation]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("Ecosystem").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Violation").add_attribute(Attribute::Bold),
        ]);

    for violation in violations {
        let dep = &violation.dependency;
        let (kind_str, kind_color) = match violation.kind {
            ViolationKind::Unlisted => ("⚠ unlisted", Color::Yellow),
            ViolationKind::NotAllowed => ("✗ not allowed", Color::Red),
        };

        table.add_row(vec![
            Cell::new(&dep.name),
            Cell::new(dep.version.as_deref().unwrap_or("-")),
            Cell::new(dep.ecosystem.to_string()),
            Cell::new(dep.license.as_deref().unwrap_or("unknown")),
            Cell::new(kind_str)
                .fg(kind_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{table}");
}

fn render_dependency_table(dependencies: &BTreeSet<Dependency>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("Ecosystem").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
        ]);

    for dep in dependencies {
        table.add_row(vec![
            Cell::new(&dep.name),
            Cell::new(dep.version.as_deref().unwrap_or("-")),
            Cell::new(dep.ecosystem.to_string()),
            Cell::new(dep.license.as_deref().unwrap_or("unknown")),
        ]);
    }

    println!("{table}");
}

fn summarize_used_licenses(used_licenses: &BTreeSet<License>) -> String {
    let ids: Vec<&str> = used_licenses
        .iter()
        .take(4)
        .map(|l| l.id.as_str())
        .collect();

    if ids.is_empty() {
        "none".to_string()
    } else if used_licenses.len() > ids.len() {
        format!("[{} +{}]", ids.join(", "), used_licenses.len() - ids.len())
    } else {
        format!("[{}]", ids.join(", "))
    }
}
