//! `license-gate` — scan dependency metadata reports and enforce license policy.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load policy config ([`config::load_config`]); bail out if disabled.
//! 3. Run every registered scanner over the module root ([`scanner`]).
//! 4. Normalize each record centrally ([`normalize`]) and merge the sets.
//! 5. Classify against the allow-list and collect used licenses ([`validate`]).
//! 6. Render the requested report ([`report`]).
//! 7. Exit `0` (clean) or `1` (at least one violation).

mod cli;
mod config;
mod models;
mod normalize;
mod report;
mod scanner;
mod validate;

use std::collections::BTreeSet;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cli::{Cli, ReportFormat};
use config::load_config;
use models::{Dependency, Ecosystem};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Resolve project path
    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());

    // Load policy config; a malformed file or pattern is fatal
    let config = load_config(&path, cli.config.as_deref())?;
    if !config.enabled {
        tracing::info!("license check is set to inactive, nothing scanned");
        return Ok(());
    }

    let policy = config.policy();
    let license_table = config.license_table()?;
    let dependency_table = config.dependency_table()?;

    let excluded: Vec<Ecosystem> = cli.exclude_ecosystem.iter().map(Into::into).collect();

    // Scan all ecosystems, normalize centrally, merge with deduplication
    let mut dependencies: BTreeSet<Dependency> = BTreeSet::new();

    for scanner in scanner::scanners() {
        if excluded.contains(&scanner.ecosystem()) {
            continue;
        }

        let scanned = scanner.scan(&path);
        if !cli.quiet && !scanned.is_empty() {
            eprintln!(
                "  {} {} {} dependencies",
                "→".cyan(),
                scanner.ecosystem(),
                scanned.len()
            );
        }

        for dep in scanned {
            let dep = normalize::resolve_unlicensed(&dep, &dependency_table);
            let dep = normalize::normalize(&dep, &license_table);
            dependencies.insert(dep);
        }
    }

    let violations = validate::validate(&dependencies, &policy);
    let used_licenses = validate::used_licenses(&dependencies, &policy);

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(
            &dependencies,
            &violations,
            &used_licenses,
            &path,
            cli.verbose,
            cli.quiet,
        )?,
        ReportFormat::Json => {
            let json = report::json_report(&dependencies, &violations, &used_licenses);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    // Exit code: 1 if any violation found
    if !violations.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
