//! Report renderers for validation results.
//!
//! - [`terminal`] — colored, tabular output with summary box; respects
//!   `--verbose` / `--quiet`.
//! - [`json_report`] — machine-readable report carrying the merged dependency
//!   set, violations, used licenses, and the audit inventory strings.

pub mod terminal;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{
    dependency_inventory, license_inventory, Dependency, License, Violation,
};

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub dependencies: Vec<Dependency>,
    pub violations: Vec<JsonViolation>,
    pub used_licenses: Vec<License>,
    pub inventory: Inventory,
}

#[derive(Debug, Serialize)]
pub struct JsonViolation {
    #[serde(flatten)]
    pub violation: Violation,
    pub message: String,
}

/// Opaque serialized inventories for audit trails, one record per entry,
/// comma-joined (`name:version:license` / `id:canonicalName:allowed`).
#[derive(Debug, Serialize)]
pub struct Inventory {
    pub dependencies: String,
    pub licenses: String,
}

pub fn json_report(
    dependencies: &BTreeSet<Dependency>,
    violations: &[Violation],
    used_licenses: &BTreeSet<License>,
) -> JsonReport {
    JsonReport {
        dependencies: dependencies.iter().cloned().collect(),
        violations: violations
            .iter()
            .map(|v| JsonViolation {
                message: v.message(),
                violation: v.clone(),
            })
            .collect(),
        used_licenses: used_licenses.iter().cloned().collect(),
        inventory: Inventory {
            dependencies: dependency_inventory(dependencies),
            licenses: license_inventory(used_licenses),
        },
    }
}
