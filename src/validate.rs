//! Validation engine: classify every dependency against the license policy
//! and compute the set of policy licenses the project actually uses.

use std::collections::BTreeSet;

use crate::models::{Dependency, License, Violation, ViolationKind};

/// Classify each dependency against the policy.
///
/// Default-deny: a license missing from the policy is treated the same as one
/// explicitly not allowed. Every dependency is evaluated — the result carries
/// all findings of the run, not just the first. Malformed records are data
/// (`Unlisted`), never an error.
///
/// The `BTreeSet` input iterates in natural order (name, then version), so
/// the violation list is stable for a given input set.
pub fn validate(dependencies: &BTreeSet<Dependency>, policy: &[License]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for dependency in dependencies {
        match trimmed_license(dependency) {
            None => violations.push(Violation::new(dependency.clone(), ViolationKind::Unlisted)),
            Some(license) => {
                let allowed = find_policy_entry(policy, license).map(|entry| entry.allowed);
                if allowed != Some(true) {
                    violations.push(Violation::new(dependency.clone(), ViolationKind::NotAllowed));
                }
            }
        }
    }

    violations
}

/// The distinct policy licenses exercised by the dependency set.
///
/// Only licenses registered in the policy count — unresolved or unrecognized
/// license strings are excluded. The returned entries are the policy's own
/// records, deduplicated by id; `BTreeSet` keeps serialization deterministic.
pub fn used_licenses(dependencies: &BTreeSet<Dependency>, policy: &[License]) -> BTreeSet<License> {
    let mut used = BTreeSet::new();

    for dependency in dependencies {
        if let Some(license) = trimmed_license(dependency) {
            if let Some(entry) = find_policy_entry(policy, license) {
                used.insert(entry.clone());
            }
        }
    }

    used
}

fn trimmed_license(dependency: &Dependency) -> Option<&str> {
    dependency
        .license
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
}

// Case-sensitive exact match against id or canonical name.
fn find_policy_entry<'a>(policy: &'a [License], license: &str) -> Option<&'a License> {
    policy
        .iter()
        .find(|entry| entry.id == license || entry.canonical_name == license)
}
