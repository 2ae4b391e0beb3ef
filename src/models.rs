use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// Build ecosystems with a registered scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Npm,
    Gradle,
    Maven,
    Swift,
    Pub,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ecosystem::Npm => write!(f, "npm"),
            Ecosystem::Gradle => write!(f, "gradle"),
            Ecosystem::Maven => write!(f, "maven"),
            Ecosystem::Swift => write!(f, "swift"),
            Ecosystem::Pub => write!(f, "pub"),
        }
    }
}

/// One third-party dependency as reported by a scanner.
///
/// Identity (equality, hashing, set membership) covers `name`, `version` and
/// `license` only; `ecosystem` and `source_path` are traceability metadata.
/// The same library reported by two scanners with the same resolved license
/// collapses to a single record in the merged set.
#[derive(Debug, Clone, Serialize)]
pub struct Dependency {
    pub name: String,
    pub version: Option<String>,
    pub license: Option<String>,
    pub ecosystem: Ecosystem,
    /// Path of the report or manifest this record was read from.
    pub source_path: Option<String>,
}

impl Dependency {
    pub fn new(
        name: impl Into<String>,
        version: Option<String>,
        license: Option<String>,
        ecosystem: Ecosystem,
    ) -> Self {
        Dependency {
            name: name.into(),
            version,
            license,
            ecosystem,
            source_path: None,
        }
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Copy of this record with the license replaced. The normalizer builds
    /// new records instead of mutating, so sets merged from concurrent
    /// scanners never share mutable state.
    pub fn with_license(&self, license: impl Into<String>) -> Self {
        let mut dep = self.clone();
        dep.license = Some(license.into());
        dep
    }

    /// True when no usable license string is present (absent or whitespace).
    pub fn license_is_blank(&self) -> bool {
        self.license
            .as_deref()
            .map_or(true, |l| l.trim().is_empty())
    }

    /// Canonical `name:version:license` record, delimiters escaped.
    pub fn record(&self) -> String {
        format!(
            "{}:{}:{}",
            escape_field(&self.name),
            escape_field(self.version.as_deref().unwrap_or("")),
            escape_field(self.license.as_deref().unwrap_or("")),
        )
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.license == other.license
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
        self.license.hash(state);
    }
}

impl Ord for Dependency {
    // Natural order is name then version; license participates as the last
    // key so ordering stays consistent with equality.
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.version.cmp(&other.version))
            .then_with(|| self.license.cmp(&other.license))
    }
}

impl PartialOrd for Dependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{} {}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One row of project policy: a canonical license and whether it is permitted.
#[derive(Debug, Clone, Serialize)]
pub struct License {
    pub id: String,
    pub canonical_name: String,
    pub allowed: bool,
}

impl License {
    pub fn new(id: impl Into<String>, canonical_name: impl Into<String>, allowed: bool) -> Self {
        License {
            id: id.into(),
            canonical_name: canonical_name.into(),
            allowed,
        }
    }

    /// Canonical `id:canonicalName:allowed` record, delimiters escaped.
    pub fn record(&self) -> String {
        format!(
            "{}:{}:{}",
            escape_field(&self.id),
            escape_field(&self.canonical_name),
            self.allowed,
        )
    }
}

impl PartialEq for License {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for License {}

impl Hash for License {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Ord for License {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl PartialOrd for License {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// No license could be determined for the dependency.
    Unlisted,
    /// License resolved but missing from policy or explicitly not allowed.
    NotAllowed,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Unlisted => write!(f, "unlisted"),
            ViolationKind::NotAllowed => write!(f, "not-allowed"),
        }
    }
}

/// A per-dependency compliance failure produced by the validation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub dependency: Dependency,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(dependency: Dependency, kind: ViolationKind) -> Self {
        Violation { dependency, kind }
    }

    pub fn message(&self) -> String {
        match self.kind {
            ViolationKind::Unlisted => {
                format!("No license found for dependency {}", self.dependency)
            }
            ViolationKind::NotAllowed => format!(
                "License '{}' of dependency {} is not allowed",
                self.dependency.license.as_deref().unwrap_or(""),
                self.dependency
            ),
        }
    }
}

/// Comma-joined dependency records for the audit inventory.
pub fn dependency_inventory(dependencies: &BTreeSet<Dependency>) -> String {
    dependencies
        .iter()
        .map(Dependency::record)
        .collect::<Vec<_>>()
        .join(",")
}

/// Comma-joined license records, sorted by id.
pub fn license_inventory(licenses: &BTreeSet<License>) -> String {
    licenses
        .iter()
        .map(License::record)
        .collect::<Vec<_>>()
        .join(",")
}

/// Backslash-escape the record delimiters (`:` between fields, `,` between
/// records) so field values round-trip through the inventory strings.
fn escape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ':' | ',') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(name: &str, version: &str, license: Option<&str>) -> Dependency {
        Dependency::new(
            name,
            Some(version.to_string()),
            license.map(str::to_string),
            Ecosystem::Npm,
        )
    }

    #[test]
    fn test_identity_ignores_metadata() {
        let a = dep("lodash", "4.17.21", Some("MIT"));
        let mut b = dep("lodash", "4.17.21", Some("MIT"));
        b.ecosystem = Ecosystem::Gradle;
        b.source_path = Some("build/reports/license-details.json".to_string());
        assert_eq!(a, b);

        let mut set = BTreeSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_identity_differs_on_license() {
        let a = dep("lodash", "4.17.21", Some("MIT"));
        let b = dep("lodash", "4.17.21", Some("GPL-3.0"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_natural_order() {
        let mut set = BTreeSet::new();
        set.insert(dep("b", "1.0", None));
        set.insert(dep("a", "2.0", None));
        set.insert(dep("a", "1.0", None));
        let names: Vec<String> = set.iter().map(|d| d.to_string()).collect();
        assert_eq!(names, vec!["a 1.0", "a 2.0", "b 1.0"]);
    }

    #[test]
    fn test_dependency_record() {
        assert_eq!(
            dep("lodash", "4.17.21", Some("MIT")).record(),
            "lodash:4.17.21:MIT"
        );
        let unresolved = Dependency::new("thing", None, None, Ecosystem::Maven);
        assert_eq!(unresolved.record(), "thing::");
    }

    #[test]
    fn test_record_escapes_delimiters() {
        let mvn = dep("org.apache.commons:commons-lang3", "3.12.0", Some("Apache-2.0"));
        assert_eq!(
            mvn.record(),
            "org.apache.commons\\:commons-lang3:3.12.0:Apache-2.0"
        );

        let odd = dep("a,b", "1\\0", Some("X"));
        assert_eq!(odd.record(), "a\\,b:1\\\\0:X");
    }

    #[test]
    fn test_license_record() {
        let lic = License::new("Apache-2.0", "Apache Software License 2.0", true);
        assert_eq!(lic.record(), "Apache-2.0:Apache Software License 2.0:true");
    }

    #[test]
    fn test_license_identity_by_id() {
        let a = License::new("MIT", "MIT", true);
        let b = License::new("MIT", "MIT License", false);
        assert_eq!(a, b);
    }

    #[test]
    fn test_inventories() {
        let mut deps = BTreeSet::new();
        deps.insert(dep("b", "2.0", Some("MIT")));
        deps.insert(dep("a", "1.0", Some("MIT")));
        assert_eq!(dependency_inventory(&deps), "a:1.0:MIT,b:2.0:MIT");

        let mut lics = BTreeSet::new();
        lics.insert(License::new("MIT", "MIT", true));
        lics.insert(License::new("Apache-2.0", "Apache-2.0", true));
        assert_eq!(
            license_inventory(&lics),
            "Apache-2.0:Apache-2.0:true,MIT:MIT:true"
        );
    }

    #[test]
    fn test_blank_license_detection() {
        assert!(dep("a", "1.0", None).license_is_blank());
        assert!(dep("a", "1.0", Some("  ")).license_is_blank());
        assert!(!dep("a", "1.0", Some("MIT")).license_is_blank());
    }

    #[test]
    fn test_violation_messages() {
        let v = Violation::new(dep("thing", "1.0", None), ViolationKind::Unlisted);
        assert_eq!(v.message(), "No license found for dependency thing 1.0");

        let v = Violation::new(dep("thing", "1.0", Some("GPL-3.0")), ViolationKind::NotAllowed);
        assert_eq!(
            v.message(),
            "License 'GPL-3.0' of dependency thing 1.0 is not allowed"
        );
    }
}
