use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::models::{Dependency, Ecosystem};

/// Scanner for Dart/Flutter projects using pub.
///
/// Reads `build/reports/license_finder/flutter-license-details.json` as
/// produced by the license_finder tooling. Each entry lists a package with
/// zero or more license names; a literal `"unknown"` entry means the tool
/// could not determine one and is treated as absent.
pub struct PubScanner;

impl super::Scanner for PubScanner {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pub
    }

    fn scan(&self, module_root: &Path) -> Vec<Dependency> {
        let report = module_root
            .join("build")
            .join("reports")
            .join("license_finder")
            .join("flutter-license-details.json");

        if !report.exists() {
            tracing::debug!(
                "no flutter-license-details.json in {} - skipping pub scan",
                module_root.display()
            );
            return Vec::new();
        }

        match parse_license_details(&report) {
            Ok(deps) => deps,
            Err(err) => {
                tracing::warn!("problems reading {}: {:#}", report.display(), err);
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct LicenseDetails {
    #[serde(default)]
    dependencies: Vec<PubPackage>,
}

#[derive(Debug, Deserialize)]
struct PubPackage {
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    licenses: Vec<String>,
}

fn parse_license_details(report: &Path) -> Result<Vec<Dependency>> {
    let content = std::fs::read_to_string(report)?;
    let details: LicenseDetails = serde_json::from_str(&content)?;
    let source_path = report.display().to_string();

    let mut deps = Vec::new();
    for package in &details.dependencies {
        let Some(name) = package.name.as_deref() else {
            continue;
        };
        let license = package
            .licenses
            .first()
            .filter(|l| *l != "unknown")
            .cloned();
        deps.push(
            Dependency::new(name, package.version.clone(), license, Ecosystem::Pub)
                .with_source_path(source_path.clone()),
        );
    }

    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;
    use std::fs;
    use tempfile::tempdir;

    fn write_report(root: &Path, content: &str) {
        let dir = root.join("build").join("reports").join("license_finder");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("flutter-license-details.json"), content).unwrap();
    }

    #[test]
    fn test_scan_reads_packages() {
        let dir = tempdir().unwrap();
        write_report(
            dir.path(),
            r#"{
  "dependencies": [
    {"name": "http", "version": "0.13.5", "licenses": ["BSD-3-Clause"]},
    {"name": "collection", "version": "1.17.0", "licenses": []}
  ]
}"#,
        );

        let mut deps = PubScanner.scan(dir.path());
        deps.sort();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].name, "collection");
        assert!(deps[0].license.is_none());
        assert_eq!(deps[1].name, "http");
        assert_eq!(deps[1].license.as_deref(), Some("BSD-3-Clause"));
        assert_eq!(deps[1].ecosystem, Ecosystem::Pub);
    }

    #[test]
    fn test_unknown_license_treated_as_absent() {
        let dir = tempdir().unwrap();
        write_report(
            dir.path(),
            r#"{"dependencies": [{"name": "mystery", "version": "1.0.0", "licenses": ["unknown"]}]}"#,
        );

        let deps = PubScanner.scan(dir.path());
        assert_eq!(deps.len(), 1);
        assert!(deps[0].license.is_none());
    }

    #[test]
    fn test_missing_report_yields_empty_set() {
        let dir = tempdir().unwrap();
        assert!(PubScanner.scan(dir.path()).is_empty());
    }

    #[test]
    fn test_malformed_report_yields_empty_set() {
        let dir = tempdir().unwrap();
        write_report(dir.path(), "{\"dependencies\": 42}");
        assert!(PubScanner.scan(dir.path()).is_empty());
    }
}
