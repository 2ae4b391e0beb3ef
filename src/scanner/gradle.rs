use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::models::{Dependency, Ecosystem};

/// Scanner for Gradle projects.
///
/// Reads `build/reports/dependency-license/license-details.json` as written
/// by the gradle-license-report plugin. Each entry declares module name,
/// version, and zero or more license objects; the license URL stands in when
/// no license name is present, and the `importedModules` section is consulted
/// as a secondary source for entries missing a license entirely.
pub struct GradleScanner;

impl super::Scanner for GradleScanner {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Gradle
    }

    fn scan(&self, module_root: &Path) -> Vec<Dependency> {
        let report = module_root
            .join("build")
            .join("reports")
            .join("dependency-license")
            .join("license-details.json");

        if !report.exists() {
            tracing::debug!(
                "no license-details.json in {} - skipping gradle scan",
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
    dependencies: Vec<ReportedModule>,
    #[serde(default, rename = "importedModules")]
    imported_modules: Vec<ImportedModules>,
}

#[derive(Debug, Deserialize)]
struct ReportedModule {
    #[serde(rename = "moduleName")]
    name: Option<String>,
    #[serde(rename = "moduleVersion")]
    version: Option<String>,
    #[serde(default, rename = "moduleLicenses")]
    licenses: Vec<ReportedLicense>,
}

#[derive(Debug, Deserialize)]
struct ReportedLicense {
    #[serde(rename = "moduleLicense")]
    license: Option<String>,
    #[serde(rename = "moduleLicenseUrl")]
    license_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImportedModules {
    #[serde(default)]
    dependencies: Vec<ImportedModule>,
}

#[derive(Debug, Deserialize)]
struct ImportedModule {
    #[serde(rename = "moduleName")]
    name: String,
    #[serde(rename = "moduleLicense")]
    license: Option<String>,
}

fn parse_license_details(report: &Path) -> Result<Vec<Dependency>> {
    let content = std::fs::read_to_string(report)?;
    let details: LicenseDetails = serde_json::from_str(&content)?;
    let source_path = report.display().to_string();

    let imported = details
        .imported_modules
        .first()
        .map(|m| m.dependencies.as_slice())
        .unwrap_or(&[]);

    let mut deps = Vec::new();
    for module in &details.dependencies {
        let Some(name) = module.name.as_deref() else {
            continue;
        };
        let license = module_license(module).or_else(|| imported_license(imported, name));
        deps.push(
            Dependency::new(name, module.version.clone(), license, Ecosystem::Gradle)
                .with_source_path(source_path.clone()),
        );
    }

    Ok(deps)
}

// First license entry wins; its URL stands in when the name is absent.
fn module_license(module: &ReportedModule) -> Option<String> {
    let first = module.licenses.first()?;
    first.license.clone().or_else(|| first.license_url.clone())
}

fn imported_license(imported: &[ImportedModule], name: &str) -> Option<String> {
    imported
        .iter()
        .find(|m| m.name == name)
        .and_then(|m| m.license.clone())
}
